use crate::{
    assets::decode::DecodedImage,
    effects::filter::FilterChain,
    foundation::core::{Affine, Canvas, Rect, Rgba8Premul},
    foundation::error::PostframeResult,
};

/// 2D paint API of a destination surface.
///
/// State (`filter`, `global_alpha`) follows canvas semantics: it applies to
/// every subsequent draw until changed, and `save`/`restore` push and pop it.
pub trait PaintContext {
    fn canvas(&self) -> Canvas;

    fn save(&mut self);

    /// Pop the last saved state; a restore without a matching save is ignored.
    fn restore(&mut self);

    fn filter(&self) -> FilterChain;

    fn set_filter(&mut self, filter: FilterChain);

    fn global_alpha(&self) -> f32;

    fn set_global_alpha(&mut self, alpha: f32);

    /// Overwrite every pixel, ignoring paint state.
    fn clear(&mut self, color: Rgba8Premul);

    /// Paint the `source` window of `image` onto `dest`, where `dest` is given
    /// in the local space of `transform`.
    fn draw_image(
        &mut self,
        image: &DecodedImage,
        source: Rect,
        dest: Rect,
        transform: Affine,
    ) -> PostframeResult<()>;

    /// Fill `area` (canvas space) with `image` repeated on both axes, the
    /// pattern placed by `pattern_transform`.
    fn fill_pattern(
        &mut self,
        image: &DecodedImage,
        pattern_transform: Affine,
        area: Rect,
    ) -> PostframeResult<()>;
}

/// Something that owns pixels and can hand out a paint context.
pub trait Surface {
    fn dimensions(&self) -> Canvas;

    fn paint_context(&mut self) -> PostframeResult<&mut dyn PaintContext>;
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PaintState {
    pub(crate) filter: FilterChain,
    pub(crate) global_alpha: f32,
}

impl Default for PaintState {
    fn default() -> Self {
        Self {
            filter: FilterChain::none(),
            global_alpha: 1.0,
        }
    }
}

/// Current paint state plus the save stack.
#[derive(Clone, Debug, Default)]
pub(crate) struct StateStack {
    pub(crate) current: PaintState,
    saved: Vec<PaintState>,
}

impl StateStack {
    pub(crate) fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    pub(crate) fn restore(&mut self) {
        if let Some(prev) = self.saved.pop() {
            self.current = prev;
        }
    }

    pub(crate) fn depth(&self) -> usize {
        self.saved.len()
    }
}
