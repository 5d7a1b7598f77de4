use crate::foundation::{
    core::Canvas,
    error::{PostframeError, PostframeResult},
};

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Options for the bottom layer.
pub struct BackgroundOptions {
    /// Gaussian blur radius in pixels; rounded to an integer at render time.
    #[serde(default)]
    pub blur: f64,
    /// Brightness percentage; `100` leaves pixels unchanged.
    #[serde(default = "default_brightness")]
    pub brightness: f64,
    /// Tile the image across the canvas instead of fitting it.
    #[serde(default)]
    pub repeat: bool,
    /// Draw the foreground image as the background (with `cover` sizing).
    #[serde(default)]
    pub reuse_foreground: bool,
    /// Uniform scale applied about the fitted rect (or canvas center when tiling).
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            blur: 0.0,
            brightness: default_brightness(),
            repeat: false,
            reuse_foreground: false,
            scale: default_scale(),
        }
    }
}

impl BackgroundOptions {
    /// Validate numeric ranges.
    pub fn validate(&self) -> PostframeResult<()> {
        if !self.blur.is_finite() || self.blur < 0.0 {
            return Err(PostframeError::validation("background blur must be >= 0"));
        }
        if !self.brightness.is_finite() || self.brightness < 0.0 {
            return Err(PostframeError::validation(
                "background brightness must be >= 0",
            ));
        }
        validate_scale("background", self.scale)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// How the foreground fits the canvas.
pub enum FitKind {
    /// Fit inside without upscaling.
    #[default]
    Contain,
    /// Fill the canvas, cropping overflow.
    Cover,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
/// Anchor used by `cover` when the scaled image overflows the box.
pub enum Anchor {
    /// Align to the box origin.
    Start,
    /// Center on both axes.
    #[default]
    Center,
    /// Align to the far edges.
    End,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u16", into = "u16")]
/// Quarter-turn rotation of the foreground.
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Rotation in whole degrees.
    pub fn degrees(self) -> u16 {
        match self {
            Self::Deg0 => 0,
            Self::Deg90 => 90,
            Self::Deg180 => 180,
            Self::Deg270 => 270,
        }
    }

    /// Rotation in radians (clockwise in y-down canvas space).
    pub fn radians(self) -> f64 {
        f64::from(self.degrees()).to_radians()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = PostframeError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deg0),
            90 => Ok(Self::Deg90),
            180 => Ok(Self::Deg180),
            270 => Ok(Self::Deg270),
            other => Err(PostframeError::validation(format!(
                "rotation must be one of 0, 90, 180, 270 (got {other})"
            ))),
        }
    }
}

impl From<Rotation> for u16 {
    fn from(value: Rotation) -> Self {
        value.degrees()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Options for the middle layer.
pub struct ForegroundOptions {
    /// Sizing mode.
    #[serde(default)]
    pub mode: FitKind,
    /// Cover anchor; ignored by `contain`.
    #[serde(default)]
    pub position: Anchor,
    /// Optional quarter-turn rotation about the fitted rect's center.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_in_degrees: Option<Rotation>,
}

impl ForegroundOptions {
    pub fn rotation(&self) -> Rotation {
        self.rotation_in_degrees.unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Canvas corner a watermark is pinned to.
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    #[default]
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// Options for the top layer.
pub struct WatermarkOptions {
    /// Paint opacity; clamped to `[0, 1]` when drawing.
    #[serde(default = "default_opacity")]
    pub opacity: f64,
    /// Corner the watermark is inset from.
    #[serde(default)]
    pub position: Corner,
    /// Multiplier of the watermark's natural size.
    #[serde(default = "default_scale")]
    pub scale: f64,
}

impl Default for WatermarkOptions {
    fn default() -> Self {
        Self {
            opacity: default_opacity(),
            position: Corner::default(),
            scale: default_scale(),
        }
    }
}

impl WatermarkOptions {
    /// Opacity as used for painting.
    pub fn effective_opacity(&self) -> f32 {
        if self.opacity.is_nan() {
            return 0.0;
        }
        self.opacity.clamp(0.0, 1.0) as f32
    }

    pub fn validate(&self) -> PostframeResult<()> {
        validate_scale("watermark", self.scale)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// All per-layer options of one composition request.
pub struct ComposeOptions {
    #[serde(default)]
    pub background: BackgroundOptions,
    #[serde(default)]
    pub foreground: ForegroundOptions,
    #[serde(default)]
    pub watermark: WatermarkOptions,
}

impl ComposeOptions {
    pub fn validate(&self) -> PostframeResult<()> {
        self.background.validate()?;
        self.watermark.validate()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Output canvas presets.
pub enum OutputFormat {
    /// Square post.
    #[default]
    #[serde(rename = "1:1-1080x1080px")]
    Square,
    /// Portrait post.
    #[serde(rename = "4:5-1080x1350px")]
    Portrait,
}

impl OutputFormat {
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Square => Canvas {
                width: 1080,
                height: 1080,
            },
            Self::Portrait => Canvas {
                width: 1080,
                height: 1350,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Options that apply to the whole frame rather than one layer.
pub struct GeneralOptions {
    #[serde(default)]
    pub format: OutputFormat,
}

fn validate_scale(layer: &str, scale: f64) -> PostframeResult<()> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(PostframeError::validation(format!(
            "{layer} scale must be > 0"
        )));
    }
    Ok(())
}

fn default_brightness() -> f64 {
    100.0
}

fn default_scale() -> f64 {
    1.0
}

fn default_opacity() -> f64 {
    1.0
}

#[cfg(test)]
#[path = "../../tests/unit/options/model.rs"]
mod tests;
