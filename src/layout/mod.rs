pub mod geometry;
pub mod watermark;
