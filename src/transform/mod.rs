//! Transform helpers shared by layout and rendering.

pub mod affine;
