pub mod cpu;
pub mod layer;
pub mod surface;
