pub mod adjust;
pub mod edges;
pub mod loader;
pub mod luminance;
pub mod resize;
