pub mod color;
pub mod remap;
pub mod spectrum;
