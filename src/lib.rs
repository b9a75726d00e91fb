#![deny(non_snake_case)]

pub mod asset;
pub mod fs;
pub mod graphics;
pub mod util;
