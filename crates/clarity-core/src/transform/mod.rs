//! Pixel transforms shared by the correction stages.

pub mod lut;
