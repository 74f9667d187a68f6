//! Procedural tileable textures: layered translucent rectangles painted onto a raster surface,
//! plus a normal map derived from the result.

pub mod art;
pub mod batch;
pub mod config;
pub mod layers;
pub mod math;
pub mod normal;
pub mod params;
pub mod rand;
pub mod settings;
pub mod surface;
