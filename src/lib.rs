pub mod body;
pub mod canvas;
pub mod error;
pub mod geometry_utils;
pub mod overlay;
pub mod overlay_config;
pub mod posture;
pub mod raster;
pub mod side_selector;

pub type Point2D = (f32, f32);
