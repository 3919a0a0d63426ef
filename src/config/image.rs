use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_AUTO_BLUR_SIGMA, DEFAULT_DENSITY, DEFAULT_MAX_PIXELS, MAX_DENSITY};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ImageConfig {
    /// Largest decoded image, in pixels, before a request is refused
    #[serde(default = "default_max_pixels")]
    pub max_pixels: u64,

    /// Rasterization density for vector sources without a resize
    #[serde(default = "default_density")]
    pub default_density: f64,

    /// Upper bound for the computed vector density
    #[serde(default = "default_max_density")]
    pub max_density: f64,

    /// Sigma applied by a bare `blur`
    #[serde(default = "default_auto_blur_sigma")]
    pub auto_blur_sigma: f32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_pixels: default_max_pixels(),
            default_density: default_density(),
            max_density: default_max_density(),
            auto_blur_sigma: default_auto_blur_sigma(),
        }
    }
}

fn default_max_pixels() -> u64 {
    DEFAULT_MAX_PIXELS
}

fn default_density() -> f64 {
    DEFAULT_DENSITY
}

fn default_max_density() -> f64 {
    MAX_DENSITY
}

fn default_auto_blur_sigma() -> f32 {
    DEFAULT_AUTO_BLUR_SIGMA
}
