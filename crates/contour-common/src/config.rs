//! Configuration for the contour pipeline.

use crate::error::{ContourError, ContourResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::warn;

/// Largest working width; wider inputs are resampled down to this bound.
pub const DEFAULT_MAX_WIDTH: usize = 2048;

/// Largest working height; taller inputs are resampled down to this bound.
pub const DEFAULT_MAX_HEIGHT: usize = 2048;

/// Grid cell size in pixels. Every contour stamp is `step x step`.
pub const DEFAULT_STEP: usize = 8;

/// Luminance cutoff. Samples at or below it are inside the contour.
pub const DEFAULT_THRESHOLD: u8 = 200;

/// Configuration for a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum working width in pixels.
    pub max_width: usize,

    /// Maximum working height in pixels.
    pub max_height: usize,

    /// Sampling step (grid cell edge) in pixels.
    pub step: usize,

    /// Brightness threshold used for binarization.
    pub threshold: u8,

    /// Kernel used when resampling oversized inputs.
    pub interpolation: InterpolationMethod,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            max_height: DEFAULT_MAX_HEIGHT,
            step: DEFAULT_STEP,
            threshold: DEFAULT_THRESHOLD,
            interpolation: InterpolationMethod::Bicubic,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> ContourResult<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    /// Apply `CONTOUR_*` environment variables. Unparsable values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(width) = env_parse::<usize>("CONTOUR_MAX_WIDTH") {
            self.max_width = width;
        }

        if let Some(height) = env_parse::<usize>("CONTOUR_MAX_HEIGHT") {
            self.max_height = height;
        }

        if let Some(step) = env_parse::<usize>("CONTOUR_STEP") {
            self.step = step;
        }

        if let Some(threshold) = env_parse::<u8>("CONTOUR_THRESHOLD") {
            self.threshold = threshold;
        }

        if let Some(method) = env_parse::<InterpolationMethod>("CONTOUR_INTERPOLATION") {
            self.interpolation = method;
        }

        self
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ContourResult<()> {
        if self.step == 0 {
            return Err(ContourError::InvalidConfig("step must be > 0".to_string()));
        }

        if self.max_width == 0 || self.max_height == 0 {
            return Err(ContourError::InvalidConfig(
                "max_width and max_height must be > 0".to_string(),
            ));
        }

        if self.max_width < self.step || self.max_height < self.step {
            return Err(ContourError::InvalidConfig(format!(
                "maximum working size {}x{} is smaller than one {}px cell",
                self.max_width, self.max_height, self.step
            )));
        }

        Ok(())
    }
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable environment override");
            None
        }
    }
}

/// Interpolation kernel for the rescale phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterpolationMethod {
    /// Nearest neighbor (blocky, exact source colors).
    Nearest,
    /// Bilinear interpolation over the 2x2 neighbourhood.
    Bilinear,
    /// Catmull-Rom bicubic interpolation over the 4x4 neighbourhood.
    #[default]
    Bicubic,
}

impl FromStr for InterpolationMethod {
    type Err = ContourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "bilinear" | "linear" => Ok(Self::Bilinear),
            "bicubic" | "cubic" => Ok(Self::Bicubic),
            other => Err(ContourError::InvalidConfig(format!(
                "unknown interpolation method '{}'",
                other
            ))),
        }
    }
}

impl std::fmt::Display for InterpolationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nearest => write!(f, "nearest"),
            Self::Bilinear => write!(f, "bilinear"),
            Self::Bicubic => write!(f, "bicubic"),
        }
    }
}
