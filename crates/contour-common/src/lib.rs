//! Common types and utilities shared across the contour workspace.

pub mod config;
pub mod error;
pub mod pixel_buffer;

pub use config::{InterpolationMethod, PipelineConfig};
pub use error::{ContourError, ContourResult};
pub use pixel_buffer::{Image, Rgb};
