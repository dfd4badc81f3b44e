//! Raster collaborators for the contour pipeline.
//!
//! - [`io`]: load and store pixel buffers (binary PPM is the reference
//!   format, anything the `image` crate decodes is accepted)
//! - [`sampling`]: interpolated color lookup at normalized coordinates,
//!   used by the rescale phase

pub mod io;
pub mod sampling;

pub use io::{load, store};
pub use sampling::{sample, sample_bicubic, sample_bilinear, sample_nearest};
