//! Parallel marching-squares contour rendering.
//!
//! A fixed pool of workers runs three phases over one shared working image,
//! separated by a reusable barrier:
//!
//! 1. **Rescale**: resample oversized inputs down to the working bound
//! 2. **Sample**: threshold the working image into a binary grid
//! 3. **March**: stamp one contour tile per grid cell back onto the image
//!
//! Each worker touches only its own band of rows in every phase, so pixel
//! and grid data need no locking.

pub mod grid;
pub mod march;
pub mod partition;
pub mod pipeline;
pub mod rescale;
pub mod sample;
mod shared;
pub mod stamps;

pub use grid::{configuration_index, BinaryGrid, GridLayout};
pub use partition::{partition_all, Partition};
pub use pipeline::{Phase, Pipeline, RenderOutcome, WorkerState};
pub use stamps::{StampTable, CONTOUR_CONFIG_COUNT};
