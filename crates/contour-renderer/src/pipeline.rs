//! Worker coordinator.
//!
//! A run spawns exactly `workers` named OS threads. Each one walks the same
//! state machine:
//!
//! ```text
//! Idle -> Rescaling -> (barrier) -> Sampling -> (barrier) -> Marching -> Done
//! ```
//!
//! One reusable [`Barrier`] with `workers` participants separates the phases,
//! so no worker starts phase k+1 before every worker has finished phase k.
//! Inside a phase, worker `id` only writes the rows given by
//! [`Partition::for_worker`], which is what makes the shared working image
//! and grid safe to mutate without locks.
//!
//! A worker that never reaches a barrier (for example because it panicked
//! mid-phase) stalls the whole run; there is no cancellation.

use std::sync::Barrier;
use std::thread;
use std::time::Instant;

use contour_common::{ContourError, ContourResult, Image, PipelineConfig, Rgb};
use tracing::{debug, error, info, trace, warn};

use crate::grid::{BinaryGrid, GridLayout};
use crate::march::march_rows;
use crate::partition::Partition;
use crate::rescale::{needs_rescale, rescale_rows, working_dimensions};
use crate::sample::{sample_boundary, sample_rows};
use crate::shared::SharedBuffer;
use crate::stamps::StampTable;

/// Pipeline phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    Rescale,
    Sample,
    March,
}

/// Per-worker lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerState {
    Idle,
    Rescaling,
    Sampling,
    Marching,
    Done,
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    /// The working image after the last executed phase.
    pub image: Image,
    /// The binary grid (all zeros if the sample phase did not run).
    pub grid: BinaryGrid,
    /// Whether the source was resampled down to the working bound.
    pub rescaled: bool,
}

/// Contour renderer with a fixed worker count.
#[derive(Debug, Clone)]
pub struct Pipeline {
    config: PipelineConfig,
    stamps: StampTable,
    workers: usize,
}

impl Pipeline {
    pub fn new(config: PipelineConfig, stamps: StampTable, workers: usize) -> ContourResult<Self> {
        config.validate()?;

        if workers == 0 {
            return Err(ContourError::InvalidWorkerCount(workers));
        }

        if stamps.step() != config.step {
            return Err(ContourError::InvalidConfig(format!(
                "stamps are {}px but the sampling step is {}px",
                stamps.step(),
                config.step
            )));
        }

        Ok(Self { config, stamps, workers })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    pub fn stamps(&self) -> &StampTable {
        &self.stamps
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run all three phases.
    pub fn run(&self, source: Image) -> ContourResult<RenderOutcome> {
        self.run_through(source, Phase::March)
    }

    /// Run the phases up to and including `last_phase`.
    ///
    /// # Errors
    /// Returns [`ContourError::WorkerPanicked`] only for a panic in the last
    /// executed phase, when no barrier is left to wait on. A worker that
    /// panics before a barrier leaves the others waiting there, and the run
    /// never returns.
    ///
    /// # Aborts
    /// Aborts the process if a worker thread cannot be spawned: the workers
    /// already started would wait at the first barrier forever.
    pub fn run_through(&self, source: Image, last_phase: Phase) -> ContourResult<RenderOutcome> {
        let (src_width, src_height) = source.dimensions();
        if src_width == 0 || src_height == 0 {
            return Err(ContourError::InvalidDimensions(format!(
                "cannot contour an empty {}x{} image",
                src_width, src_height
            )));
        }

        let rescaled = needs_rescale(src_width, src_height, &self.config);
        let (width, height) = working_dimensions(src_width, src_height, &self.config);
        let layout = GridLayout::new(width, height, self.config.step);

        if layout.p == 0 || layout.q == 0 {
            warn!(width, height, step = layout.step, "Image is smaller than one grid cell");
        }

        // The working image is either a fresh buffer at the bound or the
        // source itself; the source stays alive only while it is needed.
        let (original, mut working) = if rescaled {
            (Some(source), Image::try_new(width, height)?)
        } else {
            (None, source)
        };
        let mut cells = alloc_grid(layout.cell_count())?;

        info!(
            src_width,
            src_height,
            width,
            height,
            rescaled,
            workers = self.workers,
            last_phase = ?last_phase,
            "Starting contour pipeline"
        );
        let started = Instant::now();

        {
            let ctx = SharedContext {
                source: original.as_ref(),
                canvas: SharedBuffer::new(working.pixels_mut()),
                grid: SharedBuffer::new(&mut cells),
                stamps: &self.stamps,
                config: &self.config,
                layout,
                barrier: Barrier::new(self.workers),
                last_phase,
            };
            debug_assert_eq!(ctx.canvas.len(), width * height);
            debug_assert_eq!(ctx.grid.len(), layout.cell_count());

            let tasks: Vec<WorkerTask> = (0..self.workers)
                .map(|id| WorkerTask {
                    id,
                    workers: self.workers,
                    ctx: &ctx,
                })
                .collect();

            thread::scope(|scope| {
                let handles: Vec<_> = tasks
                    .iter()
                    .map(|task| {
                        thread::Builder::new()
                            .name(format!("contour-worker-{}", task.id))
                            .spawn_scoped(scope, move || task.run())
                            .unwrap_or_else(|e| {
                                error!(worker = task.id, error = %e, "Unable to create worker thread");
                                std::process::abort()
                            })
                    })
                    .collect();

                let mut result = Ok(());
                for (id, handle) in handles.into_iter().enumerate() {
                    if handle.join().is_err() {
                        error!(worker = id, "Worker panicked");
                        if result.is_ok() {
                            result = Err(ContourError::WorkerPanicked { id });
                        }
                    }
                }
                result
            })?;
        }

        drop(original);

        debug!(
            elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
            "Contour pipeline complete"
        );

        Ok(RenderOutcome {
            image: working,
            grid: BinaryGrid::from_cells(layout, cells),
            rescaled,
        })
    }
}

fn alloc_grid(len: usize) -> ContourResult<Vec<u8>> {
    let mut cells = Vec::new();
    cells
        .try_reserve_exact(len)
        .map_err(|_| ContourError::Allocation {
            what: "binary grid",
            bytes: len,
        })?;
    cells.resize(len, 0);
    Ok(cells)
}

/// State every worker shares for one run. Built before the threads start.
struct SharedContext<'a> {
    /// Original image, present only when the rescale phase has work to do.
    source: Option<&'a Image>,
    canvas: SharedBuffer<'a, Rgb<u8>>,
    grid: SharedBuffer<'a, u8>,
    stamps: &'a StampTable,
    config: &'a PipelineConfig,
    layout: GridLayout,
    barrier: Barrier,
    last_phase: Phase,
}

/// Immutable per-worker descriptor.
struct WorkerTask<'t, 'a> {
    id: usize,
    workers: usize,
    ctx: &'t SharedContext<'a>,
}

impl WorkerTask<'_, '_> {
    /// The highest id fills the grid's closing row and column.
    fn is_boundary_worker(&self) -> bool {
        self.id == self.workers - 1
    }

    fn transition(&self, state: WorkerState) {
        trace!(worker = self.id, state = ?state, "Worker state change");
    }

    /// Finish `phase`, then either stop or wait for every other worker.
    /// Returns whether the next phase should run.
    fn end_phase(&self, phase: Phase) -> bool {
        if phase >= self.ctx.last_phase {
            return false;
        }
        self.ctx.barrier.wait();
        true
    }

    fn run(&self) {
        self.transition(WorkerState::Idle);

        self.transition(WorkerState::Rescaling);
        self.rescale();
        if self.end_phase(Phase::Rescale) {
            self.transition(WorkerState::Sampling);
            self.sample();
            if self.end_phase(Phase::Sample) {
                self.transition(WorkerState::Marching);
                self.march();
            }
        }

        self.transition(WorkerState::Done);
    }

    fn rescale(&self) {
        let ctx = self.ctx;
        let Some(source) = ctx.source else {
            return;
        };

        let width = ctx.layout.width;
        let band = Partition::for_worker(self.id, self.workers, ctx.layout.height);
        debug!(worker = self.id, rows = ?band.range(), "Rescaling");

        // SAFETY: pixel-row bands from `Partition::for_worker` are pairwise
        // disjoint, and nothing else touches the canvas in this phase.
        let rows = unsafe { ctx.canvas.slice_mut(band.start * width..band.end * width) };
        rescale_rows(source, rows, width, ctx.layout.height, band, ctx.config.interpolation);
    }

    fn sample(&self) {
        let ctx = self.ctx;
        let layout = &ctx.layout;
        let threshold = ctx.config.threshold;
        let band = Partition::for_worker(self.id, self.workers, layout.p);
        debug!(worker = self.id, cell_rows = ?band.range(), "Sampling");

        // SAFETY: the canvas is only read during the sample phase; the
        // barriers on either side keep rescale and march writes out.
        let pixels = unsafe { ctx.canvas.as_slice() };

        // SAFETY: interior points (i, j < q) are written only by the worker
        // whose band holds i; the closing row, column and corner only by the
        // boundary worker. Every grid point has exactly one writer.
        let set = |index: usize, value: u8| unsafe { ctx.grid.write(index, value) };

        sample_rows(pixels, layout, band, threshold, set);

        if self.is_boundary_worker() {
            debug!(worker = self.id, "Sampling grid boundary");
            sample_boundary(pixels, layout, threshold, set);
        }
    }

    fn march(&self) {
        let ctx = self.ctx;
        let layout = &ctx.layout;
        let band = Partition::for_worker(self.id, self.workers, layout.p);
        let pixel_rows = band.scaled(layout.step);
        debug!(worker = self.id, cell_rows = ?band.range(), "Marching");

        // SAFETY: the grid is complete and read-only once the second barrier
        // has been passed.
        let cells = unsafe { ctx.grid.as_slice() };

        // SAFETY: stamped pixel rows of different cell-row bands never
        // overlap, and no one reads the canvas in this phase.
        let rows = unsafe {
            ctx.canvas
                .slice_mut(pixel_rows.start * layout.width..pixel_rows.end * layout.width)
        };

        march_rows(rows, cells, layout, band, ctx.stamps);
    }
}
