//! Contour renderer command-line tool.
//!
//! Reads an image, renders it as marching-squares contours on a fixed pool of
//! worker threads and writes the result.

use anyhow::{Context, Result};
use clap::Parser;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use contour_common::{InterpolationMethod, PipelineConfig};
use contour_renderer::{Pipeline, StampTable};

#[derive(Parser, Debug)]
#[command(name = "contour-cli")]
#[command(version, about = "Render an image as marching-squares contour lines")]
struct Args {
    /// Input image (binary PPM or any format the decoder understands)
    input: PathBuf,

    /// Output image; the format follows the extension
    output: PathBuf,

    /// Number of worker threads
    threads: NonZeroUsize,

    /// Directory holding the contour stamps 0.ppm .. 15.ppm
    #[arg(long, default_value = "./contours", conflicts_with = "builtin_stamps")]
    contours: PathBuf,

    /// Draw the contour stamps procedurally instead of loading them
    #[arg(long)]
    builtin_stamps: bool,

    /// YAML configuration file
    #[arg(long, env = "CONTOUR_CONFIG")]
    config: Option<PathBuf>,

    /// Maximum working width before rescaling
    #[arg(long)]
    max_width: Option<usize>,

    /// Maximum working height before rescaling
    #[arg(long)]
    max_height: Option<usize>,

    /// Grid cell size in pixels
    #[arg(long)]
    step: Option<usize>,

    /// Luminance threshold (samples at or below are inside)
    #[arg(long)]
    threshold: Option<u8>,

    /// Rescale kernel: nearest, bilinear or bicubic
    #[arg(long)]
    interpolation: Option<InterpolationMethod>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

impl Args {
    /// Defaults, then the config file, then the environment, then flags.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let base = match &self.config {
            Some(path) => PipelineConfig::from_yaml_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => PipelineConfig::default(),
        };

        let mut config = base.with_env_overrides();
        if let Some(width) = self.max_width {
            config.max_width = width;
        }
        if let Some(height) = self.max_height {
            config.max_height = height;
        }
        if let Some(step) = self.step {
            config.step = step;
        }
        if let Some(threshold) = self.threshold {
            config.threshold = threshold;
        }
        if let Some(method) = self.interpolation {
            config.interpolation = method;
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let builder = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_writer(std::io::stderr);

    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let config = args.pipeline_config()?;
    let workers = args.threads.get();

    let source = raster::load(&args.input)
        .with_context(|| format!("Failed to read input {}", args.input.display()))?;

    let stamps = if args.builtin_stamps {
        StampTable::synthesize(config.step)?
    } else {
        StampTable::load_dir(&args.contours, config.step).with_context(|| {
            format!("Failed to load contour stamps from {}", args.contours.display())
        })?
    };

    let pipeline = Pipeline::new(config, stamps, workers)?;

    let started = Instant::now();
    let outcome = pipeline.run(source)?;
    info!(
        width = outcome.image.width(),
        height = outcome.image.height(),
        rescaled = outcome.rescaled,
        workers,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Rendered contours"
    );

    raster::store(&outcome.image, &args.output)
        .with_context(|| format!("Failed to write output {}", args.output.display()))?;

    Ok(())
}

/// Usage errors exit with 1; `--help` and `--version` exit with 0.
fn usage_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        1
    } else {
        0
    }
}

fn main() -> Result<()> {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            err.print()?;
            std::process::exit(usage_exit_code(&err));
        }
    };

    init_tracing(&args)?;
    info!(input = %args.input.display(), output = %args.output.display(), "Starting contour-cli");

    run(&args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contour_common::{Image, Rgb};
    use test_utils::{disk_image, temp_output_path};

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["contour-cli", "in.ppm", "out.ppm", "4"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_positional_arguments() {
        let args = parse(&[]);
        assert_eq!(args.input, PathBuf::from("in.ppm"));
        assert_eq!(args.output, PathBuf::from("out.ppm"));
        assert_eq!(args.threads.get(), 4);
        assert_eq!(args.contours, PathBuf::from("./contours"));
    }

    #[test]
    fn test_missing_arguments_is_usage_error() {
        let err = Args::try_parse_from(["contour-cli", "in.ppm"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn test_usage_exit_codes() {
        let missing = Args::try_parse_from(["contour-cli", "in.ppm"]).unwrap_err();
        assert_eq!(usage_exit_code(&missing), 1);

        let help = Args::try_parse_from(["contour-cli", "--help"]).unwrap_err();
        assert_eq!(usage_exit_code(&help), 0);
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(Args::try_parse_from(["contour-cli", "in.ppm", "out.ppm", "0"]).is_err());
        assert!(Args::try_parse_from(["contour-cli", "in.ppm", "out.ppm", "many"]).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&["--step", "16", "--threshold", "90", "--interpolation", "nearest"]);
        let config = args.pipeline_config().unwrap();
        assert_eq!(config.step, 16);
        assert_eq!(config.threshold, 90);
        assert_eq!(config.interpolation, InterpolationMethod::Nearest);
    }

    #[test]
    fn test_invalid_override_fails_validation() {
        let args = parse(&["--step", "0"]);
        assert!(args.pipeline_config().is_err());
    }

    #[test]
    fn test_contours_conflicts_with_builtin() {
        let result = Args::try_parse_from([
            "contour-cli",
            "in.ppm",
            "out.ppm",
            "2",
            "--contours",
            "dir",
            "--builtin-stamps",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_run_end_to_end_with_builtin_stamps() {
        let (dir, output) = temp_output_path("out.ppm");
        let input = dir.path().join("in.ppm");
        raster::store(&disk_image(64, 48, 14.0), &input).unwrap();

        let args = Args::try_parse_from([
            "contour-cli",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "3",
            "--builtin-stamps",
        ])
        .unwrap();
        run(&args).unwrap();

        let rendered = raster::load(&output).unwrap();
        assert_eq!(rendered.dimensions(), (64, 48));
        assert!(rendered.pixels().contains(&Rgb([0, 0, 0])), "contour ink expected");
    }

    #[test]
    fn test_run_with_missing_input_writes_nothing() {
        let (dir, output) = temp_output_path("out.ppm");
        let args = Args::try_parse_from([
            "contour-cli",
            dir.path().join("missing.ppm").to_str().unwrap(),
            output.to_str().unwrap(),
            "2",
            "--builtin-stamps",
        ])
        .unwrap();

        assert!(run(&args).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_run_with_stamp_directory() {
        let (dir, output) = temp_output_path("out.png");
        let stamps_dir = dir.path().join("contours");
        StampTable::synthesize(8).unwrap().save_dir(&stamps_dir).unwrap();

        let input = dir.path().join("in.png");
        raster::store(&Image::filled(32, 32, Rgb([255, 255, 255])), &input).unwrap();

        let args = Args::try_parse_from([
            "contour-cli",
            input.to_str().unwrap(),
            output.to_str().unwrap(),
            "2",
            "--contours",
            stamps_dir.to_str().unwrap(),
        ])
        .unwrap();
        run(&args).unwrap();

        let rendered = raster::load(&output).unwrap();
        assert!(rendered.pixels().iter().all(|&px| px == Rgb([255, 255, 255])));
    }
}
