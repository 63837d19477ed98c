use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod color;
mod config;
mod error;
mod pixel_format;
mod runner;
mod transcode;

use config::{JobConfig, JobFile};
use pixel_format::{ColorFamily, PixelFormat};
use runner::Runner;

#[derive(Parser)]
#[command(name = "cstool")]
#[command(
    about = concat!(
        "CSTool - raw pixel buffer color space converter\n\n",
        "Converts headerless RGB24, ARGB, BGRA, AYUV and VUYA images."
    ),
    long_about = None
)]
struct Cli {
    /// JSON file describing one or more conversion jobs
    #[arg(
        long,
        conflicts_with_all = [
            "input",
            "output",
            "input_width",
            "input_height",
            "input_format",
            "output_width",
            "output_height",
            "output_format",
        ]
    )]
    job: Option<PathBuf>,

    /// Input file
    #[arg(short, long, required_unless_present_any = ["job", "list_formats"])]
    input: Option<PathBuf>,

    /// Input width in pixels
    #[arg(long, required_unless_present_any = ["job", "list_formats"])]
    input_width: Option<u32>,

    /// Input height in pixels
    #[arg(long, required_unless_present_any = ["job", "list_formats"])]
    input_height: Option<u32>,

    /// Input color space (AYUV, VUYA, ARGB, BGRA, RGB24)
    #[arg(long)]
    input_format: Option<String>,

    /// Output file
    #[arg(short, long, required_unless_present_any = ["job", "list_formats"])]
    output: Option<PathBuf>,

    /// Output width in pixels (defaults to input width)
    #[arg(long)]
    output_width: Option<u32>,

    /// Output height in pixels (defaults to input height)
    #[arg(long)]
    output_height: Option<u32>,

    /// Output color space (AYUV, VUYA, ARGB, BGRA, RGB24)
    #[arg(long)]
    output_format: Option<String>,

    /// Print the supported color spaces and exit
    #[arg(long)]
    list_formats: bool,

    /// Enable debug output (per-job statistics)
    #[arg(long)]
    debug: bool,

    /// Enable detailed debug (per-row tracing)
    #[arg(long)]
    ddebug: bool,
}

impl Cli {
    fn jobs(&self) -> Result<Vec<JobConfig>> {
        if let Some(path) = &self.job {
            let data = fs::read_to_string(path)
                .with_context(|| format!("Failed to read job file {}", path.display()))?;
            let file: JobFile = serde_json::from_str(&data)
                .with_context(|| format!("Invalid job file {}", path.display()))?;
            return Ok(file.jobs);
        }

        Ok(vec![JobConfig {
            input: self.input.clone(),
            output: self.output.clone(),
            input_width: self.input_width.unwrap_or(0),
            input_height: self.input_height.unwrap_or(0),
            input_format: self.input_format.clone(),
            output_width: self.output_width,
            output_height: self.output_height,
            output_format: self.output_format.clone(),
        }])
    }
}

fn init_logging(debug: bool, ddebug: bool) {
    let filter = if ddebug {
        "cstool=trace"
    } else if debug {
        "cstool=debug"
    } else {
        "cstool=info"
    };

    // RUST_LOG wins over the flags
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if let Err(err) = tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
    {
        eprintln!("failed to initialize tracing: {}", err);
    }
}

fn list_formats() {
    for format in PixelFormat::ALL {
        println!(
            "{:<6} {} bytes/pixel, {:?} family{}",
            format,
            format.bytes_per_pixel().unwrap_or(0),
            format.family().unwrap_or(ColorFamily::Rgb),
            if format.has_alpha() { ", alpha" } else { "" }
        );
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.list_formats {
        list_formats();
        return Ok(());
    }

    // ddebug implies debug
    let debug = cli.debug || cli.ddebug;
    init_logging(debug, cli.ddebug);

    // Validate every job before any output file is created
    let plans = cli
        .jobs()?
        .iter()
        .enumerate()
        .map(|(index, job)| {
            job.validate()
                .with_context(|| format!("Job {} is invalid", index + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    let runner = Runner::new(plans);

    // Ctrl-C stops at the next row and discards the unfinished output
    let running = runner.get_running_flag();
    let result = ctrlc::set_handler(move || {
        running.store(false, std::sync::atomic::Ordering::Relaxed);
    });

    if let Err(e) = result {
        tracing::warn!("Could not set Ctrl-C handler: {}", e);
    }

    runner.run().context("Conversion failed")?;

    Ok(())
}
