use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::ConversionPlan;
use crate::error::{ConvertError, Result};
use crate::transcode::{TranscodeStats, Transcoder};

/// Totals over every job that finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    pub jobs: usize,
    pub pixels: u64,
    pub bytes_written: u64,
}

/// Runs conversion jobs one after another against the filesystem
pub struct Runner {
    plans: Vec<ConversionPlan>,
    running: Arc<AtomicBool>,
}

impl Runner {
    pub fn new(plans: Vec<ConversionPlan>) -> Self {
        Runner {
            plans,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get a clone of the running flag for signal handlers
    pub fn get_running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Run every job. The first failure stops the run; its output file is
    /// removed and later jobs are not started.
    pub fn run(&self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        for (index, plan) in self.plans.iter().enumerate() {
            info!(
                "[{}/{}] {} ({}) -> {} ({}), {}x{}",
                index + 1,
                self.plans.len(),
                plan.input.display(),
                plan.source,
                plan.output.display(),
                plan.destination,
                plan.width,
                plan.height
            );

            let started = Instant::now();
            let stats = self.run_job(plan)?;
            debug!(
                pixels = stats.pixels,
                bytes_read = stats.bytes_read,
                bytes_written = stats.bytes_written,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "job finished"
            );

            summary.jobs += 1;
            summary.pixels += stats.pixels;
            summary.bytes_written += stats.bytes_written;
        }

        info!(
            "✓ {} job(s), {} pixels, {} bytes written",
            summary.jobs, summary.pixels, summary.bytes_written
        );
        Ok(summary)
    }

    fn run_job(&self, plan: &ConversionPlan) -> Result<TranscodeStats> {
        let transcoder = Transcoder::new(plan.source, plan.destination, plan.width, plan.height)?
            .with_running_flag(Arc::clone(&self.running));

        let input = File::open(&plan.input).map_err(|source| ConvertError::InputUnreadable {
            path: plan.input.clone(),
            source,
        })?;
        if let (Some(expected), Ok(meta)) = (
            plan.source.buffer_size(plan.width, plan.height),
            input.metadata(),
        ) {
            if meta.len() > expected {
                warn!(
                    "{} has {} bytes past the end of the image, ignoring them",
                    plan.input.display(),
                    meta.len() - expected
                );
            }
        }

        let output =
            File::create(&plan.output).map_err(|source| ConvertError::OutputUnwritable {
                path: plan.output.clone(),
                source,
            })?;

        // Devices and FIFOs are written through but never synced or removed
        let regular = output.metadata()?.is_file();

        let result = transcode_files(&transcoder, input, output, regular);
        if result.is_err() && regular {
            discard_output(&plan.output);
        }
        result
    }
}

/// Both files are dropped, and so closed, before this returns.
fn transcode_files(
    transcoder: &Transcoder,
    input: File,
    output: File,
    regular: bool,
) -> Result<TranscodeStats> {
    let mut reader = BufReader::new(input);
    let mut writer = BufWriter::new(output);

    let stats = transcoder.transcode(&mut reader, &mut writer)?;
    writer.flush()?;
    if regular {
        writer.get_ref().sync_all()?;
    }

    Ok(stats)
}

fn discard_output(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => debug!("removed incomplete output {}", path.display()),
        Err(e) => warn!("could not remove incomplete output {}: {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_format::PixelFormat;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn plan(dir: &TempDir, source: PixelFormat, destination: PixelFormat) -> ConversionPlan {
        ConversionPlan {
            input: dir.path().join("input.raw"),
            output: dir.path().join("output.raw"),
            width: 2,
            height: 2,
            source,
            destination,
        }
    }

    #[test]
    fn test_converts_file() {
        let dir = TempDir::new().unwrap();
        let plan = plan(&dir, PixelFormat::Rgb24, PixelFormat::Bgra);
        fs::write(&plan.input, [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]).unwrap();

        let summary = Runner::new(vec![plan.clone()]).run().unwrap();
        assert_eq!(summary.jobs, 1);
        assert_eq!(summary.pixels, 4);
        assert_eq!(summary.bytes_written, 16);

        let output = fs::read(&plan.output).unwrap();
        assert_eq!(
            output,
            vec![3, 2, 1, 255, 6, 5, 4, 255, 9, 8, 7, 255, 12, 11, 10, 255]
        );
    }

    #[test]
    fn test_chained_jobs_roundtrip() {
        let dir = TempDir::new().unwrap();
        let original = [10u8, 20, 30, 40, 50, 60, 70, 80, 90, 100, 110, 120];
        let first = ConversionPlan {
            output: dir.path().join("mid.argb"),
            ..plan(&dir, PixelFormat::Rgb24, PixelFormat::Argb)
        };
        let second = ConversionPlan {
            input: dir.path().join("mid.argb"),
            output: dir.path().join("back.rgb"),
            ..plan(&dir, PixelFormat::Argb, PixelFormat::Rgb24)
        };
        fs::write(&first.input, original).unwrap();

        let summary = Runner::new(vec![first, second.clone()]).run().unwrap();
        assert_eq!(summary.jobs, 2);
        assert_eq!(fs::read(&second.output).unwrap(), original.to_vec());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let plan = plan(&dir, PixelFormat::Rgb24, PixelFormat::Argb);

        let err = Runner::new(vec![plan.clone()]).run().unwrap_err();
        assert!(matches!(err, ConvertError::InputUnreadable { .. }));
        assert!(!plan.output.exists());
    }

    #[test]
    fn test_truncated_input_removes_output() {
        let dir = TempDir::new().unwrap();
        let plan = plan(&dir, PixelFormat::Ayuv, PixelFormat::Rgb24);
        fs::write(&plan.input, [0u8; 15]).unwrap();

        let err = Runner::new(vec![plan.clone()]).run().unwrap_err();
        assert!(matches!(
            err,
            ConvertError::TruncatedInput { pixel: 3, expected: 4 }
        ));
        assert!(!plan.output.exists());
    }

    #[test]
    fn test_failure_stops_later_jobs() {
        let dir = TempDir::new().unwrap();
        let broken = plan(&dir, PixelFormat::Rgb24, PixelFormat::Argb);
        let later = ConversionPlan {
            input: dir.path().join("ok.rgb"),
            output: dir.path().join("ok.argb"),
            ..plan(&dir, PixelFormat::Rgb24, PixelFormat::Argb)
        };
        fs::write(&later.input, [0u8; 12]).unwrap();

        assert!(Runner::new(vec![broken, later.clone()]).run().is_err());
        assert!(!later.output.exists());
    }

    #[test]
    fn test_interrupted_run() {
        let dir = TempDir::new().unwrap();
        let plan = plan(&dir, PixelFormat::Bgra, PixelFormat::Vuya);
        fs::write(&plan.input, [0u8; 16]).unwrap();

        let runner = Runner::new(vec![plan.clone()]);
        runner.get_running_flag().store(false, Ordering::Relaxed);

        let err = runner.run().unwrap_err();
        assert!(matches!(err, ConvertError::Interrupted { pixel: 0 }));
        assert!(!plan.output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_device_output_is_written_and_kept() {
        let dir = TempDir::new().unwrap();
        let plan = ConversionPlan {
            output: "/dev/null".into(),
            ..plan(&dir, PixelFormat::Rgb24, PixelFormat::Argb)
        };
        fs::write(&plan.input, [7u8; 12]).unwrap();

        let summary = Runner::new(vec![plan.clone()]).run().unwrap();
        assert_eq!(summary.bytes_written, 16);
        assert!(plan.output.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_job_keeps_device_output() {
        let dir = TempDir::new().unwrap();
        let plan = ConversionPlan {
            output: "/dev/null".into(),
            ..plan(&dir, PixelFormat::Rgb24, PixelFormat::Argb)
        };
        fs::write(&plan.input, [7u8; 5]).unwrap();

        let err = Runner::new(vec![plan.clone()]).run().unwrap_err();
        assert!(matches!(err, ConvertError::TruncatedInput { pixel: 1, .. }));
        assert!(plan.output.exists());
    }

    #[test]
    fn test_undefined_destination_leaves_output_untouched() {
        let dir = TempDir::new().unwrap();
        let plan = plan(&dir, PixelFormat::Rgb24, PixelFormat::Undefined);
        fs::write(&plan.input, [0u8; 12]).unwrap();
        fs::write(&plan.output, b"keep me").unwrap();

        let err = Runner::new(vec![plan.clone()]).run().unwrap_err();
        assert!(matches!(err, ConvertError::UndefinedDestinationFormat));
        assert_eq!(fs::read(&plan.output).unwrap(), b"keep me".to_vec());
    }
}
