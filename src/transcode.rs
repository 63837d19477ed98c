use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::color::{Argb, Ayuv, Bgra, Rgb24, Vuya, WirePixel};
use crate::error::{ConvertError, Result};
use crate::pixel_format::PixelFormat;

/// Largest wire pixel
const MAX_PIXEL_SIZE: usize = 4;

/// Counters reported after a completed pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TranscodeStats {
    pub pixels: u64,
    pub bytes_read: u64,
    pub bytes_written: u64,
}

/// Converts a packed image from one pixel format to another, one pixel at a time.
pub struct Transcoder {
    source: PixelFormat,
    destination: PixelFormat,
    width: u32,
    height: u32,
    running: Option<Arc<AtomicBool>>,
}

impl Transcoder {
    /// Create a transcoder for a `width` x `height` image.
    ///
    /// Fails if either tag is `Undefined` or the pair is not one of the
    /// twenty supported conversions.
    pub fn new(
        source: PixelFormat,
        destination: PixelFormat,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        if !destination.is_defined() {
            return Err(ConvertError::UndefinedDestinationFormat);
        }
        if !source.is_defined() {
            return Err(ConvertError::UndefinedSourceFormat);
        }
        if source == destination {
            return Err(ConvertError::UnsupportedPair {
                from: source,
                to: destination,
            });
        }

        debug!(
            "{} -> {}: matrix {}, alpha {}",
            source,
            destination,
            if source.family() == destination.family() { "skipped" } else { "applied" },
            match (source.has_alpha(), destination.has_alpha()) {
                (_, false) => "dropped",
                (true, true) => "propagated",
                (false, true) => "opaque",
            }
        );

        Ok(Self {
            source,
            destination,
            width,
            height,
            running: None,
        })
    }

    /// Abort between rows once `running` is cleared.
    pub fn with_running_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.running = Some(running);
        self
    }

    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Run the whole pass. Reads exactly `pixel_count()` source pixels and
    /// writes the same number of destination pixels.
    pub fn transcode<R: Read, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<TranscodeStats> {
        use PixelFormat as F;

        match (self.source, self.destination) {
            (F::Rgb24, F::Argb) => self.pump::<Rgb24, Argb, _, _>(input, output),
            (F::Rgb24, F::Bgra) => self.pump::<Rgb24, Bgra, _, _>(input, output),
            (F::Rgb24, F::Ayuv) => self.pump::<Rgb24, Ayuv, _, _>(input, output),
            (F::Rgb24, F::Vuya) => self.pump::<Rgb24, Vuya, _, _>(input, output),

            (F::Argb, F::Rgb24) => self.pump::<Argb, Rgb24, _, _>(input, output),
            (F::Argb, F::Bgra) => self.pump::<Argb, Bgra, _, _>(input, output),
            (F::Argb, F::Ayuv) => self.pump::<Argb, Ayuv, _, _>(input, output),
            (F::Argb, F::Vuya) => self.pump::<Argb, Vuya, _, _>(input, output),

            (F::Bgra, F::Rgb24) => self.pump::<Bgra, Rgb24, _, _>(input, output),
            (F::Bgra, F::Argb) => self.pump::<Bgra, Argb, _, _>(input, output),
            (F::Bgra, F::Ayuv) => self.pump::<Bgra, Ayuv, _, _>(input, output),
            (F::Bgra, F::Vuya) => self.pump::<Bgra, Vuya, _, _>(input, output),

            (F::Ayuv, F::Rgb24) => self.pump::<Ayuv, Rgb24, _, _>(input, output),
            (F::Ayuv, F::Argb) => self.pump::<Ayuv, Argb, _, _>(input, output),
            (F::Ayuv, F::Bgra) => self.pump::<Ayuv, Bgra, _, _>(input, output),
            (F::Ayuv, F::Vuya) => self.pump::<Ayuv, Vuya, _, _>(input, output),

            (F::Vuya, F::Rgb24) => self.pump::<Vuya, Rgb24, _, _>(input, output),
            (F::Vuya, F::Argb) => self.pump::<Vuya, Argb, _, _>(input, output),
            (F::Vuya, F::Bgra) => self.pump::<Vuya, Bgra, _, _>(input, output),
            (F::Vuya, F::Ayuv) => self.pump::<Vuya, Ayuv, _, _>(input, output),

            (from, to) => Err(ConvertError::UnsupportedPair { from, to }),
        }
    }

    fn pump<S, D, R, W>(&self, input: &mut R, output: &mut W) -> Result<TranscodeStats>
    where
        S: WirePixel,
        D: WirePixel + From<S>,
        R: Read,
        W: Write,
    {
        let expected = self.pixel_count();
        let mut in_buf = [0u8; MAX_PIXEL_SIZE];
        let mut out_buf = [0u8; MAX_PIXEL_SIZE];
        let mut stats = TranscodeStats::default();

        for row in 0..self.height {
            if let Some(running) = &self.running {
                if !running.load(Ordering::Relaxed) {
                    return Err(ConvertError::Interrupted { pixel: stats.pixels });
                }
            }
            trace!(row, "{} -> {}", S::FORMAT, D::FORMAT);

            for _ in 0..self.width {
                let src = &mut in_buf[..S::SIZE];
                read_pixel(input, src, stats.pixels, expected)?;

                let pixel = D::from(S::decode(src));
                let dst = &mut out_buf[..D::SIZE];
                pixel.encode(dst);
                output.write_all(dst)?;

                stats.pixels += 1;
                stats.bytes_read += S::SIZE as u64;
                stats.bytes_written += D::SIZE as u64;
            }
        }

        output.flush()?;
        Ok(stats)
    }
}

/// Fill `buf` completely or report which pixel came up short.
fn read_pixel<R: Read>(input: &mut R, buf: &mut [u8], pixel: u64, expected: u64) -> Result<()> {
    match input.read_exact(buf) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::UnexpectedEof => {
            Err(ConvertError::TruncatedInput { pixel, expected })
        }
        Err(e) => Err(e.into()),
    }
}
