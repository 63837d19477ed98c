use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Packed pixel layouts understood by the converter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    /// A, Y, U, V
    Ayuv,
    /// V, U, Y, A
    Vuya,
    /// A, R, G, B
    Argb,
    /// B, G, R, A
    Bgra,
    /// R, G, B
    Rgb24,
    /// Tag that could not be resolved
    Undefined,
}

/// Which side of the color matrix a format lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    Rgb,
    Yuv,
}

impl PixelFormat {
    /// All resolvable formats, in tag order.
    pub const ALL: [PixelFormat; 5] = [
        PixelFormat::Ayuv,
        PixelFormat::Vuya,
        PixelFormat::Argb,
        PixelFormat::Bgra,
        PixelFormat::Rgb24,
    ];

    /// Resolve a user-facing tag. Matching is case-sensitive; anything else,
    /// including a missing tag, is `Undefined`.
    pub fn parse(tag: Option<&str>) -> PixelFormat {
        match tag {
            Some("AYUV") => PixelFormat::Ayuv,
            Some("VUYA") => PixelFormat::Vuya,
            Some("ARGB") => PixelFormat::Argb,
            Some("BGRA") => PixelFormat::Bgra,
            Some("RGB24") => PixelFormat::Rgb24,
            _ => PixelFormat::Undefined,
        }
    }

    pub fn is_defined(&self) -> bool {
        *self != PixelFormat::Undefined
    }

    /// Bytes occupied by one pixel on the wire
    pub fn bytes_per_pixel(&self) -> Option<usize> {
        match self {
            PixelFormat::Rgb24 => Some(3),
            PixelFormat::Ayuv | PixelFormat::Vuya | PixelFormat::Argb | PixelFormat::Bgra => {
                Some(4)
            }
            PixelFormat::Undefined => None,
        }
    }

    pub fn has_alpha(&self) -> bool {
        matches!(
            self,
            PixelFormat::Ayuv | PixelFormat::Vuya | PixelFormat::Argb | PixelFormat::Bgra
        )
    }

    pub fn family(&self) -> Option<ColorFamily> {
        match self {
            PixelFormat::Rgb24 | PixelFormat::Argb | PixelFormat::Bgra => Some(ColorFamily::Rgb),
            PixelFormat::Ayuv | PixelFormat::Vuya => Some(ColorFamily::Yuv),
            PixelFormat::Undefined => None,
        }
    }

    /// Size in bytes of a packed image, no stride or padding.
    pub fn buffer_size(&self, width: u32, height: u32) -> Option<u64> {
        let bpp = self.bytes_per_pixel()? as u64;
        Some(width as u64 * height as u64 * bpp)
    }
}

impl FromStr for PixelFormat {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PixelFormat::parse(Some(s)))
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            PixelFormat::Ayuv => "AYUV",
            PixelFormat::Vuya => "VUYA",
            PixelFormat::Argb => "ARGB",
            PixelFormat::Bgra => "BGRA",
            PixelFormat::Rgb24 => "RGB24",
            PixelFormat::Undefined => "Undefined",
        };
        f.pad(tag)
    }
}
