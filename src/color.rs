//! Pixel value types and the RGB <-> YUV color matrix.
//!
//! Every struct here is a plain `Copy` value built for one pixel at a time.
//! Conversions inside a family only move channels around; conversions across
//! the RGB/YUV boundary always go through [`rgb24_to_yuv`] or [`yuv_to_rgb24`].

use crate::pixel_format::PixelFormat;

/// Alpha written when the source has none.
pub const OPAQUE: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb24 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Argb {
    pub a: u8,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

/// Luma/chroma triple. Never written to the wire on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Yuv {
    pub y: u8,
    pub u: u8,
    pub v: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Ayuv {
    pub a: u8,
    pub y: u8,
    pub u: u8,
    pub v: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Vuya {
    pub v: u8,
    pub u: u8,
    pub y: u8,
    pub a: u8,
}

impl Rgb24 {
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Argb {
    pub fn new(a: u8, r: u8, g: u8, b: u8) -> Self {
        Self { a, r, g, b }
    }

    pub fn with_alpha(rgb: Rgb24, a: u8) -> Self {
        Self::new(a, rgb.r, rgb.g, rgb.b)
    }

    pub fn rgb(&self) -> Rgb24 {
        Rgb24::new(self.r, self.g, self.b)
    }
}

impl Bgra {
    pub fn new(b: u8, g: u8, r: u8, a: u8) -> Self {
        Self { b, g, r, a }
    }

    pub fn with_alpha(rgb: Rgb24, a: u8) -> Self {
        Self::new(rgb.b, rgb.g, rgb.r, a)
    }

    pub fn rgb(&self) -> Rgb24 {
        Rgb24::new(self.r, self.g, self.b)
    }
}

impl Yuv {
    pub fn new(y: u8, u: u8, v: u8) -> Self {
        Self { y, u, v }
    }
}

impl Ayuv {
    pub fn new(a: u8, y: u8, u: u8, v: u8) -> Self {
        Self { a, y, u, v }
    }

    pub fn with_alpha(yuv: Yuv, a: u8) -> Self {
        Self::new(a, yuv.y, yuv.u, yuv.v)
    }

    pub fn yuv(&self) -> Yuv {
        Yuv::new(self.y, self.u, self.v)
    }
}

impl Vuya {
    pub fn new(v: u8, u: u8, y: u8, a: u8) -> Self {
        Self { v, u, y, a }
    }

    pub fn with_alpha(yuv: Yuv, a: u8) -> Self {
        Self::new(yuv.v, yuv.u, yuv.y, a)
    }

    pub fn yuv(&self) -> Yuv {
        Yuv::new(self.y, self.u, self.v)
    }
}

/// Truncates toward zero; out-of-range values saturate at 0 and 255.
#[inline]
fn channel(value: f64) -> u8 {
    value as u8
}

/// BT.601-derived forward transform.
pub fn rgb24_to_yuv(rgb: Rgb24) -> Yuv {
    let r = rgb.r as f64;
    let g = rgb.g as f64;
    let b = rgb.b as f64;

    let y = 0.299 * r + 0.587 * g + 0.114 * b;
    let u = -0.169 * r - 0.331 * g + 0.5 * b + 128.0;
    let v = 0.5 * r - 0.419 * g - 0.081 * b + 128.0;

    Yuv::new(channel(y), channel(u), channel(v))
}

/// Inverse of [`rgb24_to_yuv`], lossy by up to a couple of steps per channel.
pub fn yuv_to_rgb24(yuv: Yuv) -> Rgb24 {
    let y = yuv.y as f64;
    let u = yuv.u as f64 - 128.0;
    let v = yuv.v as f64 - 128.0;

    let r = 1.0 * y + 1.403 * v;
    let g = 1.0 * y - 0.344 * u - 0.714 * v;
    let b = 1.0 * y + 1.773 * u;

    Rgb24::new(channel(r), channel(g), channel(b))
}

/// A pixel type with a fixed byte layout on the wire.
pub trait WirePixel: Copy {
    const FORMAT: PixelFormat;
    /// Bytes per pixel
    const SIZE: usize;

    /// Decode from exactly `SIZE` bytes in wire order.
    fn decode(bytes: &[u8]) -> Self;

    /// Encode into exactly `SIZE` bytes in wire order.
    fn encode(&self, out: &mut [u8]);
}

impl WirePixel for Rgb24 {
    const FORMAT: PixelFormat = PixelFormat::Rgb24;
    const SIZE: usize = 3;

    fn decode(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    fn encode(&self, out: &mut [u8]) {
        out[..3].copy_from_slice(&[self.r, self.g, self.b]);
    }
}

impl WirePixel for Argb {
    const FORMAT: PixelFormat = PixelFormat::Argb;
    const SIZE: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    fn encode(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&[self.a, self.r, self.g, self.b]);
    }
}

impl WirePixel for Bgra {
    const FORMAT: PixelFormat = PixelFormat::Bgra;
    const SIZE: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    fn encode(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&[self.b, self.g, self.r, self.a]);
    }
}

impl WirePixel for Ayuv {
    const FORMAT: PixelFormat = PixelFormat::Ayuv;
    const SIZE: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    fn encode(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&[self.a, self.y, self.u, self.v]);
    }
}

impl WirePixel for Vuya {
    const FORMAT: PixelFormat = PixelFormat::Vuya;
    const SIZE: usize = 4;

    fn decode(bytes: &[u8]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    fn encode(&self, out: &mut [u8]) {
        out[..4].copy_from_slice(&[self.v, self.u, self.y, self.a]);
    }
}

// RGB family: reorder, insert or drop alpha.

impl From<Rgb24> for Argb {
    fn from(p: Rgb24) -> Self {
        Argb::with_alpha(p, OPAQUE)
    }
}

impl From<Rgb24> for Bgra {
    fn from(p: Rgb24) -> Self {
        Bgra::with_alpha(p, OPAQUE)
    }
}

impl From<Argb> for Rgb24 {
    fn from(p: Argb) -> Self {
        p.rgb()
    }
}

impl From<Bgra> for Rgb24 {
    fn from(p: Bgra) -> Self {
        p.rgb()
    }
}

impl From<Argb> for Bgra {
    fn from(p: Argb) -> Self {
        Bgra::with_alpha(p.rgb(), p.a)
    }
}

impl From<Bgra> for Argb {
    fn from(p: Bgra) -> Self {
        Argb::with_alpha(p.rgb(), p.a)
    }
}

// YUV family: reorder only.

impl From<Ayuv> for Vuya {
    fn from(p: Ayuv) -> Self {
        Vuya::with_alpha(p.yuv(), p.a)
    }
}

impl From<Vuya> for Ayuv {
    fn from(p: Vuya) -> Self {
        Ayuv::with_alpha(p.yuv(), p.a)
    }
}

// RGB -> YUV

impl From<Rgb24> for Ayuv {
    fn from(p: Rgb24) -> Self {
        Ayuv::with_alpha(rgb24_to_yuv(p), OPAQUE)
    }
}

impl From<Rgb24> for Vuya {
    fn from(p: Rgb24) -> Self {
        Vuya::with_alpha(rgb24_to_yuv(p), OPAQUE)
    }
}

impl From<Argb> for Ayuv {
    fn from(p: Argb) -> Self {
        Ayuv::with_alpha(rgb24_to_yuv(p.rgb()), p.a)
    }
}

impl From<Argb> for Vuya {
    fn from(p: Argb) -> Self {
        Vuya::with_alpha(rgb24_to_yuv(p.rgb()), p.a)
    }
}

impl From<Bgra> for Ayuv {
    fn from(p: Bgra) -> Self {
        Ayuv::with_alpha(rgb24_to_yuv(p.rgb()), p.a)
    }
}

impl From<Bgra> for Vuya {
    fn from(p: Bgra) -> Self {
        Vuya::with_alpha(rgb24_to_yuv(p.rgb()), p.a)
    }
}

// YUV -> RGB

impl From<Ayuv> for Rgb24 {
    fn from(p: Ayuv) -> Self {
        yuv_to_rgb24(p.yuv())
    }
}

impl From<Vuya> for Rgb24 {
    fn from(p: Vuya) -> Self {
        yuv_to_rgb24(p.yuv())
    }
}

impl From<Ayuv> for Argb {
    fn from(p: Ayuv) -> Self {
        Argb::with_alpha(yuv_to_rgb24(p.yuv()), p.a)
    }
}

impl From<Vuya> for Argb {
    fn from(p: Vuya) -> Self {
        Argb::with_alpha(yuv_to_rgb24(p.yuv()), p.a)
    }
}

impl From<Ayuv> for Bgra {
    fn from(p: Ayuv) -> Self {
        Bgra::with_alpha(yuv_to_rgb24(p.yuv()), p.a)
    }
}

impl From<Vuya> for Bgra {
    fn from(p: Vuya) -> Self {
        Bgra::with_alpha(yuv_to_rgb24(p.yuv()), p.a)
    }
}
