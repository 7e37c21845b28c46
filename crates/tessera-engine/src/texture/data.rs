use thiserror::Error;

/// Texel filtering for both minification and magnification.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Filter {
    #[default]
    Nearest,
    Linear,
}

/// Addressing for UVs outside `[0, 1]`.
///
/// Atlas lookups past the last tile land outside the unit square; the wrap
/// mode decides what gets sampled there.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum Wrap {
    #[default]
    ClampToEdge,
    Repeat,
}

/// Sampler state attached to a texture.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Sampling {
    pub filter: Filter,
    pub wrap: Wrap,
}

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("pixel buffer holds {actual} bytes, expected {expected} for {width}x{height} RGBA8")]
    SizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("texture has zero size ({width}x{height})")]
    ZeroSize { width: u32, height: u32 },

    #[error("failed to decode image")]
    Decode(#[from] image::ImageError),
}

/// Tightly packed RGBA8 pixels, first row at `v = 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    pub sampling: Sampling,
}

impl TextureData {
    /// Wraps an RGBA8 pixel buffer. `pixels.len()` must equal `width * height * 4`.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, TextureError> {
        if width == 0 || height == 0 {
            return Err(TextureError::ZeroSize { width, height });
        }

        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(TextureError::SizeMismatch {
                width,
                height,
                expected,
                actual: pixels.len(),
            });
        }

        Ok(Self {
            width,
            height,
            pixels,
            sampling: Sampling::default(),
        })
    }

    /// Decodes an encoded image (PNG, JPEG, ...) into RGBA8.
    pub fn from_image_bytes(bytes: &[u8]) -> Result<Self, TextureError> {
        let img = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = img.dimensions();
        Self::new(width, height, img.into_raw())
    }

    /// `size`×`size` black/white checkerboard with one texel per cell.
    ///
    /// Texel `(x, y)` is white when `x` and `y` share parity. Sampled with
    /// nearest filtering and clamp-to-edge.
    pub fn checkerboard(size: u32) -> Self {
        let size = size.max(1);
        let mut pixels = Vec::with_capacity(size as usize * size as usize * 4);

        for y in 0..size {
            for x in 0..size {
                let v = if x % 2 == y % 2 { 255 } else { 0 };
                pixels.extend_from_slice(&[v, v, v, 255]);
            }
        }

        Self {
            width: size,
            height: size,
            pixels,
            sampling: Sampling {
                filter: Filter::Nearest,
                wrap: Wrap::ClampToEdge,
            },
        }
    }

    #[inline]
    pub fn with_sampling(mut self, sampling: Sampling) -> Self {
        self.sampling = sampling;
        self
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Bytes per row (RGBA8).
    #[inline]
    pub fn row_pitch(&self) -> u32 {
        self.width * 4
    }

    /// Returns the RGBA value at texel `(x, y)`, or `None` when out of bounds.
    pub fn texel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        let px = &self.pixels[i..i + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}
