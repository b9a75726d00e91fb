use std::io::{self, Error, ErrorKind};

use crate::graphics::color::HueColor;

pub const RAMP_LEN: usize = 32;

/// Colors a hue maps the 32 gray levels to.
pub type Ramp = [HueColor; RAMP_LEN];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RemapMode {
    /// Every non-transparent pixel is replaced by the ramp color at its red level.
    Full,

    /// Only gray pixels (equal red, green and blue) are replaced, colored details are kept.
    GrayOnly,
}

impl RemapMode {
    pub fn new(gray_only: bool) -> Self {
        if gray_only {
            RemapMode::GrayOnly
        } else {
            RemapMode::Full
        }
    }
}

/// Mutable view of a 16-bit raster. Rows are `stride` pixels apart, the `stride - width`
/// pixels at the end of each row are padding and aren't touched.
#[derive(Debug)]
pub struct PixelBufMut<'a> {
    pixels: &'a mut [u16],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> PixelBufMut<'a> {
    pub fn new(pixels: &'a mut [u16], width: usize, height: usize, stride: usize)
        -> io::Result<Self>
    {
        if stride < width {
            return Err(Error::new(ErrorKind::InvalidInput,
                format!("stride {} is less than width {}", stride, width)));
        }
        let min_len = if height == 0 {
            Some(0)
        } else {
            stride.checked_mul(height - 1).and_then(|v| v.checked_add(width))
        };
        match min_len {
            Some(min_len) if pixels.len() >= min_len => {}
            _ => return Err(Error::new(ErrorKind::InvalidInput,
                format!("pixel buffer of length {} is too small for {}x{} with stride {}",
                    pixels.len(), width, height, stride))),
        }
        Ok(Self {
            pixels,
            width,
            height,
            stride,
        })
    }

    /// Buffer without row padding.
    pub fn packed(pixels: &'a mut [u16], width: usize) -> io::Result<Self> {
        if width == 0 || pixels.len() % width != 0 {
            return Err(Error::new(ErrorKind::InvalidInput,
                format!("pixel buffer of length {} can't have rows of {} pixels",
                    pixels.len(), width)));
        }
        let height = pixels.len() / width;
        Self::new(pixels, width, height, width)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn get(&self, x: usize, y: usize) -> Option<u16> {
        if x < self.width && y < self.height {
            Some(self.pixels[y * self.stride + x])
        } else {
            None
        }
    }

    pub fn row_mut(&mut self, y: usize) -> &mut [u16] {
        assert!(y < self.height);
        let start = y * self.stride;
        &mut self.pixels[start..start + self.width]
    }
}

/// Recolors the buffer in place using `ramp`. Pixels that are 0 are transparent and are never
/// changed. The ramp index is the red level of the pixel.
pub fn apply_ramp(buf: &mut PixelBufMut, ramp: &Ramp, mode: RemapMode) {
    for y in 0..buf.height() {
        let row = buf.row_mut(y);
        match mode {
            RemapMode::Full => {
                for px in row {
                    if *px != 0 {
                        *px = ramp[HueColor::from_raw(*px).r() as usize].raw();
                    }
                }
            }
            RemapMode::GrayOnly => {
                for px in row {
                    if *px != 0 {
                        let c = HueColor::from_raw(*px);
                        if c.rgb15().is_gray() {
                            *px = ramp[c.r() as usize].raw();
                        }
                    }
                }
            }
        }
    }
}
