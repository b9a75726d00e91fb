use crate::graphics::color::Rgb24;
use crate::graphics::remap::{Ramp, RAMP_LEN};
use crate::util::array2d::Array2d;

pub const BAND_WIDTH: usize = 4;
pub const WIDTH: usize = RAMP_LEN * BAND_WIDTH;
pub const HEIGHT: usize = 10;

/// Renders the ramp as `WIDTH`x`HEIGHT` image of 32 solid vertical bands.
pub fn render(ramp: &Ramp) -> Array2d<Rgb24> {
    Array2d::from_fn(WIDTH, HEIGHT, |x, _| ramp[x / BAND_WIDTH].to_rgb24())
}

/// Nearest neighbour resize. Panics if `width` is zero.
pub fn resize<T: Copy>(src: &Array2d<T>, width: usize, height: usize) -> Array2d<T> {
    let src_width = src.width();
    let src_height = src.height();
    Array2d::from_fn(width, height, |x, y| {
        let sx = x * src_width / width;
        let sy = y * src_height / height;
        src.as_slice()[sy * src_width + sx]
    })
}

/// Spectrum preview of `ramp` scaled to `width`x`height`. Panics if `width` is zero.
pub fn spectrum(ramp: &Ramp, width: usize, height: usize) -> Array2d<Rgb24> {
    let r = render(ramp);
    if width == WIDTH && height == HEIGHT {
        r
    } else {
        resize(&r, width, height)
    }
}
