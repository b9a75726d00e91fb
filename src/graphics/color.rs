use std::fmt;
use std::marker::PhantomData;

macro_rules! rgb {
    ($r:expr, $g:expr, $b:expr) => {
        Rgb { r: $r, g: $g, b: $b, _p: PhantomData }
    };
}

pub const WHITE         : Rgb15 = rgb!(31, 31, 31);
pub const BLACK         : Rgb15 = rgb!(0, 0, 0);

pub trait ColorPrecision: Clone + Copy + Eq + PartialEq + Ord + PartialOrd {
    const BITS: u32;
    const MASK: u32 = (1 << Self::BITS) - 1;
    const MAX: u8 = Self::MASK as u8;

    #[inline(always)]
    fn scale<P: ColorPrecision>(v: u8) -> u8 {
        if P::BITS > Self::BITS {
            v << (P::BITS - Self::BITS)
        } else {
            v >> (Self::BITS - P::BITS)
        }
    }
}

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Color5;
impl ColorPrecision for Color5 {
    const BITS: u32 = 5;
}

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Color8;
impl ColorPrecision for Color8 {
    const BITS: u32 = 8;
}

#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct Rgb<P: ColorPrecision> {
    r: u8,
    g: u8,
    b: u8,
    _p: PhantomData<P>,
}

impl<P: ColorPrecision> Rgb<P> {
    #[inline(always)]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        debug_assert!(r <= P::MAX);
        debug_assert!(g <= P::MAX);
        debug_assert!(b <= P::MAX);
        Self {
            r,
            g,
            b,
            _p: PhantomData,
        }
    }

    #[inline(always)]
    pub fn black() -> Self {
        Self::new(0, 0, 0)
    }

    #[inline(always)]
    pub fn from_packed(rgb: u32) -> Self {
        Self::new(
            (rgb >> (P::BITS * 2) & P::MASK) as u8,
            (rgb >> P::BITS & P::MASK) as u8,
            (rgb & P::MASK) as u8)
    }

    #[inline(always)]
    pub fn pack(self) -> u32 {
        (self.r as u32) << (P::BITS * 2) |
            (self.g as u32) << P::BITS |
            (self.b as u32)
    }

    /// Converts to another precision by bit shifting. Widening fills the low bits with zeros,
    /// so `Rgb15` white becomes `Rgb24(248, 248, 248)`.
    #[inline(always)]
    pub fn scale<O: ColorPrecision>(self) -> Rgb<O> {
        Rgb::new(
            P::scale::<O>(self.r),
            P::scale::<O>(self.g),
            P::scale::<O>(self.b))
    }

    #[inline(always)]
    pub fn r(self) -> u8 {
        self.r
    }

    #[inline(always)]
    pub fn g(self) -> u8 {
        self.g
    }

    #[inline(always)]
    pub fn b(self) -> u8 {
        self.b
    }

    #[inline(always)]
    pub fn colors(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    #[inline(always)]
    pub fn is_gray(self) -> bool {
        self.r == self.g && self.r == self.b
    }
}

impl<P: ColorPrecision> Default for Rgb<P> {
    fn default() -> Self {
        Self::black()
    }
}

impl<P: ColorPrecision> fmt::Debug for Rgb<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rgb{}{:?}", P::BITS * 3, self.colors())
    }
}

impl<P: ColorPrecision> fmt::LowerHex for Rgb<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rgb{}(0x{:x})", P::BITS * 3, self.pack())
    }
}

impl<P: ColorPrecision> fmt::UpperHex for Rgb<P> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rgb{}(0x{:X})", P::BITS * 3, self.pack())
    }
}

pub type Rgb15 = Rgb<Color5>;
pub type Rgb24 = Rgb<Color8>;

/// High bit of a 16-bit hue color. Always set in memory and always clear on disk.
pub const ACTIVE_BIT: u16 = 0x8000;

/// 16-bit color as used by hue ramps and 16-bit rasters: the active marker in bit 15 followed by
/// 5-bit red, green and blue fields.
#[derive(Clone, Copy, Default, Eq, Hash, PartialEq)]
pub struct HueColor(u16);

impl HueColor {
    #[inline(always)]
    pub const fn from_raw(v: u16) -> Self {
        Self(v)
    }

    /// Converts the on-disk value to the in-memory one.
    #[inline(always)]
    pub const fn from_stored(v: u16) -> Self {
        Self(v | ACTIVE_BIT)
    }

    /// Converts back to the on-disk value. This flips the marker rather than clearing it so a
    /// value loaded with `from_stored()` is written back unchanged.
    #[inline(always)]
    pub const fn to_stored(self) -> u16 {
        self.0 ^ ACTIVE_BIT
    }

    #[inline(always)]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline(always)]
    pub fn is_active(self) -> bool {
        self.0 & ACTIVE_BIT != 0
    }

    #[inline(always)]
    pub fn with_active(self) -> Self {
        Self(self.0 | ACTIVE_BIT)
    }

    #[inline(always)]
    pub fn r(self) -> u8 {
        (self.0 >> 10 & 0x1f) as u8
    }

    #[inline(always)]
    pub fn g(self) -> u8 {
        (self.0 >> 5 & 0x1f) as u8
    }

    #[inline(always)]
    pub fn b(self) -> u8 {
        (self.0 & 0x1f) as u8
    }

    #[inline(always)]
    pub fn rgb15(self) -> Rgb15 {
        Rgb15::new(self.r(), self.g(), self.b())
    }

    /// Packs 8-bit channels. The result doesn't have the marker bit set.
    /// Each channel is scaled by 31/255 with truncation, non-zero channels are never crushed to
    /// zero.
    pub fn from_rgb24(rgb: Rgb24) -> Self {
        #[inline(always)]
        fn channel(v: u8) -> u16 {
            let r = v as u16 * 31 / 255;
            if r == 0 && v != 0 {
                1
            } else {
                r
            }
        }
        let (r, g, b) = rgb.colors();
        Self(channel(r) << 10 | channel(g) << 5 | channel(b))
    }

    /// Lossy: every channel is multiplied by 8 (255 / 31 in integer arithmetic).
    #[inline(always)]
    pub fn to_rgb24(self) -> Rgb24 {
        self.rgb15().scale()
    }

    #[inline(always)]
    pub fn r8(self) -> u8 {
        self.to_rgb24().r()
    }

    #[inline(always)]
    pub fn g8(self) -> u8 {
        self.to_rgb24().g()
    }

    #[inline(always)]
    pub fn b8(self) -> u8 {
        self.to_rgb24().b()
    }
}

impl From<Rgb15> for HueColor {
    fn from(rgb: Rgb15) -> Self {
        Self(rgb.pack() as u16)
    }
}

impl fmt::Debug for HueColor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "HueColor(0x{:04x})", self.0)
    }
}

/// Packs 8-bit RGB into a 16-bit hue color without the marker bit.
pub fn rgb_to_hue_color(r: u8, g: u8, b: u8) -> u16 {
    HueColor::from_rgb24(Rgb24::new(r, g, b)).raw()
}

/// Unpacks a 16-bit hue color to 8-bit RGB. The marker bit is ignored.
pub fn hue_color_to_rgb(c: u16) -> (u8, u8, u8) {
    HueColor::from_raw(c).to_rgb24().colors()
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn rgb_to_hue_color_() {
        for &((r, g, b), exp) in &[
            ((0, 0, 0), (0, 0, 0)),
            ((255, 255, 255), (31, 31, 31)),
            ((1, 0, 0), (1, 0, 0)),
            ((0, 8, 9), (0, 1, 1)),
            ((128, 64, 16), (15, 7, 1)),
            ((254, 247, 246), (30, 30, 29)),
        ] {
            let c = HueColor::from_raw(rgb_to_hue_color(r, g, b));
            assert_eq!((c.r(), c.g(), c.b()), exp, "{:?}", (r, g, b));
            assert!(!c.is_active());
        }
    }

    #[test]
    fn non_zero_channel_is_never_black() {
        for v in 1..=255 {
            let c = HueColor::from_raw(rgb_to_hue_color(v, v, v));
            assert!(c.r() > 0 && c.g() > 0 && c.b() > 0, "{}", v);
        }
    }

    #[test]
    fn hue_color_to_rgb_is_lossy() {
        assert_eq!(hue_color_to_rgb(rgb_to_hue_color(255, 255, 255)), (248, 248, 248));
        assert_eq!(hue_color_to_rgb(rgb_to_hue_color(128, 64, 16)), (120, 56, 8));
        assert_eq!(hue_color_to_rgb(rgb_to_hue_color(1, 2, 3)), (8, 8, 8));
        assert_eq!(hue_color_to_rgb(0x8000 | 31 << 10), (248, 0, 0));
    }

    #[test]
    fn channels() {
        let c = HueColor::from_raw(0x8000 | 3 << 10 | 7 << 5 | 31);
        assert_eq!((c.r(), c.g(), c.b()), (3, 7, 31));
        assert_eq!((c.r8(), c.g8(), c.b8()), (24, 56, 248));
        assert_eq!(c.rgb15(), Rgb15::new(3, 7, 31));
        assert_eq!(HueColor::from(Rgb15::new(3, 7, 31)).with_active(), c);
    }

    #[test]
    fn stored_marker() {
        let c = HueColor::from_stored(0x1234);
        assert_eq!(c.raw(), 0x9234);
        assert!(c.is_active());
        assert_eq!(c.to_stored(), 0x1234);
        assert_eq!(HueColor::default().to_stored(), 0x8000);
    }

    #[test]
    fn scale() {
        assert_eq!(WHITE.scale::<Color8>(), Rgb24::new(248, 248, 248));
        assert_eq!(Rgb24::new(255, 128, 7).scale::<Color5>(), Rgb15::new(31, 16, 0));
        assert_eq!(Rgb15::from_packed(WHITE.pack()), WHITE);
        assert!(BLACK.is_gray());
    }
}
