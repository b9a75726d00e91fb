pub mod array2d;

pub trait VecExt<T> {
    fn with_default(len: usize) -> Vec<T>
        where T: Default
    {
        Self::from_fn(len, |_| T::default())
    }

    fn from_fn(len: usize, f: impl Fn(usize) -> T) -> Vec<T> {
        let mut r = Vec::with_capacity(len);
        for i in 0..len {
            r.push(f(i));
        }
        r
    }
}

impl<T> VecExt<T> for Vec<T> {}

/// Trims ASCII whitespace from both ends of a byte string.
pub fn trim_ascii(mut s: &[u8]) -> &[u8] {
    while let Some(c) = s.first() {
        if c.is_ascii_whitespace() {
            s = &s[1..];
        } else {
            break;
        }
    }
    while let Some(c) = s.last() {
        if c.is_ascii_whitespace() {
            s = &s[..s.len() - 1];
        } else {
            break;
        }
    }
    s
}
