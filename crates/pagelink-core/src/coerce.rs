#![forbid(unsafe_code)]

//! Lenient numeric coercion.
//!
//! Pagination never rejects a page count or index. Every input is turned
//! into an integer and then clamped into range: non-numeric input becomes
//! `0`, fractions truncate toward zero, and out-of-range values snap to the
//! nearest bound.

/// A value that can be read as a page count or page index.
pub trait PageNumber {
    /// Convert to an integer, degrading to `0` when the input has no
    /// numeric reading.
    fn to_page_number(&self) -> i64;
}

macro_rules! impl_page_number_int {
    ($($ty:ty),*) => {
        $(
            impl PageNumber for $ty {
                #[inline]
                fn to_page_number(&self) -> i64 {
                    let saturated = if *self > 0 as $ty { i64::MAX } else { i64::MIN };
                    i64::try_from(*self).unwrap_or(saturated)
                }
            }
        )*
    };
}

impl_page_number_int!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

impl PageNumber for f64 {
    fn to_page_number(&self) -> i64 {
        if self.is_finite() {
            // `as` saturates at the i64 bounds.
            self.trunc() as i64
        } else {
            0
        }
    }
}

impl PageNumber for f32 {
    fn to_page_number(&self) -> i64 {
        f64::from(*self).to_page_number()
    }
}

impl PageNumber for bool {
    fn to_page_number(&self) -> i64 {
        i64::from(*self)
    }
}

impl PageNumber for str {
    fn to_page_number(&self) -> i64 {
        let text = self.trim();
        if text.is_empty() {
            return 0;
        }
        if let Ok(n) = text.parse::<i64>() {
            return n;
        }
        text.parse::<f64>().map_or(0, |f| f.to_page_number())
    }
}

impl PageNumber for String {
    fn to_page_number(&self) -> i64 {
        self.as_str().to_page_number()
    }
}

impl PageNumber for serde_json::Value {
    fn to_page_number(&self) -> i64 {
        match self {
            Self::Number(n) => n
                .as_i64()
                .or_else(|| n.as_u64().map(|u| u.to_page_number()))
                .unwrap_or_else(|| n.as_f64().map_or(0, |f| f.to_page_number())),
            Self::String(s) => s.to_page_number(),
            Self::Bool(b) => b.to_page_number(),
            Self::Null | Self::Array(_) | Self::Object(_) => 0,
        }
    }
}

impl<T: PageNumber + ?Sized> PageNumber for &T {
    fn to_page_number(&self) -> i64 {
        (**self).to_page_number()
    }
}

/// Clamp a raw page count to the single-page floor.
#[must_use]
pub fn clamp_length(raw: i64) -> usize {
    usize::try_from(raw.max(1)).unwrap_or(usize::MAX)
}

/// Clamp a raw index into `[0, length - 1]`.
///
/// A `length` of zero is treated as one page.
#[must_use]
pub fn clamp_index(raw: i64, length: usize) -> usize {
    let last = length.max(1) - 1;
    usize::try_from(raw.max(0)).map_or(last, |i| i.min(last))
}

/// Clamp a raw range count (lead, trail, radius) to zero or more.
#[must_use]
pub fn clamp_count(raw: i64) -> usize {
    usize::try_from(raw.max(0)).unwrap_or(usize::MAX)
}
