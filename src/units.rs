//! Unit conversion between millimetres, inches and internal units
//!
//! Internal units are integer nanometres. Inch/mm conversion works on any
//! nesting of scalars, pairs, arrays and vectors through the [`Lengths`]
//! trait, and on runtime-shaped input through [`Length`].

use crate::error::{PcbError, PcbResult};

/// Internal units per millimetre
pub const IU_PER_MM: f64 = 1_000_000.0;

/// Millimetres per inch
pub const MM_PER_INCH: f64 = 25.4;

/// Largest magnitude in mm that still fits internal units
pub const MAX_MM: f64 = i64::MAX as f64 / IU_PER_MM;

/// Convert mm to internal units, rounding to the nearest unit
///
/// Non-finite and out-of-range values saturate; use [`try_mm_to_internal`]
/// where the input is not already known to be valid.
pub fn mm_to_internal(mm: f64) -> i64 {
    (mm * IU_PER_MM).round() as i64
}

/// Convert mm to internal units, failing on NaN, infinities and values
/// beyond the internal range
pub fn try_mm_to_internal(mm: f64) -> PcbResult<i64> {
    if !mm.is_finite() || mm.abs() >= MAX_MM {
        return Err(PcbError::InvalidLength {
            reason: format!("{} mm is not a representable length", mm),
        });
    }
    Ok(mm_to_internal(mm))
}

/// Convert internal units to mm
pub fn internal_to_mm(iu: i64) -> f64 {
    iu as f64 / IU_PER_MM
}

/// Values made of lengths that can be rescaled leaf by leaf
pub trait Lengths: Sized {
    /// Apply `f` to every scalar leaf, keeping the shape
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self;
}

impl Lengths for f64 {
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self {
        f(*self)
    }
}

impl<A: Lengths, B: Lengths> Lengths for (A, B) {
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self {
        (self.0.map_lengths(f), self.1.map_lengths(f))
    }
}

impl<T: Lengths, const N: usize> Lengths for [T; N] {
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self {
        std::array::from_fn(|i| self[i].map_lengths(f))
    }
}

impl<T: Lengths> Lengths for Vec<T> {
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self {
        self.iter().map(|v| v.map_lengths(f)).collect()
    }
}

/// Convert inches to mm, element-wise over nested values
pub fn inch_to_mm<T: Lengths>(value: &T) -> T {
    value.map_lengths(|v| v * MM_PER_INCH)
}

/// Convert mm to inches, element-wise over nested values
pub fn mm_to_inch<T: Lengths>(value: &T) -> T {
    value.map_lengths(|v| v / MM_PER_INCH)
}

/// A length tree whose shape is only known at runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Length {
    Scalar(f64),
    List(Vec<Length>),
}

impl Length {
    /// Parse a bracketed list expression such as `[[1, 2], [3.5, 4]]` or a
    /// bare number
    pub fn parse(input: &str) -> PcbResult<Self> {
        let value: serde_json::Value =
            serde_json::from_str(input).map_err(|e| PcbError::InvalidLength {
                reason: format!("{:?}: {}", input, e),
            })?;
        Self::from_json(&value)
    }

    fn from_json(value: &serde_json::Value) -> PcbResult<Self> {
        match value {
            serde_json::Value::Number(n) => {
                n.as_f64()
                    .map(Length::Scalar)
                    .ok_or_else(|| PcbError::InvalidLength {
                        reason: format!("{} is not representable as a float", n),
                    })
            }
            serde_json::Value::Array(items) => items
                .iter()
                .map(Self::from_json)
                .collect::<PcbResult<Vec<_>>>()
                .map(Length::List),
            other => Err(PcbError::InvalidLength {
                reason: format!("{} is not a number or a list", other),
            }),
        }
    }

    /// Number of scalar leaves
    pub fn leaf_count(&self) -> usize {
        match self {
            Length::Scalar(_) => 1,
            Length::List(items) => items.iter().map(Length::leaf_count).sum(),
        }
    }
}

impl Lengths for Length {
    fn map_lengths<F: Fn(f64) -> f64 + Copy>(&self, f: F) -> Self {
        match self {
            Length::Scalar(v) => Length::Scalar(f(*v)),
            Length::List(items) => Length::List(items.map_lengths(f)),
        }
    }
}

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Length::Scalar(v) => write!(f, "{}", v),
            Length::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
        }
    }
}
