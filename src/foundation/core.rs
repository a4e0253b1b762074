use crate::foundation::error::{QuizError, QuizResult};

pub use kurbo::{Point, Rect};

/// Absolute 0-based index of an output video frame.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// A duration in whole milliseconds.
///
/// Timeline arithmetic is done on integers so that summed durations are exact.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Zero duration.
    pub const ZERO: Self = Self(0);

    /// Convert seconds to milliseconds, rounding to the nearest millisecond.
    pub fn from_secs_f64(secs: f64) -> QuizResult<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return Err(QuizError::validation(format!(
                "duration must be finite and >= 0 (got {secs})"
            )));
        }
        Ok(Self((secs * 1000.0).round() as u64))
    }

    /// Duration in seconds.
    pub fn as_secs_f64(self) -> f64 {
        (self.0 as f64) / 1000.0
    }
}

impl std::ops::Add for Millis {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::AddAssign for Millis {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl std::iter::Sum for Millis {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, m| acc + m)
    }
}

/// Frames-per-second represented as a rational `num/den`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> QuizResult<Self> {
        if den == 0 {
            return Err(QuizError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(QuizError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Frame index reached at the given time offset, rounded to the nearest frame.
    ///
    /// Half-way values round up.
    pub fn frames_at(self, offset: Millis) -> u64 {
        let num = u128::from(offset.0) * u128::from(self.num) * 2 + 1000 * u128::from(self.den);
        let den = 2000 * u128::from(self.den);
        (num / den) as u64
    }
}

/// Canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Canvas grown by `border` pixels on each side.
    pub fn expanded(self, border: u32) -> Self {
        Self {
            width: self.width.saturating_add(border.saturating_mul(2)),
            height: self.height.saturating_add(border.saturating_mul(2)),
        }
    }

    /// Number of bytes of a tightly packed RGBA8 buffer of this size.
    pub fn rgba8_len(self) -> usize {
        (self.width as usize)
            .saturating_mul(self.height as usize)
            .saturating_mul(4)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
