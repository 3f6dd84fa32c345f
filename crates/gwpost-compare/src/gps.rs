//! GPS timestamps as they appear in file names.

use std::fmt;

use serde::{Serialize, Serializer};

/// A GPS time split into whole seconds and nanoseconds.
///
/// Displays as the integer second when the fractional part is zero,
/// otherwise as a decimal with trailing zeros trimmed.
///
/// ```
/// use gwpost_compare::gps::GpsTime;
///
/// assert_eq!(GpsTime::new(966_384_015, 0).to_string(), "966384015");
/// assert_eq!(GpsTime::new(966_384_015, 500_000_000).to_string(), "966384015.5");
/// assert_eq!(GpsTime::new(7, 1).to_string(), "7.000000001");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GpsTime {
    seconds: i64,
    nanoseconds: u32,
}

impl GpsTime {
    pub const NANOS_PER_SECOND: u32 = 1_000_000_000;

    /// Builds a time, carrying whole seconds out of `nanoseconds`.
    #[must_use]
    pub fn new(seconds: i64, nanoseconds: u32) -> Self {
        Self {
            seconds: seconds + i64::from(nanoseconds / Self::NANOS_PER_SECOND),
            nanoseconds: nanoseconds % Self::NANOS_PER_SECOND,
        }
    }

    /// Builds a time from the seconds and nanoseconds columns of a table.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[must_use]
    pub fn from_columns(seconds: f64, nanoseconds: f64) -> Self {
        let whole = seconds.floor();
        let carried = ((seconds - whole) * f64::from(Self::NANOS_PER_SECOND)).round();
        let nanoseconds = (carried + nanoseconds.max(0.0).round()) as u64;
        let extra = nanoseconds / u64::from(Self::NANOS_PER_SECOND);
        Self {
            seconds: whole as i64 + extra as i64,
            nanoseconds: (nanoseconds % u64::from(Self::NANOS_PER_SECOND)) as u32,
        }
    }

    #[must_use]
    pub fn seconds(self) -> i64 {
        self.seconds
    }

    #[must_use]
    pub fn nanoseconds(self) -> u32 {
        self.nanoseconds
    }

    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.seconds as f64 + f64::from(self.nanoseconds) * 1e-9
    }
}

impl fmt::Display for GpsTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanoseconds == 0 {
            return write!(f, "{}", self.seconds);
        }
        let fraction = format!("{:09}", self.nanoseconds);
        write!(f, "{}.{}", self.seconds, fraction.trim_end_matches('0'))
    }
}

impl Serialize for GpsTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}
