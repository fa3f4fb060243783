use thiserror::Error;

/// A volume with exactly three decimal places of precision.
///
/// Volumes are stored as a signed count of thousandths so that sums are
/// exact: an allocation must reproduce its measured total to the last
/// decimal, which floating-point accumulation cannot promise. Values are
/// only ever converted to `f64` at the edges (parsing, display, variance).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "f64", into = "f64")
)]
pub struct Volume(i64);

/// The ways in which a floating-point quantity may not be representable as a [`Volume`].
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum VolumeError {
    /// NaN or infinite input
    #[error("volume must be finite, got {0}")]
    NonFinite(f64),
    /// Input too large to hold in thousandths
    #[error("volume {0} is out of range")]
    OutOfRange(f64),
}

impl Volume {
    /// The number of thousandths in one unit of volume
    pub const SCALE: i64 = 1000;

    /// The zero volume
    pub const ZERO: Self = Self(0);

    /// Construct a volume directly from a count of thousandths.
    pub const fn from_thousandths(thousandths: i64) -> Self {
        Self(thousandths)
    }

    /// The volume as a count of thousandths.
    pub const fn thousandths(self) -> i64 {
        self.0
    }

    /// Convert a floating-point quantity, rounding half away from zero to three decimals.
    pub fn from_f64(value: f64) -> Result<Self, VolumeError> {
        if !value.is_finite() {
            return Err(VolumeError::NonFinite(value));
        }
        let scaled = (value * Self::SCALE as f64).round();
        // i64::MAX is not exactly representable; compare against 2^63
        if scaled >= 9_223_372_036_854_775_808.0 || scaled < -9_223_372_036_854_775_808.0 {
            return Err(VolumeError::OutOfRange(value));
        }
        Ok(Self(scaled as i64))
    }

    /// The volume as a floating-point quantity.
    pub fn as_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Whether this volume is exactly zero.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<f64> for Volume {
    type Error = VolumeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::from_f64(value)
    }
}

impl From<Volume> for f64 {
    fn from(value: Volume) -> Self {
        value.as_f64()
    }
}

impl std::ops::Add for Volume {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::AddAssign for Volume {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl std::ops::Sub for Volume {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Volume {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> std::iter::Sum<&'a Volume> for Volume {
    fn sum<I: Iterator<Item = &'a Volume>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:03}", abs / 1000, abs % 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rounds_half_away_from_zero() {
        // 0.0625 is exact in binary, so the scaled value sits exactly on the half
        assert_eq!(Volume::from_f64(0.0625).unwrap().thousandths(), 63);
        assert_eq!(Volume::from_f64(-0.0625).unwrap().thousandths(), -63);
        assert_eq!(Volume::from_f64(0.1).unwrap().thousandths(), 100);
        assert_eq!(Volume::from_f64(100.0).unwrap().thousandths(), 100_000);
    }

    #[test]
    fn test_rejects_unrepresentable() {
        assert!(matches!(
            Volume::from_f64(f64::NAN),
            Err(VolumeError::NonFinite(_))
        ));
        assert!(matches!(
            Volume::from_f64(f64::INFINITY),
            Err(VolumeError::NonFinite(_))
        ));
        assert!(matches!(
            Volume::from_f64(1e300),
            Err(VolumeError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(Volume::from_thousandths(334).to_string(), "0.334");
        assert_eq!(Volume::from_thousandths(-60_000).to_string(), "-60.000");
        assert_eq!(Volume::ZERO.to_string(), "0.000");
    }

    #[test]
    fn test_sum_is_exact() {
        let parts = [0.1, 0.2, 0.3].map(|x| Volume::from_f64(x).unwrap());
        let total: Volume = parts.iter().sum();
        assert_eq!(total, Volume::from_f64(0.6).unwrap());
    }

    #[test]
    fn test_serde_as_number() {
        let v: Volume = serde_json::from_str("12.3456").unwrap();
        assert_eq!(v.thousandths(), 12_346);
        assert_eq!(serde_json::to_string(&v).unwrap(), "12.346");
    }
}
