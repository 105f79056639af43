use crate::error::FtlError;
use chrono::{DateTime, NaiveTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

/// Decimal hours, the unit every regulatory limit is expressed in.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Hours(pub f64);

impl Hours {
    pub const ZERO: Hours = Hours(0.0);

    pub const fn from_hm(hours: u32, minutes: u32) -> Hours {
        Hours(hours as f64 + minutes as f64 / 60.0)
    }

    /// Position of a clock time within its day, e.g. 05:45 -> 5.75.
    pub fn of_day(time: NaiveTime) -> Hours {
        Hours(time.hour() as f64 + time.minute() as f64 / 60.0 + time.second() as f64 / 3600.0)
    }

    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Hours {
        Hours((to - from).num_seconds() as f64 / 3600.0)
    }

    /// Fails for durations chrono cannot represent.
    pub fn to_delta(self) -> Result<TimeDelta, FtlError> {
        TimeDelta::try_seconds((self.0 * 3600.0).round() as i64).ok_or_else(|| self.out_of_range())
    }

    /// `instant` moved forward by this duration.
    pub fn after(self, instant: DateTime<Utc>) -> Result<DateTime<Utc>, FtlError> {
        instant
            .checked_add_signed(self.to_delta()?)
            .ok_or_else(|| self.out_of_range())
    }

    /// `instant` moved back by this duration.
    pub fn before(self, instant: DateTime<Utc>) -> Result<DateTime<Utc>, FtlError> {
        instant
            .checked_sub_signed(self.to_delta()?)
            .ok_or_else(|| self.out_of_range())
    }

    fn out_of_range(self) -> FtlError {
        FtlError::InvalidValue {
            field: "duration",
            value: self.0.to_string(),
        }
    }

    /// Rounded to whole minutes, used wherever limits are compared against each other.
    pub fn minutes(self) -> i64 {
        (self.0 * 60.0).round() as i64
    }

    pub fn max(self, other: Hours) -> Hours {
        Hours(self.0.max(other.0))
    }

    pub fn min(self, other: Hours) -> Hours {
        Hours(self.0.min(other.0))
    }

    /// Length of the intersection of two half-open spans, zero when they do not meet.
    pub fn overlap(span: &(Hours, Hours), window: &(Hours, Hours)) -> Hours {
        let from = span.0.max(window.0);
        let to = span.1.min(window.1);
        (to - from).max(Hours::ZERO)
    }
}

impl std::fmt::Display for Hours {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let total = self.minutes();
        let sign = if total < 0 { "-" } else { "" };
        let total = total.abs();
        write!(f, "{}{:02}:{:02}", sign, total / 60, total % 60)
    }
}

impl FromStr for Hours {
    type Err = FtlError;

    /// Accepts either `HH:MM` or decimal hours (`4.5`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || FtlError::InvalidTime(s.to_string());
        match s.split_once(':') {
            Some((h, m)) => {
                let hours = h.trim().parse::<u32>().map_err(|_| invalid())?;
                let minutes = m.trim().parse::<u32>().map_err(|_| invalid())?;
                if minutes >= 60 {
                    return Err(invalid());
                }
                Ok(Hours::from_hm(hours, minutes))
            }
            None => {
                let value = s.trim().parse::<f64>().map_err(|_| invalid())?;
                if value.is_finite() {
                    Ok(Hours(value))
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

impl Add<Hours> for Hours {
    type Output = Self;

    fn add(self, rhs: Hours) -> Self::Output {
        Hours(self.0 + rhs.0)
    }
}

impl Sub<Hours> for Hours {
    type Output = Self;

    fn sub(self, rhs: Hours) -> Self::Output {
        Hours(self.0 - rhs.0)
    }
}

impl AddAssign<Hours> for Hours {
    fn add_assign(&mut self, rhs: Hours) {
        self.0 += rhs.0;
    }
}

impl Mul<f64> for Hours {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Hours(self.0 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_display_as_clock() {
        assert_eq!("13:15", Hours(13.25).to_string());
        assert_eq!("09:00", Hours(9.0).to_string());
        assert_eq!("-01:30", Hours(-1.5).to_string());
        assert_eq!("02:20", Hours::from_hm(2, 20).to_string());
    }

    #[test]
    fn test_parse_clock_and_decimal() {
        assert_eq!(Hours(4.5), "04:30".parse::<Hours>().unwrap());
        assert_eq!(Hours(4.5), "4.5".parse::<Hours>().unwrap());
        assert!("4:75".parse::<Hours>().is_err());
        assert!("soon".parse::<Hours>().is_err());
        assert!("inf".parse::<Hours>().is_err());
    }

    #[test]
    fn test_overlap() {
        let wocl = (Hours(2.0), Hours(6.0));
        assert_eq!(Hours(2.0), Hours::overlap(&(Hours(4.0), Hours(12.0)), &wocl));
        assert_eq!(Hours(4.0), Hours::overlap(&(Hours(0.0), Hours(8.0)), &wocl));
        assert_eq!(Hours::ZERO, Hours::overlap(&(Hours(10.0), Hours(14.0)), &wocl));
    }

    #[test]
    fn test_of_day_and_between() {
        let time = NaiveTime::from_hms_opt(5, 45, 0).unwrap();
        assert_eq!(Hours(5.75), Hours::of_day(time));

        let from = Utc.with_ymd_and_hms(2026, 1, 15, 22, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2026, 1, 16, 8, 30, 0).unwrap();
        assert_eq!(Hours(10.5), Hours::between(from, to));
        assert_eq!(to, Hours(10.5).after(from).unwrap());
        assert_eq!(from, Hours(10.5).before(to).unwrap());
    }

    #[test]
    fn test_unrepresentable_duration_is_an_error() {
        let from = Utc.with_ymd_and_hms(2026, 1, 15, 22, 0, 0).unwrap();
        assert!(matches!(
            Hours(1e12).after(from),
            Err(FtlError::InvalidValue { field: "duration", .. })
        ));
        assert!(Hours(1e12).before(from).is_err());
        assert!(Hours(f64::MAX).to_delta().is_err());
    }
}
