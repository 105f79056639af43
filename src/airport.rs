use crate::error::FtlError;
use chrono::{DateTime, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fmt::Formatter;
use std::sync::Arc;
use tabled::Tabled;

pub type AirportCode = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Airport {
    pub code: AirportCode,
    pub timezone: Tz,
}

impl fmt::Display for Airport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code)
    }
}

/// Clock conversions the engine needs; everything it knows about airports goes through here.
pub trait TimeResolver {
    fn local_time(&self, instant: DateTime<Utc>, airport: &str) -> Result<NaiveTime, FtlError>;

    fn utc_time(&self, local: NaiveDateTime, airport: &str) -> Result<DateTime<Utc>, FtlError>;
}

pub struct AirportDirectory {
    airports: HashMap<AirportCode, Airport>,
}

impl AirportDirectory {
    pub fn new(airports: Vec<Airport>) -> AirportDirectory {
        AirportDirectory {
            airports: airports
                .into_iter()
                .map(|a| (a.code.clone(), a))
                .collect(),
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, FtlError> {
        let data = std::fs::read_to_string(path)?;
        #[derive(Deserialize)]
        struct RawData {
            airports: Vec<Airport>,
        }
        let raw: RawData = serde_json::from_str(&data)?;
        tracing::debug!(count = raw.airports.len(), path, "loaded airport directory");
        Ok(AirportDirectory::new(raw.airports))
    }

    pub fn get(&self, code: &str) -> Option<&Airport> {
        self.airports.get(code)
    }

    pub fn airports(&self) -> Vec<&Airport> {
        let mut airports = self.airports.values().collect::<Vec<_>>();
        airports.sort_by(|a, b| a.code.cmp(&b.code));
        airports
    }

    fn timezone(&self, code: &str) -> Result<Tz, FtlError> {
        self.get(code)
            .map(|a| a.timezone)
            .ok_or_else(|| FtlError::UnknownAirport(code.to_string()))
    }
}

impl TimeResolver for AirportDirectory {
    fn local_time(&self, instant: DateTime<Utc>, airport: &str) -> Result<NaiveTime, FtlError> {
        let tz = self.timezone(airport)?;
        Ok(instant.with_timezone(&tz).time())
    }

    /// Ambiguous wall-clock times (end of DST) resolve to the earlier instant.
    fn utc_time(&self, local: NaiveDateTime, airport: &str) -> Result<DateTime<Utc>, FtlError> {
        let tz = self.timezone(airport)?;
        tz.from_local_datetime(&local)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| FtlError::NonexistentLocalTime {
                time: local.to_string(),
                airport: airport.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn directory() -> AirportDirectory {
        AirportDirectory::new(vec![
            Airport { code: Arc::from("LHR"), timezone: chrono_tz::Europe::London },
            Airport { code: Arc::from("JFK"), timezone: chrono_tz::America::New_York },
        ])
    }

    #[test]
    fn test_local_time_follows_dst() {
        let dir = directory();
        let winter = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
        let summer = Utc.with_ymd_and_hms(2026, 7, 15, 6, 0, 0).unwrap();

        assert_eq!(NaiveTime::from_hms_opt(6, 0, 0).unwrap(), dir.local_time(winter, "LHR").unwrap());
        assert_eq!(NaiveTime::from_hms_opt(7, 0, 0).unwrap(), dir.local_time(summer, "LHR").unwrap());
        assert_eq!(NaiveTime::from_hms_opt(1, 0, 0).unwrap(), dir.local_time(winter, "JFK").unwrap());
    }

    #[test]
    fn test_utc_time_inverts_local_time() {
        let dir = directory();
        let local = NaiveDate::from_ymd_opt(2026, 7, 15)
            .unwrap()
            .and_hms_opt(7, 0, 0)
            .unwrap();
        let utc = dir.utc_time(local, "LHR").unwrap();
        assert_eq!(Utc.with_ymd_and_hms(2026, 7, 15, 6, 0, 0).unwrap(), utc);
        assert_eq!(local.time(), dir.local_time(utc, "LHR").unwrap());
    }

    #[test]
    fn test_nonexistent_local_time() {
        let dir = directory();
        // clocks go forward at 01:00 on the last Sunday of March
        let local = NaiveDate::from_ymd_opt(2026, 3, 29)
            .unwrap()
            .and_hms_opt(1, 30, 0)
            .unwrap();
        assert!(matches!(
            dir.utc_time(local, "LHR"),
            Err(FtlError::NonexistentLocalTime { .. })
        ));
    }

    #[test]
    fn test_unknown_airport() {
        let dir = directory();
        let instant = Utc.with_ymd_and_hms(2026, 1, 15, 6, 0, 0).unwrap();
        assert!(matches!(
            dir.local_time(instant, "XXX"),
            Err(FtlError::UnknownAirport(code)) if code == "XXX"
        ));
    }
}
