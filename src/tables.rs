//! Regulatory lookup tables (UK ORO.FTL / CS FTL.1).
//!
//! The engine only ever reads limits through [`RegulatoryTables`], so a host
//! can swap in an operator's approved scheme. [`UkFtlTables`] carries the
//! published UK values.

use crate::crew::{AdditionalCrew, RestFacility};
use crate::time::Hours;
use chrono::{NaiveTime, Timelike};

/// Category tags of the acclimatisation table: `B` acclimatised to the
/// reference (home) time zone, `D` to the departure location, `X` unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcclimatisationTag {
    B,
    D,
    X,
}

pub trait RegulatoryTables {
    /// Maximum basic daily FDP for acclimatised crew. `sectors` is never below 2.
    fn acclimatised_fdp(&self, local_report: NaiveTime, sectors: u8) -> Hours;

    fn unknown_acclimatised_fdp(&self, sectors: u8) -> Hours;

    /// `None` where the regulation does not permit an extension.
    fn extended_fdp(&self, local_report: NaiveTime, sectors: u8) -> Option<Hours>;

    /// Maximum FDP for flight crew with in-flight rest; zero for `RestFacility::None`.
    fn in_flight_rest_fdp(
        &self,
        facility: RestFacility,
        additional_crew: AdditionalCrew,
        long_flight: bool,
    ) -> Hours;

    /// Maximum FDP for cabin crew given the in-flight rest each member gets.
    fn cabin_crew_max_fdp(&self, facility: RestFacility, rest_available: Hours) -> Option<Hours>;

    fn acclimatisation_tag(&self, timezone_difference: i32, elapsed: Hours) -> Option<AcclimatisationTag>;
}

const MINIMUM_FDP: Hours = Hours(9.0);
const SECTOR_STEP: Hours = Hours(0.5);
const MAX_TABLE_SECTORS: u8 = 10;

/// (band start in minutes past midnight, limit for 1-2 sectors)
const ACCLIMATISED_BANDS: [(u32, Hours); 14] = [
    (0, Hours::from_hm(11, 0)),
    (5 * 60, Hours::from_hm(12, 0)),
    (5 * 60 + 15, Hours::from_hm(12, 15)),
    (5 * 60 + 30, Hours::from_hm(12, 30)),
    (5 * 60 + 45, Hours::from_hm(12, 45)),
    (6 * 60, Hours::from_hm(13, 0)),
    (13 * 60 + 30, Hours::from_hm(12, 45)),
    (14 * 60, Hours::from_hm(12, 30)),
    (14 * 60 + 30, Hours::from_hm(12, 15)),
    (15 * 60, Hours::from_hm(12, 0)),
    (15 * 60 + 30, Hours::from_hm(11, 45)),
    (16 * 60, Hours::from_hm(11, 30)),
    (16 * 60 + 30, Hours::from_hm(11, 15)),
    (17 * 60, Hours::from_hm(11, 0)),
];

const UNKNOWN_ACCLIMATISED: [Hours; 4] = [
    Hours::from_hm(11, 0),
    Hours::from_hm(10, 30),
    Hours::from_hm(10, 0),
    Hours::from_hm(9, 30),
];

const fn hm(hours: u32, minutes: u32) -> Option<Hours> {
    Some(Hours::from_hm(hours, minutes))
}

/// (band start in minutes past midnight, limits for 1-2, 3, 4 and 5 sectors)
const EXTENDED_BANDS: [(u32, [Option<Hours>; 4]); 21] = [
    (0, [None, None, None, None]),
    (5 * 60, [hm(12, 15), hm(11, 45), hm(11, 15), None]),
    (5 * 60 + 15, [hm(12, 30), hm(12, 0), hm(11, 30), None]),
    (5 * 60 + 30, [hm(12, 45), hm(12, 15), hm(11, 45), None]),
    (5 * 60 + 45, [hm(13, 0), hm(12, 30), hm(12, 0), hm(11, 30)]),
    (6 * 60 + 15, [hm(13, 15), hm(12, 45), hm(12, 15), hm(11, 45)]),
    (6 * 60 + 30, [hm(13, 30), hm(13, 0), hm(12, 30), hm(12, 0)]),
    (6 * 60 + 45, [hm(13, 45), hm(13, 15), hm(12, 45), hm(12, 15)]),
    (7 * 60, [hm(14, 0), hm(13, 30), hm(13, 0), hm(12, 30)]),
    (13 * 60 + 30, [hm(13, 45), hm(13, 15), hm(12, 45), None]),
    (14 * 60, [hm(13, 30), hm(13, 0), hm(12, 30), None]),
    (14 * 60 + 30, [hm(13, 15), hm(12, 45), None, None]),
    (15 * 60, [hm(13, 0), hm(12, 30), None, None]),
    (15 * 60 + 30, [hm(12, 45), None, None, None]),
    (16 * 60, [hm(12, 30), None, None, None]),
    (16 * 60 + 30, [hm(12, 15), None, None, None]),
    (17 * 60, [hm(12, 0), None, None, None]),
    (17 * 60 + 30, [hm(11, 45), None, None, None]),
    (18 * 60, [hm(11, 30), None, None, None]),
    (18 * 60 + 30, [hm(11, 15), None, None, None]),
    (19 * 60, [None, None, None, None]),
];

/// (maximum FDP, minimum rest per cabin crew member for class 1, 2 and 3 facilities)
const CABIN_CREW_REST: [(Hours, [Option<Hours>; 3]); 8] = [
    (Hours::from_hm(14, 30), [hm(1, 30), hm(1, 30), hm(1, 30)]),
    (Hours::from_hm(15, 0), [hm(1, 45), hm(2, 0), hm(2, 20)]),
    (Hours::from_hm(15, 30), [hm(2, 0), hm(2, 20), hm(2, 40)]),
    (Hours::from_hm(16, 0), [hm(2, 15), hm(2, 40), hm(3, 0)]),
    (Hours::from_hm(16, 30), [hm(2, 35), hm(3, 0), None]),
    (Hours::from_hm(17, 0), [hm(3, 0), hm(3, 25), None]),
    (Hours::from_hm(17, 30), [hm(3, 25), None, None]),
    (Hours::from_hm(18, 0), [hm(3, 50), None, None]),
];

/// Published UK limits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UkFtlTables;

impl UkFtlTables {
    fn minutes_of_day(time: NaiveTime) -> u32 {
        time.hour() * 60 + time.minute()
    }

    fn band<T: Copy>(bands: &[(u32, T)], time: NaiveTime) -> T {
        let minute = Self::minutes_of_day(time);
        bands
            .iter()
            .rev()
            .find(|(start, _)| *start <= minute)
            .map(|(_, value)| *value)
            .unwrap_or(bands[0].1)
    }

    /// Column index counting the collapsed 1-2 sector column as zero.
    fn sector_column(sectors: u8) -> usize {
        sectors.saturating_sub(2) as usize
    }
}

impl RegulatoryTables for UkFtlTables {
    fn acclimatised_fdp(&self, local_report: NaiveTime, sectors: u8) -> Hours {
        let base = Self::band(&ACCLIMATISED_BANDS, local_report);
        let column = Self::sector_column(sectors.min(MAX_TABLE_SECTORS));
        (base - SECTOR_STEP * column as f64).max(MINIMUM_FDP)
    }

    fn unknown_acclimatised_fdp(&self, sectors: u8) -> Hours {
        UNKNOWN_ACCLIMATISED
            .get(Self::sector_column(sectors))
            .copied()
            .unwrap_or(MINIMUM_FDP)
    }

    fn extended_fdp(&self, local_report: NaiveTime, sectors: u8) -> Option<Hours> {
        let row = Self::band(&EXTENDED_BANDS, local_report);
        row.get(Self::sector_column(sectors)).copied().flatten()
    }

    fn in_flight_rest_fdp(
        &self,
        facility: RestFacility,
        additional_crew: AdditionalCrew,
        long_flight: bool,
    ) -> Hours {
        let base = match facility {
            RestFacility::None => return Hours::ZERO,
            RestFacility::Class1 => Hours(16.0),
            RestFacility::Class2 => Hours(15.0),
            RestFacility::Class3 => Hours(14.0),
        };
        let crew = match additional_crew {
            AdditionalCrew::One => Hours::ZERO,
            AdditionalCrew::Two => Hours(1.0),
        };
        let long = if long_flight { Hours(1.0) } else { Hours::ZERO };
        base + crew + long
    }

    fn cabin_crew_max_fdp(&self, facility: RestFacility, rest_available: Hours) -> Option<Hours> {
        let column = match facility {
            RestFacility::None => return None,
            RestFacility::Class1 => 0,
            RestFacility::Class2 => 1,
            RestFacility::Class3 => 2,
        };
        CABIN_CREW_REST
            .iter()
            .filter(|(_, rest)| {
                rest[column].is_some_and(|minimum| minimum.minutes() <= rest_available.minutes())
            })
            .map(|(max_fdp, _)| *max_fdp)
            .last()
    }

    fn acclimatisation_tag(&self, timezone_difference: i32, elapsed: Hours) -> Option<AcclimatisationTag> {
        use AcclimatisationTag::{B, D, X};

        if !elapsed.0.is_finite() || elapsed.0 < 0.0 {
            return None;
        }
        let row = match timezone_difference.unsigned_abs() {
            0..4 => [B, D, D, D, D],
            4..=6 => [B, X, D, D, D],
            7..=9 => [B, X, X, D, D],
            _ => [B, X, X, X, D],
        };
        let column = match elapsed.0 {
            e if e < 48.0 => 0,
            e if e < 72.0 => 1,
            e if e < 96.0 => 2,
            e if e < 120.0 => 3,
            _ => 4,
        };
        Some(row[column])
    }
}
