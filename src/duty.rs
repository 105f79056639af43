use crate::airport::AirportCode;
use crate::crew::{AdditionalCrew, CrewType, RestFacility, RestSectors};
use crate::error::FtlError;
use crate::time::Hours;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandbyType {
    #[default]
    None,
    HomeStandby,
    AirportDuty,
    AirportStandby,
    Reserve,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandbyInputs {
    pub enabled: bool,
    pub kind: StandbyType,
    pub start: DateTime<Utc>,
    pub airport_duty_start: DateTime<Utc>,
    /// Only consulted for standby starting at night.
    pub contact: Option<DateTime<Utc>>,
}

impl StandbyInputs {
    pub fn disabled(at: DateTime<Utc>) -> StandbyInputs {
        StandbyInputs {
            enabled: false,
            kind: StandbyType::None,
            start: at,
            airport_duty_start: at,
            contact: None,
        }
    }

    /// The standby type that actually takes part in the calculation.
    pub fn active(&self) -> StandbyType {
        if self.enabled { self.kind } else { StandbyType::None }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accommodation {
    #[default]
    Accommodation,
    SuitableAccommodation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InFlightRest {
    pub facility: RestFacility,
    pub additional_crew: AdditionalCrew,
    pub long_flight: bool,
    pub sectors: RestSectors,
    /// In-flight rest available to each cabin crew member.
    pub cabin_rest_available: Hours,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitDuty {
    pub break_duration: Hours,
    pub break_begin: DateTime<Utc>,
    pub accommodation: Accommodation,
}

/// The FDP modifier in force. Only one family can apply to a duty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum ActiveModifier {
    #[default]
    None,
    InFlightRest(InFlightRest),
    SplitDuty(SplitDuty),
    ExtendedFdp,
}

impl ActiveModifier {
    pub fn is_extended_fdp(&self) -> bool {
        matches!(self, ActiveModifier::ExtendedFdp)
    }

    pub fn is_in_flight_rest_or_split_duty(&self) -> bool {
        matches!(self, ActiveModifier::InFlightRest(_) | ActiveModifier::SplitDuty(_))
    }
}

impl fmt::Display for ActiveModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActiveModifier::None => write!(f, "none"),
            ActiveModifier::InFlightRest(rest) => write!(
                f,
                "in-flight rest ({}, +{} crew{})",
                rest.facility,
                u8::from(rest.additional_crew),
                if rest.long_flight { ", long flight" } else { "" }
            ),
            ActiveModifier::SplitDuty(split) => write!(
                f,
                "split duty ({} break, {:?})",
                split.break_duration, split.accommodation
            ),
            ActiveModifier::ExtendedFdp => write!(f, "extended FDP"),
        }
    }
}

/// Toggle-style modifier settings as a host form records them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModifierFlags {
    pub in_flight_rest: bool,
    pub rest_facility: RestFacility,
    pub rest_sectors: RestSectors,
    pub long_flight: bool,
    pub additional_crew: AdditionalCrew,
    pub cabin_rest_available: Hours,
    pub split_duty: bool,
    pub break_duration: Hours,
    pub break_begin: Option<DateTime<Utc>>,
    pub accommodation: Accommodation,
    pub extended_fdp: bool,
}

impl ModifierFlags {
    /// Collapses the toggles into a single modifier.
    ///
    /// Precedence when several toggles are on: extended FDP, then in-flight rest,
    /// then split duty. A split duty without a recorded break start begins at report.
    pub fn resolve(&self, report: DateTime<Utc>) -> ActiveModifier {
        let enabled = [self.extended_fdp, self.in_flight_rest, self.split_duty]
            .iter()
            .filter(|on| **on)
            .count();
        if enabled > 1 {
            tracing::warn!(
                extended_fdp = self.extended_fdp,
                in_flight_rest = self.in_flight_rest,
                split_duty = self.split_duty,
                "more than one FDP modifier enabled, applying precedence"
            );
        }

        if self.extended_fdp {
            ActiveModifier::ExtendedFdp
        } else if self.in_flight_rest {
            ActiveModifier::InFlightRest(InFlightRest {
                facility: self.rest_facility,
                additional_crew: self.additional_crew,
                long_flight: self.long_flight,
                sectors: self.rest_sectors,
                cabin_rest_available: self.cabin_rest_available,
            })
        } else if self.split_duty {
            ActiveModifier::SplitDuty(SplitDuty {
                break_duration: self.break_duration,
                break_begin: self.break_begin.unwrap_or(report),
                accommodation: self.accommodation,
            })
        } else {
            ActiveModifier::None
        }
    }
}

/// Immutable snapshot of everything one FDP evaluation depends on.
#[derive(Debug, Clone, PartialEq)]
pub struct DutyInputs {
    pub home_base: AirportCode,
    pub secondary_home_base: Option<AirportCode>,
    pub report_location: AirportCode,
    pub report: DateTime<Utc>,
    /// 1 stands for "1-2 sectors".
    pub sectors: u8,
    pub timezone_difference: i32,
    pub elapsed_since_first_report: Hours,
    pub crew_type: CrewType,
    pub standby: StandbyInputs,
    pub modifier: ActiveModifier,
    pub estimated_block_time: Hours,
}

impl DutyInputs {
    pub fn new(
        home_base: AirportCode,
        report_location: AirportCode,
        report: DateTime<Utc>,
        sectors: u8,
        estimated_block_time: Hours,
    ) -> DutyInputs {
        DutyInputs {
            home_base,
            secondary_home_base: None,
            report_location,
            report,
            sectors,
            timezone_difference: 0,
            elapsed_since_first_report: Hours::ZERO,
            crew_type: CrewType::FlightCrew,
            standby: StandbyInputs::disabled(report),
            modifier: ActiveModifier::None,
            estimated_block_time,
        }
    }

    pub fn load_from_file(path: &str) -> Result<Self, FtlError> {
        let data = std::fs::read_to_string(path)?;
        let scenario: DutyScenario = serde_json::from_str(&data)?;
        Ok(scenario.into())
    }

    /// The instant every time-of-day lookup and projection starts from.
    pub fn reference_instant(&self) -> DateTime<Utc> {
        match self.standby.active() {
            StandbyType::AirportDuty => self.standby.airport_duty_start,
            _ => self.report,
        }
    }

    pub fn is_home_base(&self, code: &str) -> bool {
        *self.home_base == *code
            || self
                .secondary_home_base
                .as_ref()
                .is_some_and(|secondary| **secondary == *code)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandbyScenario {
    pub kind: StandbyType,
    pub start: DateTime<Utc>,
    #[serde(default)]
    pub airport_duty_start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub contact: Option<DateTime<Utc>>,
}

/// On-disk form of a duty, with modifiers kept as toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DutyScenario {
    pub home_base: AirportCode,
    #[serde(default)]
    pub secondary_home_base: Option<AirportCode>,
    pub report_location: AirportCode,
    pub report: DateTime<Utc>,
    pub sectors: u8,
    #[serde(default)]
    pub timezone_difference: i32,
    #[serde(default)]
    pub elapsed_since_first_report: Hours,
    #[serde(default)]
    pub crew_type: CrewType,
    #[serde(default)]
    pub standby: Option<StandbyScenario>,
    #[serde(default)]
    pub modifiers: ModifierFlags,
    pub estimated_block_time: Hours,
}

impl From<DutyScenario> for DutyInputs {
    fn from(raw: DutyScenario) -> Self {
        let standby = raw
            .standby
            .map(|s| StandbyInputs {
                enabled: s.kind != StandbyType::None,
                kind: s.kind,
                start: s.start,
                airport_duty_start: s.airport_duty_start.unwrap_or(s.start),
                contact: s.contact,
            })
            .unwrap_or_else(|| StandbyInputs::disabled(raw.report));

        DutyInputs {
            modifier: raw.modifiers.resolve(raw.report),
            home_base: raw.home_base,
            secondary_home_base: raw.secondary_home_base,
            report_location: raw.report_location,
            report: raw.report,
            sectors: raw.sectors,
            timezone_difference: raw.timezone_difference,
            elapsed_since_first_report: raw.elapsed_since_first_report,
            crew_type: raw.crew_type,
            standby,
            estimated_block_time: raw.estimated_block_time,
        }
    }
}

impl FromStr for StandbyType {
    type Err = FtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(StandbyType::None),
            "home" | "home_standby" => Ok(StandbyType::HomeStandby),
            "airport_duty" | "duty" => Ok(StandbyType::AirportDuty),
            "airport" | "airport_standby" => Ok(StandbyType::AirportStandby),
            "reserve" => Ok(StandbyType::Reserve),
            _ => Err(FtlError::InvalidValue { field: "standby type", value: s.to_string() }),
        }
    }
}

impl FromStr for Accommodation {
    type Err = FtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "acc" | "accommodation" => Ok(Accommodation::Accommodation),
            "suitable" | "suitable_accommodation" => Ok(Accommodation::SuitableAccommodation),
            _ => Err(FtlError::InvalidValue { field: "accommodation", value: s.to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeDelta, TimeZone};
    use std::sync::Arc;

    fn report() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 7, 0, 0).unwrap()
    }

    #[test]
    fn test_extended_fdp_takes_precedence() {
        let flags = ModifierFlags {
            extended_fdp: true,
            in_flight_rest: true,
            split_duty: true,
            ..Default::default()
        };
        assert_eq!(ActiveModifier::ExtendedFdp, flags.resolve(report()));
    }

    #[test]
    fn test_in_flight_rest_beats_split_duty() {
        let flags = ModifierFlags {
            in_flight_rest: true,
            rest_facility: RestFacility::Class2,
            split_duty: true,
            ..Default::default()
        };
        assert!(matches!(
            flags.resolve(report()),
            ActiveModifier::InFlightRest(InFlightRest { facility: RestFacility::Class2, .. })
        ));
    }

    #[test]
    fn test_split_duty_defaults_break_begin_to_report() {
        let flags = ModifierFlags {
            split_duty: true,
            break_duration: Hours(4.0),
            ..Default::default()
        };
        match flags.resolve(report()) {
            ActiveModifier::SplitDuty(split) => assert_eq!(report(), split.break_begin),
            other => panic!("unexpected modifier {:?}", other),
        }
    }

    #[test]
    fn test_reference_instant_follows_airport_duty() {
        let mut inputs = DutyInputs::new(Arc::from("LHR"), Arc::from("LHR"), report(), 2, Hours(2.0));
        let duty_start = report() - TimeDelta::hours(3);
        inputs.standby = StandbyInputs {
            enabled: true,
            kind: StandbyType::AirportDuty,
            start: duty_start,
            airport_duty_start: duty_start,
            contact: None,
        };
        assert_eq!(duty_start, inputs.reference_instant());

        inputs.standby.kind = StandbyType::AirportStandby;
        assert_eq!(report(), inputs.reference_instant());

        inputs.standby.enabled = false;
        inputs.standby.kind = StandbyType::AirportDuty;
        assert_eq!(report(), inputs.reference_instant());
    }

    #[test]
    fn test_scenario_from_json() {
        let json = r#"{
            "home_base": "LHR",
            "report_location": "LHR",
            "report": "2026-01-15T07:00:00Z",
            "sectors": 1,
            "standby": { "kind": "home_standby", "start": "2026-01-14T21:00:00Z" },
            "modifiers": { "split_duty": true, "break_duration": 4.0, "accommodation": "suitable_accommodation" },
            "estimated_block_time": 2.5
        }"#;
        let scenario: DutyScenario = serde_json::from_str(json).unwrap();
        let inputs = DutyInputs::from(scenario);

        assert_eq!(StandbyType::HomeStandby, inputs.standby.active());
        assert_eq!(inputs.standby.start, inputs.standby.airport_duty_start);
        assert!(inputs.modifier.is_in_flight_rest_or_split_duty());
        assert_eq!(Hours(2.5), inputs.estimated_block_time);
        assert!(inputs.is_home_base("LHR"));
        assert!(!inputs.is_home_base("JFK"));
    }
}
