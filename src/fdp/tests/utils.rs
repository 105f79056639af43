use crate::airport::{Airport, AirportDirectory};
use crate::crew::{AdditionalCrew, RestFacility, RestSectors};
use crate::duty::{Accommodation, DutyInputs, InFlightRest, SplitDuty, StandbyInputs, StandbyType};
use crate::fdp::FdpCalculator;
use crate::tables::UkFtlTables;
use crate::time::Hours;
use chrono::{DateTime, Utc};
use proptest::prelude::Strategy;
use proptest::prop_oneof;
use proptest::strategy::Just;
use std::sync::Arc;

pub fn id(s: &str) -> Arc<str> {
    Arc::from(s)
}

/// All scenarios run in January, when London is on UTC.
pub fn utc(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn directory() -> AirportDirectory {
    AirportDirectory::new(vec![
        Airport { code: id("LHR"), timezone: chrono_tz::Europe::London },
        Airport { code: id("LGW"), timezone: chrono_tz::Europe::London },
        Airport { code: id("JFK"), timezone: chrono_tz::America::New_York },
        Airport { code: id("DXB"), timezone: chrono_tz::Asia::Dubai },
        Airport { code: id("SIN"), timezone: chrono_tz::Asia::Singapore },
    ])
}

pub fn duty(report: &str, sectors: u8) -> DutyInputs {
    DutyInputs::new(id("LHR"), id("LHR"), utc(report), sectors, Hours(2.0))
}

pub fn calculator(inputs: DutyInputs) -> FdpCalculator {
    FdpCalculator::new(inputs, UkFtlTables, directory())
}

pub fn standby(inputs: &mut DutyInputs, kind: StandbyType, start: &str, contact: Option<&str>) {
    inputs.standby = StandbyInputs {
        enabled: true,
        kind,
        start: utc(start),
        airport_duty_start: utc(start),
        contact: contact.map(utc),
    };
}

pub fn split(break_duration: f64, begin: &str, accommodation: Accommodation) -> SplitDuty {
    SplitDuty {
        break_duration: Hours(break_duration),
        break_begin: utc(begin),
        accommodation,
    }
}

pub fn rest(facility: RestFacility, additional_crew: AdditionalCrew, long_flight: bool) -> InFlightRest {
    InFlightRest {
        facility,
        additional_crew,
        long_flight,
        sectors: RestSectors::OneOrTwo,
        cabin_rest_available: Hours::ZERO,
    }
}

pub fn arb_facility() -> impl Strategy<Value = RestFacility> {
    prop_oneof![
        Just(RestFacility::None),
        Just(RestFacility::Class1),
        Just(RestFacility::Class2),
        Just(RestFacility::Class3),
    ]
}

pub fn arb_standby_type() -> impl Strategy<Value = StandbyType> {
    prop_oneof![
        Just(StandbyType::None),
        Just(StandbyType::HomeStandby),
        Just(StandbyType::AirportDuty),
        Just(StandbyType::AirportStandby),
        Just(StandbyType::Reserve),
    ]
}
