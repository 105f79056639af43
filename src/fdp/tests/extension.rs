use crate::crew::{AdditionalCrew, CrewType, RestFacility, RestSectors};
use crate::duty::Accommodation::{Accommodation, SuitableAccommodation};
use crate::fdp::Warning;
use crate::fdp::extension::{Extension, accommodation_break, before_wocl, split_duty_extension, wocl_overlap};
use crate::fdp::tests::utils::{calculator, duty, rest, split};
use crate::time::Hours;
use chrono::NaiveTime;

fn at(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

#[test]
fn test_suitable_accommodation_counts_whole_break() {
    let s = split(4.0, "2026-01-15T11:00:00Z", SuitableAccommodation);
    assert_eq!(Hours(2.0), split_duty_extension(&s, at(11, 0)));

    // suitable accommodation is not limited by the WOCL
    let s = split(8.0, "2026-01-15T04:00:00Z", SuitableAccommodation);
    assert_eq!(Hours(4.0), split_duty_extension(&s, at(4, 0)));
}

#[test]
fn test_accommodation_break_inside_wocl() {
    let s = split(8.0, "2026-01-15T04:00:00Z", Accommodation);
    let extension = split_duty_extension(&s, at(4, 0));
    assert!(extension <= Hours(1.0));
    assert_eq!(Hours::ZERO, extension);
}

#[test]
fn test_accommodation_break_after_two_counts_nothing() {
    assert_eq!(Hours::ZERO, accommodation_break(Hours(10.0), Hours(4.0)));
    assert_eq!(Hours::ZERO, accommodation_break(Hours(10.0), Hours(8.0)));
    let s = split(8.0, "2026-01-15T10:00:00Z", Accommodation);
    assert_eq!(Hours::ZERO, split_duty_extension(&s, at(10, 0)));
}

#[test]
fn test_before_wocl_runs_to_two_local() {
    assert_eq!(Hours(1.0), before_wocl(Hours(1.0)));
    assert_eq!(Hours::ZERO, before_wocl(Hours(2.0)));
    assert_eq!(Hours::ZERO, before_wocl(Hours(10.0)));
    assert_eq!(Hours::ZERO, before_wocl(Hours(23.0)));
}

#[test]
fn test_accommodation_break_across_midnight() {
    // 23:00-04:00: two hours inside the next WOCL, and the break begins after 02:00
    assert_eq!(Hours(2.0), wocl_overlap(Hours(23.0), Hours(5.0)));
    assert_eq!(Hours::ZERO, accommodation_break(Hours(23.0), Hours(5.0)));
}

#[test]
fn test_accommodation_break_from_midnight_is_capped() {
    // 00:00-08:00: capped to 6h, four of them inside the WOCL
    assert_eq!(Hours(4.0), wocl_overlap(Hours::ZERO, Hours(8.0)));
    assert_eq!(Hours(2.0), accommodation_break(Hours::ZERO, Hours(8.0)));
    let s = split(8.0, "2026-01-15T00:00:00Z", Accommodation);
    assert_eq!(Hours(1.0), split_duty_extension(&s, at(0, 0)));
}

#[test]
fn test_accommodation_break_starting_before_wocl() {
    // 00:30-04:30
    assert_eq!(Hours(2.5), wocl_overlap(Hours(0.5), Hours(4.0)));
    assert_eq!(Hours(1.5), accommodation_break(Hours(0.5), Hours(4.0)));
}

#[test]
fn test_wocl_overlap_without_midnight_crossing() {
    assert_eq!(Hours::ZERO, wocl_overlap(Hours(20.0), Hours(3.0)));
    assert_eq!(Hours(2.0), wocl_overlap(Hours(1.0), Hours(3.0)));
    assert_eq!(Hours(4.0), wocl_overlap(Hours(1.0), Hours(6.0)));
}

#[test]
fn test_split_duty_adds_to_base() {
    let mut calc = calculator(duty("2026-01-15T07:00:00Z", 2));
    calc.set_split_duty(split(4.0, "2026-01-15T11:00:00Z", SuitableAccommodation));

    let result = calc.result().unwrap();
    assert_eq!(Extension::Additive(Hours(2.0)), result.extension);
    assert_eq!(Hours(2.0), result.extension_hours);
    assert_eq!(Hours(15.0), result.total_fdp);
    assert_eq!(Hours(2.0), result.discretion);
}

#[test]
fn test_short_split_duty_break_is_reported() {
    let mut calc = calculator(duty("2026-01-15T07:00:00Z", 2));
    calc.set_split_duty(split(2.0, "2026-01-15T11:00:00Z", SuitableAccommodation));

    let result = calc.result().unwrap();
    assert_eq!(Hours(14.0), result.total_fdp);
    assert_eq!(
        vec![Warning::SplitDutyBreakTooShort { break_duration: Hours(2.0) }],
        result.warnings
    );
}

#[test]
fn test_in_flight_rest_replaces_base() {
    let mut calc = calculator(duty("2026-01-15T07:00:00Z", 2));
    calc.set_in_flight_rest(rest(RestFacility::Class1, AdditionalCrew::Two, false));

    let result = calc.result().unwrap();
    assert_eq!(Extension::Replacement(Hours(17.0)), result.extension);
    assert_eq!(Hours(4.0), result.extension_hours);
    assert_eq!(Hours(17.0), result.total_fdp);
    assert_eq!(Hours(3.0), result.discretion);
}

#[test]
fn test_long_flight_needs_two_sector_bucket() {
    let mut calc = calculator(duty("2026-01-15T07:00:00Z", 2));
    let mut long = rest(RestFacility::Class2, AdditionalCrew::One, true);
    calc.set_in_flight_rest(long.clone());
    assert_eq!(Hours(16.0), calc.total_fdp().unwrap());

    long.sectors = RestSectors::Three;
    calc.set_in_flight_rest(long);
    assert_eq!(Hours(15.0), calc.total_fdp().unwrap());
}

#[test]
fn test_cabin_crew_limit_from_rest_available() {
    let mut inputs = duty("2026-01-15T07:00:00Z", 2);
    inputs.crew_type = CrewType::CabinCrew;
    let mut calc = calculator(inputs);

    let mut cabin = rest(RestFacility::Class2, AdditionalCrew::One, false);
    cabin.cabin_rest_available = "2:40".parse().unwrap();
    calc.set_in_flight_rest(cabin.clone());
    assert_eq!(Hours(16.0), calc.total_fdp().unwrap());

    cabin.cabin_rest_available = Hours(1.0);
    calc.set_in_flight_rest(cabin);
    let result = calc.result().unwrap();
    assert_eq!(Extension::None, result.extension);
    assert_eq!(Hours(13.0), result.total_fdp);
}

#[test]
fn test_no_rest_facility_is_inert() {
    let mut calc = calculator(duty("2026-01-15T07:00:00Z", 2));
    calc.set_in_flight_rest(rest(RestFacility::None, AdditionalCrew::Two, true));

    let result = calc.result().unwrap();
    assert_eq!(Extension::None, result.extension);
    assert_eq!(Hours(13.0), result.total_fdp);
    assert_eq!(Hours(2.0), result.discretion);
}

#[test]
fn test_discretion_shrinks_with_extended_margin() {
    let mut calc = calculator(duty("2026-01-15T07:30:00Z", 2));
    calc.set_extended_fdp();
    // 14:00 extended against 13:00 standard
    assert_eq!(Hours(1.0), calc.result().unwrap().discretion);

    calc.set_report("2026-01-15T20:00:00Z".parse().unwrap());
    assert_eq!(Hours(2.0), calc.result().unwrap().discretion);
}
