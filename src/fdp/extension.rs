use crate::acclimatisation::Acclimatisation;
use crate::crew::{CrewType, RestFacility, RestSectors};
use crate::duty::{Accommodation, ActiveModifier, InFlightRest, SplitDuty};
use crate::error::FtlError;
use crate::fdp::DutyContext;
use crate::fdp::base::BaseFdp;
use crate::time::Hours;
use chrono::NaiveTime;
use serde::Serialize;

/// Window of circadian low, local time at the acclimatised location.
pub const WOCL: (Hours, Hours) = (Hours(2.0), Hours(6.0));
/// The same window on the following day.
const NEXT_WOCL: (Hours, Hours) = (Hours(26.0), Hours(30.0));
const MAX_ACCOMMODATION_BREAK: Hours = Hours(6.0);
const SPLIT_DUTY_CREDIT: f64 = 0.5;
pub const MIN_SPLIT_DUTY_BREAK: Hours = Hours(3.0);

const DISCRETION: Hours = Hours(2.0);
const DISCRETION_WITH_IN_FLIGHT_REST: Hours = Hours(3.0);

/// How a modifier changed the base FDP.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Extension {
    None,
    /// The modifier's limit stands in place of the base FDP.
    Replacement(Hours),
    /// Hours added on top of the base FDP.
    Additive(Hours),
}

impl Extension {
    /// FDP after the modifier, before any standby reduction.
    pub fn apply(self, base: Hours) -> Hours {
        match self {
            Extension::None => base,
            Extension::Replacement(hours) => hours,
            Extension::Additive(hours) => base + hours,
        }
    }

    /// Hours gained over the base FDP.
    pub fn applied_hours(self, base: Hours) -> Hours {
        self.apply(base) - base
    }
}

/// Evaluates whichever modifier is active.
pub fn resolve_extension(ctx: &DutyContext, state: Acclimatisation) -> Result<Extension, FtlError> {
    let extension = match &ctx.inputs.modifier {
        ActiveModifier::InFlightRest(rest) => in_flight_rest_fdp(ctx, rest)
            .map(Extension::Replacement)
            .unwrap_or(Extension::None),
        ActiveModifier::SplitDuty(split) => {
            let begin = ctx
                .clock
                .local_time(split.break_begin, ctx.acclimatised_location(state))?;
            Extension::Additive(split_duty_extension(split, begin))
        }
        // the extended table value is already the base FDP
        ActiveModifier::ExtendedFdp | ActiveModifier::None => Extension::None,
    };
    tracing::debug!(modifier = %ctx.inputs.modifier, ?extension, "resolved FDP modifier");
    Ok(extension)
}

/// Replacement FDP for in-flight rest, `None` when the facility gives no credit.
pub fn in_flight_rest_fdp(ctx: &DutyContext, rest: &InFlightRest) -> Option<Hours> {
    if rest.facility == RestFacility::None {
        return None;
    }
    match ctx.inputs.crew_type {
        CrewType::CabinCrew => ctx
            .tables
            .cabin_crew_max_fdp(rest.facility, rest.cabin_rest_available),
        CrewType::FlightCrew => {
            let long_flight = rest.long_flight && rest.sectors == RestSectors::OneOrTwo;
            let hours = ctx
                .tables
                .in_flight_rest_fdp(rest.facility, rest.additional_crew, long_flight);
            (hours > Hours::ZERO).then_some(hours)
        }
    }
}

/// Split duty credit: half of the break that counts.
pub fn split_duty_extension(split: &SplitDuty, local_begin: NaiveTime) -> Hours {
    let counted = match split.accommodation {
        Accommodation::SuitableAccommodation => split.break_duration,
        Accommodation::Accommodation => accommodation_break(Hours::of_day(local_begin), split.break_duration),
    };
    counted.max(Hours::ZERO) * SPLIT_DUTY_CREDIT
}

/// Break time that counts when only (non-suitable) accommodation is provided.
///
/// The smaller of the 6h-capped break less its WOCL overlap, and the part of
/// the break before 02:00 local.
pub fn accommodation_break(begin: Hours, duration: Hours) -> Hours {
    let capped = duration.min(MAX_ACCOMMODATION_BREAK);
    let outside_wocl = capped - wocl_overlap(begin, duration);
    outside_wocl.min(before_wocl(begin)).max(Hours::ZERO)
}

/// Hours of a break starting at `begin` (hours past local midnight) spent inside the WOCL.
pub fn wocl_overlap(begin: Hours, duration: Hours) -> Hours {
    let span = (begin, begin + duration.max(Hours::ZERO));
    let mut overlap = Hours::overlap(&span, &WOCL);
    // only a break running past midnight can reach the next day's window
    if span.1 > Hours(24.0) {
        overlap += Hours::overlap(&span, &NEXT_WOCL);
    }
    overlap
}

/// Time from `begin` until 02:00 local; zero for a break beginning at or after 02:00.
pub fn before_wocl(begin: Hours) -> Hours {
    (WOCL.0 - begin).max(Hours::ZERO)
}

/// Commander's discretion available on top of the total FDP.
///
/// With extended FDP the extension already used counts against the 2h allowance.
pub fn commanders_discretion(modifier: &ActiveModifier, base: BaseFdp, standard: Hours) -> Hours {
    match modifier {
        ActiveModifier::ExtendedFdp => {
            let margin = if base.extended { base.hours - standard } else { Hours::ZERO };
            (DISCRETION - margin).max(Hours::ZERO)
        }
        ActiveModifier::InFlightRest(rest) if rest.facility != RestFacility::None => {
            DISCRETION_WITH_IN_FLIGHT_REST
        }
        _ => DISCRETION,
    }
}
