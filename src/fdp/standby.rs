use crate::duty::{ActiveModifier, StandbyType};
use crate::error::FtlError;
use crate::fdp::DutyContext;
use crate::time::Hours;
use chrono::{NaiveTime, Timelike};
use serde::Serialize;

const NIGHT_FROM_HOUR: u32 = 23;
const NIGHT_UNTIL_HOUR: u32 = 7;

const HOME_STANDBY_ALLOWANCE: Hours = Hours(6.0);
const HOME_STANDBY_ALLOWANCE_AUGMENTED: Hours = Hours(8.0);
const AIRPORT_STANDBY_ALLOWANCE: Hours = Hours(4.0);

const AWAKE_CEILING: Hours = Hours(16.0);
const AWAKE_CEILING_AUGMENTED: Hours = Hours(18.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandbyOutcome {
    pub kind: StandbyType,
    pub duration: Hours,
    pub night: bool,
    pub reduction: Hours,
}

impl StandbyOutcome {
    pub fn none() -> StandbyOutcome {
        StandbyOutcome {
            kind: StandbyType::None,
            duration: Hours::ZERO,
            night: false,
            reduction: Hours::ZERO,
        }
    }

    /// Sub-9h totals are legitimate once a standby allowance has been exceeded.
    pub fn breached_allowance(&self) -> bool {
        self.reduction > Hours::ZERO
    }
}

/// Standby starting 23:00-06:59 local time at home base.
pub fn is_night_standby(local_start: NaiveTime) -> bool {
    let hour = local_start.hour();
    hour >= NIGHT_FROM_HOUR || hour < NIGHT_UNTIL_HOUR
}

/// Standby time that counts against the FDP, and whether it was a night standby.
///
/// At night the clock runs from the recorded contact time, if there is one.
pub fn standby_duration(ctx: &DutyContext) -> Result<(Hours, bool), FtlError> {
    let standby = &ctx.inputs.standby;
    if standby.active() == StandbyType::None {
        return Ok((Hours::ZERO, false));
    }
    let local_start = ctx.clock.local_time(standby.start, &ctx.inputs.home_base)?;
    let night = is_night_standby(local_start);
    let counted_from = match standby.contact {
        Some(contact) if night => contact,
        _ => standby.start,
    };
    let duration = Hours::between(counted_from, ctx.inputs.report).max(Hours::ZERO);
    Ok((duration, night))
}

/// Standby time allowed before the FDP starts shrinking; `None` for types that never reduce.
pub fn reduction_allowance(kind: StandbyType, modifier: &ActiveModifier) -> Option<Hours> {
    match kind {
        StandbyType::HomeStandby if modifier.is_in_flight_rest_or_split_duty() => {
            Some(HOME_STANDBY_ALLOWANCE_AUGMENTED)
        }
        StandbyType::HomeStandby => Some(HOME_STANDBY_ALLOWANCE),
        StandbyType::AirportStandby => Some(AIRPORT_STANDBY_ALLOWANCE),
        StandbyType::AirportDuty | StandbyType::Reserve | StandbyType::None => None,
    }
}

pub fn standby_reduction(kind: StandbyType, duration: Hours, modifier: &ActiveModifier) -> Hours {
    reduction_allowance(kind, modifier)
        .map(|allowance| (duration - allowance).max(Hours::ZERO))
        .unwrap_or(Hours::ZERO)
}

/// Longest an airport standby crew member may be awake through the end of the FDP.
pub fn awake_ceiling(modifier: &ActiveModifier) -> Hours {
    if modifier.is_in_flight_rest_or_split_duty() {
        AWAKE_CEILING_AUGMENTED
    } else {
        AWAKE_CEILING
    }
}

pub fn evaluate_standby(ctx: &DutyContext) -> Result<StandbyOutcome, FtlError> {
    let kind = ctx.inputs.standby.active();
    if kind == StandbyType::None {
        return Ok(StandbyOutcome::none());
    }
    let (duration, night) = standby_duration(ctx)?;
    let reduction = standby_reduction(kind, duration, &ctx.inputs.modifier);
    tracing::debug!(?kind, %duration, night, %reduction, "evaluated standby");
    Ok(StandbyOutcome { kind, duration, night, reduction })
}
