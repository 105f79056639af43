use crate::airport::{AirportCode, AirportDirectory, TimeResolver};
use crate::crew::CrewType;
use crate::duty::{ActiveModifier, DutyInputs, InFlightRest, SplitDuty, StandbyType};
use crate::error::FtlError;
use crate::fdp::base::{resolve_base_fdp, standard_base_fdp};
use crate::fdp::extension::{MIN_SPLIT_DUTY_BREAK, commanders_discretion, resolve_extension};
use crate::fdp::result::{FdpResult, Warning};
use crate::fdp::standby::{StandbyOutcome, awake_ceiling, evaluate_standby};
use crate::fdp::DutyContext;
use crate::tables::{RegulatoryTables, UkFtlTables};
use crate::time::Hours;
use chrono::{DateTime, Utc};

const MINIMUM_FDP: Hours = Hours(9.0);

/// Applies the standby reduction and the 9h floor.
///
/// The floor does not apply once a standby allowance has been exceeded.
pub fn aggregate(fdp: Hours, standby: &StandbyOutcome) -> Hours {
    let reduced = fdp - standby.reduction;
    if standby.breached_allowance() {
        reduced
    } else {
        reduced.max(MINIMUM_FDP)
    }
}

/// Standby time plus FDP. Airport duty already starts the FDP clock, so it is not added again.
pub fn total_duty_time(standby: &StandbyOutcome, total_fdp: Hours) -> Hours {
    match standby.kind {
        StandbyType::AirportDuty => total_fdp,
        _ => standby.duration + total_fdp,
    }
}

fn collect_warnings(ctx: &DutyContext, extended: bool, standby: &StandbyOutcome, total_fdp: Hours) -> Vec<Warning> {
    let mut warnings = vec![];
    match &ctx.inputs.modifier {
        ActiveModifier::ExtendedFdp if !extended => warnings.push(Warning::ExtendedFdpUnavailable),
        ActiveModifier::SplitDuty(split) if split.break_duration < MIN_SPLIT_DUTY_BREAK => {
            warnings.push(Warning::SplitDutyBreakTooShort {
                break_duration: split.break_duration,
            })
        }
        _ => {}
    }
    if standby.kind == StandbyType::AirportStandby {
        let awake = standby.duration + total_fdp;
        let ceiling = awake_ceiling(&ctx.inputs.modifier);
        if awake > ceiling {
            warnings.push(Warning::DutyTimeCeilingExceeded { awake, ceiling });
        }
    }
    warnings
}

/// Runs the whole pipeline against one snapshot.
pub fn evaluate(ctx: &DutyContext) -> Result<FdpResult, FtlError> {
    let acclimatisation = ctx.classify();
    let state = acclimatisation.state;

    let base = resolve_base_fdp(ctx, state)?;
    let standard_fdp = standard_base_fdp(ctx, state)?;
    let extension = resolve_extension(ctx, state)?;
    let standby = evaluate_standby(ctx)?;
    let total_fdp = aggregate(extension.apply(base.hours), &standby);

    let warnings = collect_warnings(ctx, base.extended, &standby, total_fdp);
    for warning in &warnings {
        tracing::warn!(%warning, "FDP rule warning");
    }

    let discretion = commanders_discretion(&ctx.inputs.modifier, base, standard_fdp);
    let reference = ctx.reference_instant();
    let block_time = ctx.inputs.estimated_block_time;
    let latest_on_blocks = total_fdp.after(reference)?;
    let latest_on_blocks_with_discretion = (total_fdp + discretion).after(reference)?;
    let latest_off_blocks = block_time.before(latest_on_blocks)?;
    let latest_off_blocks_with_discretion = block_time.before(latest_on_blocks_with_discretion)?;

    tracing::debug!(%total_fdp, %discretion, %latest_on_blocks, "FDP evaluated");

    Ok(FdpResult {
        acclimatisation,
        base_fdp: base.hours,
        standard_fdp,
        extension,
        extension_hours: extension.applied_hours(base.hours),
        standby,
        total_fdp,
        discretion,
        reference,
        latest_off_blocks,
        latest_on_blocks,
        latest_off_blocks_with_discretion,
        latest_on_blocks_with_discretion,
        total_duty_time: total_duty_time(&standby, total_fdp),
        warnings,
    })
}

/// Owns the duty inputs and memoises the evaluation.
///
/// Every mutator drops the cached result; the next read recomputes it.
pub struct FdpCalculator<T = UkFtlTables, R = AirportDirectory> {
    inputs: DutyInputs,
    tables: T,
    clock: R,
    cache: Option<FdpResult>,
}

impl<T: RegulatoryTables, R: TimeResolver> FdpCalculator<T, R> {
    pub fn new(inputs: DutyInputs, tables: T, clock: R) -> Self {
        FdpCalculator {
            inputs,
            tables,
            clock,
            cache: None,
        }
    }

    pub fn inputs(&self) -> &DutyInputs {
        &self.inputs
    }

    pub fn clock(&self) -> &R {
        &self.clock
    }

    pub fn is_cached(&self) -> bool {
        self.cache.is_some()
    }

    fn context(&self) -> DutyContext<'_> {
        DutyContext::new(&self.inputs, &self.tables, &self.clock)
    }

    /// Fresh evaluation of the current inputs, bypassing the cache.
    pub fn evaluate(&self) -> Result<FdpResult, FtlError> {
        evaluate(&self.context())
    }

    pub fn result(&mut self) -> Result<&FdpResult, FtlError> {
        let result = match self.cache.take() {
            Some(result) => {
                tracing::trace!("FDP cache hit");
                result
            }
            None => self.evaluate()?,
        };
        Ok(self.cache.insert(result))
    }

    /// Standard limit for the duty, unaffected by the extended-FDP modifier.
    pub fn get_base_fdp(&self) -> Result<Hours, FtlError> {
        let ctx = self.context();
        standard_base_fdp(&ctx, ctx.classify().state)
    }

    pub fn total_fdp(&mut self) -> Result<Hours, FtlError> {
        Ok(self.result()?.total_fdp)
    }

    pub fn latest_on_blocks(&mut self, with_discretion: bool) -> Result<DateTime<Utc>, FtlError> {
        Ok(self.result()?.latest_on_blocks(with_discretion))
    }

    pub fn latest_off_blocks(&mut self, with_discretion: bool) -> Result<DateTime<Utc>, FtlError> {
        Ok(self.result()?.latest_off_blocks(with_discretion))
    }

    fn invalidate(&mut self) {
        if self.cache.take().is_some() {
            tracing::trace!("FDP cache invalidated");
        }
    }

    fn update(&mut self, change: impl FnOnce(&mut DutyInputs)) {
        change(&mut self.inputs);
        self.invalidate();
    }

    pub fn set_inputs(&mut self, inputs: DutyInputs) {
        self.update(|i| *i = inputs);
    }

    pub fn set_home_base(&mut self, code: AirportCode) {
        self.update(|i| i.home_base = code);
    }

    pub fn set_secondary_home_base(&mut self, code: Option<AirportCode>) {
        self.update(|i| i.secondary_home_base = code);
    }

    pub fn set_report_location(&mut self, code: AirportCode) {
        self.update(|i| i.report_location = code);
    }

    pub fn set_report(&mut self, report: DateTime<Utc>) {
        self.update(|i| i.report = report);
    }

    pub fn set_sectors(&mut self, sectors: u8) {
        self.update(|i| i.sectors = sectors);
    }

    pub fn set_timezone_difference(&mut self, hours: i32) {
        self.update(|i| i.timezone_difference = hours);
    }

    pub fn set_elapsed_since_first_report(&mut self, elapsed: Hours) {
        self.update(|i| i.elapsed_since_first_report = elapsed);
    }

    pub fn set_crew_type(&mut self, crew_type: CrewType) {
        self.update(|i| i.crew_type = crew_type);
    }

    pub fn set_standby_enabled(&mut self, enabled: bool) {
        self.update(|i| i.standby.enabled = enabled);
    }

    pub fn set_standby_type(&mut self, kind: StandbyType) {
        self.update(|i| i.standby.kind = kind);
    }

    pub fn set_standby_start(&mut self, start: DateTime<Utc>) {
        self.update(|i| i.standby.start = start);
    }

    pub fn set_airport_duty_start(&mut self, start: DateTime<Utc>) {
        self.update(|i| i.standby.airport_duty_start = start);
    }

    pub fn set_standby_contact(&mut self, contact: Option<DateTime<Utc>>) {
        self.update(|i| i.standby.contact = contact);
    }

    pub fn set_modifier(&mut self, modifier: ActiveModifier) {
        self.update(|i| i.modifier = modifier);
    }

    pub fn set_in_flight_rest(&mut self, rest: InFlightRest) {
        self.set_modifier(ActiveModifier::InFlightRest(rest));
    }

    pub fn set_split_duty(&mut self, split: SplitDuty) {
        self.set_modifier(ActiveModifier::SplitDuty(split));
    }

    pub fn set_extended_fdp(&mut self) {
        self.set_modifier(ActiveModifier::ExtendedFdp);
    }

    pub fn clear_modifier(&mut self) {
        self.set_modifier(ActiveModifier::None);
    }

    pub fn set_estimated_block_time(&mut self, block_time: Hours) {
        self.update(|i| i.estimated_block_time = block_time);
    }
}
