//! Flight duty period determination.
//!
//! Pipeline: acclimatisation -> base FDP -> modifier (in-flight rest, split
//! duty or extended FDP) -> standby reduction -> totals and block times.
//! Each stage is a pure function of a [`DutyContext`]; [`FdpCalculator`]
//! owns the inputs and memoises the result.

pub mod base;
pub mod calculator;
pub mod extension;
pub mod result;
pub mod standby;

pub use calculator::FdpCalculator;
pub use result::{FdpResult, Warning};

use crate::acclimatisation::{self, Acclimatisation, Classification};
use crate::airport::TimeResolver;
use crate::duty::DutyInputs;
use crate::error::FtlError;
use crate::tables::RegulatoryTables;
use chrono::{DateTime, NaiveTime, Utc};

/// Read-only view of one evaluation: the inputs plus the collaborators they are resolved against.
pub struct DutyContext<'a> {
    pub inputs: &'a DutyInputs,
    pub tables: &'a dyn RegulatoryTables,
    pub clock: &'a dyn TimeResolver,
}

impl<'a> DutyContext<'a> {
    pub fn new(
        inputs: &'a DutyInputs,
        tables: &'a dyn RegulatoryTables,
        clock: &'a dyn TimeResolver,
    ) -> Self {
        DutyContext { inputs, tables, clock }
    }

    pub fn classify(&self) -> Classification {
        let departure = if self.inputs.is_home_base(&self.inputs.report_location) {
            &self.inputs.home_base
        } else {
            &self.inputs.report_location
        };
        acclimatisation::classify(
            self.tables,
            self.inputs.timezone_difference,
            self.inputs.elapsed_since_first_report,
            &self.inputs.home_base,
            departure,
        )
    }

    /// Airport whose local clock the crew's body clock follows.
    pub fn acclimatised_location(&self, state: Acclimatisation) -> &'a str {
        match state {
            Acclimatisation::Departure => &self.inputs.report_location,
            Acclimatisation::HomeBase | Acclimatisation::Unknown => &self.inputs.home_base,
        }
    }

    pub fn reference_instant(&self) -> DateTime<Utc> {
        self.inputs.reference_instant()
    }

    pub fn local_reference_time(&self, state: Acclimatisation) -> Result<NaiveTime, FtlError> {
        self.clock
            .local_time(self.reference_instant(), self.acclimatised_location(state))
    }
}

#[cfg(test)]
mod tests {
    mod base;
    mod calculator;
    mod extension;
    mod proptests;
    mod standby;
    mod utils;
}
