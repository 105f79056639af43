use crate::acclimatisation::Classification;
use crate::fdp::extension::Extension;
use crate::fdp::standby::StandbyOutcome;
use crate::time::Hours;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use tabled::Tabled;

/// Rule findings that do not stop the calculation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Warning {
    /// Airport standby plus FDP keeps the crew awake beyond the permitted ceiling.
    DutyTimeCeilingExceeded { awake: Hours, ceiling: Hours },
    SplitDutyBreakTooShort { break_duration: Hours },
    /// Extended FDP requested where the extended table has no entry.
    ExtendedFdpUnavailable,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::DutyTimeCeilingExceeded { awake, ceiling } => write!(
                f,
                "airport standby plus FDP is {} awake, above the {} ceiling",
                awake, ceiling
            ),
            Warning::SplitDutyBreakTooShort { break_duration } => write!(
                f,
                "split duty break of {} is shorter than the 3 consecutive hours required",
                break_duration
            ),
            Warning::ExtendedFdpUnavailable => write!(
                f,
                "extended FDP is not available for this report time and sector count, standard limits apply"
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FdpResult {
    pub acclimatisation: Classification,
    /// Base FDP as used, the extended-table value when that applied.
    pub base_fdp: Hours,
    /// Standard-table reference limit.
    pub standard_fdp: Hours,
    pub extension: Extension,
    pub extension_hours: Hours,
    pub standby: StandbyOutcome,
    pub total_fdp: Hours,
    pub discretion: Hours,
    pub reference: DateTime<Utc>,
    pub latest_off_blocks: DateTime<Utc>,
    pub latest_on_blocks: DateTime<Utc>,
    pub latest_off_blocks_with_discretion: DateTime<Utc>,
    pub latest_on_blocks_with_discretion: DateTime<Utc>,
    pub total_duty_time: Hours,
    pub warnings: Vec<Warning>,
}

#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct BreakdownLine {
    #[tabled(rename = "Item")]
    pub item: String,
    #[tabled(rename = "Value")]
    pub value: String,
}

impl BreakdownLine {
    fn new(item: &str, value: impl ToString) -> BreakdownLine {
        BreakdownLine {
            item: item.to_string(),
            value: value.to_string(),
        }
    }
}

fn clock(instant: DateTime<Utc>) -> String {
    instant.format("%d %b %H:%MZ").to_string()
}

impl FdpResult {
    pub fn max_fdp(&self, with_discretion: bool) -> Hours {
        if with_discretion { self.total_fdp + self.discretion } else { self.total_fdp }
    }

    pub fn latest_on_blocks(&self, with_discretion: bool) -> DateTime<Utc> {
        if with_discretion {
            self.latest_on_blocks_with_discretion
        } else {
            self.latest_on_blocks
        }
    }

    pub fn latest_off_blocks(&self, with_discretion: bool) -> DateTime<Utc> {
        if with_discretion {
            self.latest_off_blocks_with_discretion
        } else {
            self.latest_off_blocks
        }
    }

    pub fn breakdown(&self) -> Vec<BreakdownLine> {
        let mut lines = vec![
            BreakdownLine::new("Acclimatisation", self.acclimatisation.state),
            BreakdownLine::new("Standard FDP", self.standard_fdp),
        ];
        if self.base_fdp != self.standard_fdp {
            lines.push(BreakdownLine::new("Extended FDP", self.base_fdp));
        }
        match self.extension {
            Extension::None => {}
            Extension::Replacement(hours) => lines.push(BreakdownLine::new("In-flight rest FDP", hours)),
            Extension::Additive(hours) => lines.push(BreakdownLine::new("Split duty extension", format!("+{}", hours))),
        }
        if self.standby.duration > Hours::ZERO {
            let label = if self.standby.night { "Standby (night)" } else { "Standby" };
            lines.push(BreakdownLine::new(label, self.standby.duration));
        }
        if self.standby.reduction > Hours::ZERO {
            lines.push(BreakdownLine::new("Standby reduction", format!("-{}", self.standby.reduction)));
        }
        lines.extend([
            BreakdownLine::new("Total FDP", self.total_fdp),
            BreakdownLine::new("Commander's discretion", format!("+{}", self.discretion)),
            BreakdownLine::new("Total duty time", self.total_duty_time),
            BreakdownLine::new("Latest off blocks", clock(self.latest_off_blocks)),
            BreakdownLine::new("Latest on blocks", clock(self.latest_on_blocks)),
            BreakdownLine::new("Latest off blocks (discretion)", clock(self.latest_off_blocks_with_discretion)),
            BreakdownLine::new("Latest on blocks (discretion)", clock(self.latest_on_blocks_with_discretion)),
        ]);
        lines
    }

    pub fn breakdown_text(&self) -> String {
        self.breakdown()
            .iter()
            .map(|line| format!("{}: {}", line.item, line.value))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
