use crate::tables::{AcclimatisationTag, RegulatoryTables};
use crate::time::Hours;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Acclimatisation {
    HomeBase,
    Departure,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub state: Acclimatisation,
    pub reason: String,
}

impl fmt::Display for Acclimatisation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acclimatisation::HomeBase => write!(f, "acclimatised (home base)"),
            Acclimatisation::Departure => write!(f, "acclimatised (departure)"),
            Acclimatisation::Unknown => write!(f, "unknown state of acclimatisation"),
        }
    }
}

/// Never fails: anything the table cannot place is treated as unknown.
pub fn classify(
    tables: &dyn RegulatoryTables,
    timezone_difference: i32,
    elapsed: Hours,
    home_base: &str,
    departure: &str,
) -> Classification {
    let tag = tables.acclimatisation_tag(timezone_difference, elapsed);
    let (state, reason) = match tag {
        Some(AcclimatisationTag::B) => (
            Acclimatisation::HomeBase,
            format!(
                "{}h time difference, {} since first report: still on {} time",
                timezone_difference, elapsed, home_base
            ),
        ),
        Some(AcclimatisationTag::D) if departure == home_base => (
            Acclimatisation::HomeBase,
            format!("acclimatised to {}, which is the home base", departure),
        ),
        Some(AcclimatisationTag::D) => (
            Acclimatisation::Departure,
            format!(
                "{}h time difference, {} since first report: acclimatised to {}",
                timezone_difference, elapsed, departure
            ),
        ),
        Some(AcclimatisationTag::X) => (
            Acclimatisation::Unknown,
            format!(
                "{}h time difference, {} since first report: not yet acclimatised to {}",
                timezone_difference, elapsed, departure
            ),
        ),
        None => (
            Acclimatisation::Unknown,
            format!("elapsed time {} cannot be classified", elapsed),
        ),
    };
    tracing::debug!(?state, timezone_difference, elapsed = elapsed.0, "classified acclimatisation");
    Classification { state, reason }
}
