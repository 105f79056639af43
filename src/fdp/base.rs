use crate::acclimatisation::Acclimatisation;
use crate::error::FtlError;
use crate::fdp::DutyContext;
use crate::time::Hours;

/// Base FDP as resolved for the duty, before modifiers and standby.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseFdp {
    pub hours: Hours,
    /// Whether the value came from the extended-FDP table.
    pub extended: bool,
}

/// The tables have no single-sector column; 1 sector reads the 1-2 sector limit.
pub fn lookup_sectors(sectors: u8) -> u8 {
    sectors.max(2)
}

/// Base FDP including the extended-FDP table when that modifier is active.
/// Falls back to the standard tables where no extension exists.
pub fn resolve_base_fdp(ctx: &DutyContext, state: Acclimatisation) -> Result<BaseFdp, FtlError> {
    if ctx.inputs.modifier.is_extended_fdp() {
        let local = ctx.local_reference_time(state)?;
        let sectors = lookup_sectors(ctx.inputs.sectors);
        match ctx.tables.extended_fdp(local, sectors) {
            Some(hours) => {
                tracing::debug!(%local, sectors, %hours, "extended FDP table applies");
                return Ok(BaseFdp { hours, extended: true });
            }
            None => {
                tracing::debug!(%local, sectors, "no extended FDP entry, using standard limits");
            }
        }
    }
    Ok(BaseFdp {
        hours: standard_base_fdp(ctx, state)?,
        extended: false,
    })
}

/// Standard reference limit; never consults the extended-FDP table.
pub fn standard_base_fdp(ctx: &DutyContext, state: Acclimatisation) -> Result<Hours, FtlError> {
    let sectors = lookup_sectors(ctx.inputs.sectors);
    let hours = match state {
        Acclimatisation::HomeBase | Acclimatisation::Departure => {
            let local = ctx.local_reference_time(state)?;
            ctx.tables.acclimatised_fdp(local, sectors)
        }
        Acclimatisation::Unknown => ctx.tables.unknown_acclimatised_fdp(sectors),
    };
    tracing::debug!(?state, sectors, %hours, "standard base FDP");
    Ok(hours)
}
