//! Multiplier stage
//!
//! The field state (ba) and a custom stake combine multiplicatively and scale
//! only the active players' running totals, side payments included.

use super::SettlementError;
use crate::models::event::{SettlementEvent, SettlementTrace};
use crate::models::round::RoundInput;
use crate::models::score_sheet::ScoreSheet;
use crate::rules::RuleSet;

/// Field multiplier (when enabled) times the custom multiplier
pub fn combined_multiplier(rules: &RuleSet, input: &RoundInput) -> Result<i64, SettlementError> {
    if input.custom_multiplier == 0 {
        return Err(SettlementError::InvalidMultiplier);
    }
    let field = if rules.field_multiplier_enabled {
        input.field_state.multiplier()
    } else {
        1
    };
    field
        .checked_mul(i64::from(input.custom_multiplier))
        .ok_or(SettlementError::Overflow)
}

/// Scale active players' totals; sit-out players are untouched
pub fn apply_multiplier(
    sheet: &mut ScoreSheet,
    active: &[String],
    multiplier: i64,
    trace: &mut SettlementTrace,
) -> Result<(), SettlementError> {
    if multiplier <= 1 {
        return Ok(());
    }
    let scaled = active
        .iter()
        .map(|player| {
            sheet
                .value(player)
                .checked_mul(multiplier)
                .ok_or(SettlementError::Overflow)
        })
        .collect::<Result<Vec<_>, _>>()?;
    for (player, value) in active.iter().zip(scaled) {
        sheet.set(player, value);
    }
    trace.log(SettlementEvent::MultiplierApplied {
        multiplier,
        players: active.to_vec(),
    });
    Ok(())
}
