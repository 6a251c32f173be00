use cosmwasm_std::{Addr, Decimal, StdError, StdResult, Storage};
use decay_ledger::{CatchUp, CheckpointLedger, Point};

use crate::error::ContractError;
use crate::state::{Config, Gauge, GAUGES, GAUGE_WEIGHTS, TOTAL_ENTITY, TOTAL_WEIGHT};

/// Catches `entity` up to `now`, failing when the ledger is too far behind
/// to finish in this call. Keepers have to advance it first.
fn caught_up_point(
    storage: &mut dyn Storage,
    ledger: &CheckpointLedger,
    entity: &str,
    now: u64,
) -> Result<Point, ContractError> {
    let catch_up = ledger.checkpoint(storage, entity, now)?;
    if !catch_up.complete {
        return Err(ContractError::CatchUpIncomplete {
            entity: entity.to_string(),
            reached: catch_up.point.ts,
        });
    }

    Ok(catch_up.point)
}

/// Replaces a vote's contribution to the gauge and total weights. Both
/// ledgers are caught up before anything is subtracted or added.
pub fn apply_vote_change(
    storage: &mut dyn Storage,
    gauge: &Addr,
    old: Option<&Point>,
    new: Option<&Point>,
    now: u64,
) -> Result<(), ContractError> {
    let mut gauge_point = caught_up_point(storage, &GAUGE_WEIGHTS, gauge.as_str(), now)?;
    let mut total_point = caught_up_point(storage, &TOTAL_WEIGHT, TOTAL_ENTITY, now)?;

    if let Some(old) = old {
        GAUGE_WEIGHTS.remove_contribution(storage, gauge.as_str(), &mut gauge_point, old, now)?;
        TOTAL_WEIGHT.remove_contribution(storage, TOTAL_ENTITY, &mut total_point, old, now)?;
    }

    if let Some(new) = new {
        GAUGE_WEIGHTS.add_contribution(storage, gauge.as_str(), &mut gauge_point, new)?;
        TOTAL_WEIGHT.add_contribution(storage, TOTAL_ENTITY, &mut total_point, new)?;
    }

    GAUGE_WEIGHTS.record(storage, gauge.as_str(), &gauge_point, now)?;
    TOTAL_WEIGHT.record(storage, TOTAL_ENTITY, &total_point, now)?;

    Ok(())
}

pub fn checkpoint_gauge(storage: &mut dyn Storage, gauge: &Addr, now: u64) -> StdResult<CatchUp> {
    GAUGE_WEIGHTS.checkpoint(storage, gauge.as_str(), now)
}

pub fn checkpoint_total(storage: &mut dyn Storage, now: u64) -> StdResult<CatchUp> {
    TOTAL_WEIGHT.checkpoint(storage, TOTAL_ENTITY, now)
}

pub fn gauge_weight_at(storage: &dyn Storage, gauge: &Addr, timestamp: u64) -> StdResult<Point> {
    GAUGE_WEIGHTS.point_at(storage, gauge.as_str(), timestamp)
}

pub fn total_weight_at(storage: &dyn Storage, timestamp: u64) -> StdResult<Point> {
    TOTAL_WEIGHT.point_at(storage, TOTAL_ENTITY, timestamp)
}

/// Share of the total weight held by `gauge` at `timestamp`. Unlisted and
/// killed gauges get nothing.
pub fn gauge_relative_weight(
    storage: &dyn Storage,
    gauge: &Addr,
    timestamp: u64,
) -> StdResult<Decimal> {
    match GAUGES.may_load(storage, gauge)? {
        Some(Gauge { killed: false, .. }) => {}
        _ => return Ok(Decimal::zero()),
    }

    let total = total_weight_at(storage, timestamp)?.bias;
    if total.is_zero() {
        return Ok(Decimal::zero());
    }

    let weight = gauge_weight_at(storage, gauge, timestamp)?.bias;

    Decimal::checked_from_ratio(weight, total).map_err(|err| {
        StdError::generic_err(format!(
            "Failed to compute relative weight of gauge {gauge}. Error: {err}"
        ))
    })
}

/// The cap is not enforced here; consumers of the weights redistribute
/// whatever a gauge receives above it.
pub fn effective_cap(config: &Config, gauge: &Gauge) -> Decimal {
    gauge.cap.unwrap_or(config.default_cap)
}
