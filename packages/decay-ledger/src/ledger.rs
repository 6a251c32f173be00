use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Order, StdResult, Storage, Uint128};
use cw_storage_plus::{Bound, Map};

use crate::point::{week_floor, Point, WEEK};
use crate::schedule::SlopeChangeSchedule;

/// Default number of week boundaries a single mutating catch-up walks.
pub const MAX_CATCH_UP_WEEKS: u32 = 500;

#[cw_serde]
pub struct Checkpoint {
    pub point: Point,
    pub nonce: u64,
    pub recorded_at: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchUp {
    pub point: Point,
    /// False when the walk stopped at the per-call limit before reaching
    /// the requested time. Calling again continues from where it stopped.
    pub complete: bool,
}

/// Append-only history of decaying points per entity, together with the
/// slope change schedule used to bring a stale point up to date.
///
/// History is keyed by (entity, ts, nonce), so the last checkpoint at or
/// before any time is a single descending range lookup.
pub struct CheckpointLedger {
    history_namespace: &'static str,
    pub schedule: SlopeChangeSchedule,
    max_catch_up_weeks: u32,
}

impl CheckpointLedger {
    pub const fn new(history_namespace: &'static str, schedule_namespace: &'static str) -> Self {
        Self {
            history_namespace,
            schedule: SlopeChangeSchedule::new(schedule_namespace),
            max_catch_up_weeks: MAX_CATCH_UP_WEEKS,
        }
    }

    pub const fn with_catch_up_limit(mut self, weeks: u32) -> Self {
        self.max_catch_up_weeks = weeks;
        self
    }

    // HISTORY: key(entity, ts, nonce) -> Checkpoint
    fn history<'k>(&self) -> Map<(&'k str, u64, u64), Checkpoint> {
        Map::new(self.history_namespace)
    }

    pub fn latest(&self, storage: &dyn Storage, entity: &str) -> StdResult<Option<Checkpoint>> {
        self.last_at_or_before(storage, entity, u64::MAX)
    }

    fn last_at_or_before(
        &self,
        storage: &dyn Storage,
        entity: &str,
        t: u64,
    ) -> StdResult<Option<Checkpoint>> {
        Ok(self
            .history()
            .sub_prefix(entity)
            .range(
                storage,
                None,
                Some(Bound::inclusive((t, u64::MAX))),
                Order::Descending,
            )
            .next()
            .transpose()?
            .map(|(_, checkpoint)| checkpoint))
    }

    /// Brings the entity's point up to `now`, applying every scheduled slope
    /// change on the way, and stores the result as a new checkpoint.
    ///
    /// At most `max_catch_up_weeks` week boundaries are walked per call. The
    /// progress made is stored either way; `complete` tells the caller whether
    /// the point actually reached `now`.
    pub fn checkpoint(&self, storage: &mut dyn Storage, entity: &str, now: u64) -> StdResult<CatchUp> {
        let Some(last) = self.latest(storage, entity)? else {
            return Ok(CatchUp {
                point: Point {
                    ts: now,
                    ..Point::default()
                },
                complete: true,
            });
        };

        if last.point.ts >= now {
            return Ok(CatchUp {
                point: last.point,
                complete: true,
            });
        }

        let catch_up = self.advance(
            storage,
            entity,
            last.point,
            now,
            Some(self.max_catch_up_weeks),
        )?;
        self.append(storage, entity, &catch_up.point, last.nonce + 1, now)?;

        Ok(catch_up)
    }

    /// Appends `point` as the entity's newest checkpoint.
    pub fn record(
        &self,
        storage: &mut dyn Storage,
        entity: &str,
        point: &Point,
        now: u64,
    ) -> StdResult<Checkpoint> {
        let nonce = self
            .latest(storage, entity)?
            .map_or(0, |checkpoint| checkpoint.nonce + 1);

        self.append(storage, entity, point, nonce, now)
    }

    fn append(
        &self,
        storage: &mut dyn Storage,
        entity: &str,
        point: &Point,
        nonce: u64,
        now: u64,
    ) -> StdResult<Checkpoint> {
        let checkpoint = Checkpoint {
            point: point.clone(),
            nonce,
            recorded_at: now,
        };
        self.history()
            .save(storage, (entity, point.ts, nonce), &checkpoint)?;

        Ok(checkpoint)
    }

    /// Merges a fresh contribution into `point` and schedules its expiry.
    /// `point` must already be caught up to the contribution's start.
    pub fn add_contribution(
        &self,
        storage: &mut dyn Storage,
        entity: &str,
        point: &mut Point,
        contribution: &Point,
    ) -> StdResult<()> {
        point.merge(contribution)?;
        self.schedule
            .schedule(storage, entity, contribution.end, contribution.slope)
    }

    /// Withdraws what is left of an earlier contribution from `point` at `now`.
    /// Contributions that already ended have been fully applied by the
    /// schedule, so there is nothing to undo for them.
    pub fn remove_contribution(
        &self,
        storage: &mut dyn Storage,
        entity: &str,
        point: &mut Point,
        contribution: &Point,
        now: u64,
    ) -> StdResult<()> {
        if contribution.end <= now {
            return Ok(());
        }

        let remaining = contribution.decayed_value(now)?;
        point.subtract(remaining, contribution.slope);
        self.schedule
            .cancel(storage, entity, contribution.end, contribution.slope)
    }

    /// Read-only view of the entity's point at time `t`, simulated from the
    /// last checkpoint at or before `t`. Entities without history before `t`
    /// have a zero point.
    pub fn point_at(&self, storage: &dyn Storage, entity: &str, t: u64) -> StdResult<Point> {
        let Some(checkpoint) = self.last_at_or_before(storage, entity, t)? else {
            return Ok(Point {
                ts: t,
                ..Point::default()
            });
        };

        Ok(self
            .advance(storage, entity, checkpoint.point, t, None)?
            .point)
    }

    pub fn value_at(&self, storage: &dyn Storage, entity: &str, t: u64) -> StdResult<Uint128> {
        Ok(self.point_at(storage, entity, t)?.bias)
    }

    fn advance(
        &self,
        storage: &dyn Storage,
        entity: &str,
        mut point: Point,
        target: u64,
        max_weeks: Option<u32>,
    ) -> StdResult<CatchUp> {
        let mut t_i = week_floor(point.ts);
        let mut weeks_walked = 0u32;

        while point.ts < target {
            // Every scheduled decrement belongs to a contribution that is
            // still decaying, so a flat point has nothing left to apply.
            if point.slope.is_zero() {
                point.ts = target;
                break;
            }

            if max_weeks.is_some_and(|max| weeks_walked >= max) {
                return Ok(CatchUp {
                    point,
                    complete: false,
                });
            }
            weeks_walked += 1;

            t_i += WEEK;
            let d_slope = if t_i > target {
                t_i = target;
                Uint128::zero()
            } else {
                self.schedule.at(storage, entity, t_i)?
            };

            let d_bias = point.slope.checked_mul(Uint128::from(t_i - point.ts))?;
            if point.bias > d_bias {
                point.bias -= d_bias;
                point.slope = point.slope.saturating_sub(d_slope);
            } else {
                point.bias = Uint128::zero();
                point.slope = Uint128::zero();
            }
            point.ts = t_i;
        }

        Ok(CatchUp {
            point,
            complete: true,
        })
    }
}
