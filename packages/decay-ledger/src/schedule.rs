use cosmwasm_std::{Order, StdResult, Storage, Uint128};
use cw_storage_plus::{Bound, Map};

/// Per-entity map of week timestamps to the slope that stops decaying at
/// that week. Summing every entry up to a contribution's end removes its
/// slope exactly, which is what drives ledger points to zero.
pub struct SlopeChangeSchedule {
    namespace: &'static str,
}

impl SlopeChangeSchedule {
    pub const fn new(namespace: &'static str) -> Self {
        Self { namespace }
    }

    // CHANGES: key(entity, week) -> slope decrement
    fn changes<'k>(&self) -> Map<(&'k str, u64), Uint128> {
        Map::new(self.namespace)
    }

    pub fn at(&self, storage: &dyn Storage, entity: &str, week: u64) -> StdResult<Uint128> {
        Ok(self
            .changes()
            .may_load(storage, (entity, week))?
            .unwrap_or_default())
    }

    pub fn schedule(
        &self,
        storage: &mut dyn Storage,
        entity: &str,
        week: u64,
        slope: Uint128,
    ) -> StdResult<()> {
        if slope.is_zero() {
            return Ok(());
        }

        let current = self.at(storage, entity, week)?;
        self.changes()
            .save(storage, (entity, week), &current.checked_add(slope)?)
    }

    /// Withdraws a previously scheduled decrement. The entry is deleted
    /// once nothing is left at that week.
    pub fn cancel(
        &self,
        storage: &mut dyn Storage,
        entity: &str,
        week: u64,
        slope: Uint128,
    ) -> StdResult<()> {
        let remaining = self.at(storage, entity, week)?.saturating_sub(slope);

        if remaining.is_zero() {
            self.changes().remove(storage, (entity, week));
            return Ok(());
        }

        self.changes().save(storage, (entity, week), &remaining)
    }

    /// Scheduled entries strictly after `after`, in ascending week order.
    pub fn upcoming(
        &self,
        storage: &dyn Storage,
        entity: &str,
        after: u64,
        limit: usize,
    ) -> StdResult<Vec<(u64, Uint128)>> {
        self.changes()
            .prefix(entity)
            .range(
                storage,
                Some(Bound::exclusive(after)),
                None,
                Order::Ascending,
            )
            .take(limit)
            .collect()
    }
}
