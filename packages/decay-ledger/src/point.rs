use cosmwasm_schema::cw_serde;
use cosmwasm_std::{StdError, StdResult, Uint128};

/// Length of a schedule period in seconds. Slope changes are only ever
/// registered on multiples of this value.
pub const WEEK: u64 = 7 * 24 * 60 * 60;

pub fn week_floor(timestamp: u64) -> u64 {
    timestamp / WEEK * WEEK
}

pub fn is_week_aligned(timestamp: u64) -> bool {
    timestamp % WEEK == 0
}

/// A linearly decreasing quantity. `bias` is the value at `ts`, and the
/// value drops by `slope` every second until it reaches zero at `end`.
///
/// Points stored in a ledger are sums of many contributions; for those
/// `end` is the latest end among the merged contributions.
#[cw_serde]
#[derive(Default)]
pub struct Point {
    pub bias: Uint128,
    pub slope: Uint128,
    pub ts: u64,
    pub end: u64,
}

impl Point {
    /// Builds the point that spreads `amount` over `[start, end]`.
    ///
    /// The slope is floored, so `bias` may be slightly lower than `amount`.
    /// That dust is not attributed to anyone.
    pub fn new(amount: Uint128, start: u64, end: u64) -> StdResult<Self> {
        validate_window(start, end)?;

        let duration = Uint128::from(end - start);
        let slope = amount.checked_div(duration)?;

        Self::from_slope(slope, start, end)
    }

    /// Builds the point that decays at `slope` from `start` until `end`.
    pub fn from_slope(slope: Uint128, start: u64, end: u64) -> StdResult<Self> {
        validate_window(start, end)?;

        let bias = slope.checked_mul(Uint128::from(end - start))?;

        Ok(Self {
            bias,
            slope,
            ts: start,
            end,
        })
    }

    /// Value of a single contribution at time `t`.
    pub fn decayed_value(&self, t: u64) -> StdResult<Uint128> {
        if t >= self.end {
            return Ok(Uint128::zero());
        }
        if t <= self.ts {
            return Ok(self.bias);
        }

        Ok(self.slope.checked_mul(Uint128::from(self.end - t))?)
    }

    pub fn is_zero(&self) -> bool {
        self.bias.is_zero() && self.slope.is_zero()
    }

    pub fn merge(&mut self, other: &Point) -> StdResult<()> {
        self.bias = self.bias.checked_add(other.bias)?;
        self.slope = self.slope.checked_add(other.slope)?;
        self.end = self.end.max(other.end);

        Ok(())
    }

    pub fn subtract(&mut self, bias: Uint128, slope: Uint128) {
        self.bias = self.bias.saturating_sub(bias);
        self.slope = self.slope.saturating_sub(slope);
    }
}

fn validate_window(start: u64, end: u64) -> StdResult<()> {
    if !is_week_aligned(end) {
        return Err(StdError::generic_err(format!(
            "Point end {end} is not aligned to a week boundary"
        )));
    }

    if end <= start {
        return Err(StdError::generic_err(format!(
            "Point end {end} must be after its start {start}"
        )));
    }

    Ok(())
}
