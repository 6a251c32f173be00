pub mod ledger;
pub mod point;
pub mod schedule;

pub use ledger::{CatchUp, Checkpoint, CheckpointLedger, MAX_CATCH_UP_WEEKS};
pub use point::{is_week_aligned, week_floor, Point, WEEK};
pub use schedule::SlopeChangeSchedule;

#[cfg(test)]
mod testing;
