// Time values and the statistics derived from them

pub mod codec;
pub mod splits;

pub use codec::{TimeValue, UNSET_DISPLAY, display_time};
pub use splits::{
    BestLap, BestSplits, LapSlot, TrackBests, best_finish, best_splits, derive_lap3, split_sum,
};
