pub mod entry;
pub mod stats;

pub use entry::{Activity, FitnessRecord, NewEntry, DATE_FORMAT};
pub(crate) use entry::FitnessRow;
pub use stats::{RunningStats, WeightPoint};
