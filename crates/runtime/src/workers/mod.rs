//! Worker tasks that back the runtime orchestration.
//!
//! Each hosted region gets one [`RegionWorker`]; it is the region's tick thread
//! and the only owner of its combatants and in-flight bolts.

mod region;

pub use region::{Command, Emigrant, RegionServices, RegionWorker};
