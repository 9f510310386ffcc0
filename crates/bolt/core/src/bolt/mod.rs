//! Bolt lifecycle: launch, flight and impact.
//!
//! A cast becomes one [`BoltImpact`] per target, queued on the region's
//! [`Scheduler`](crate::schedule::Scheduler) with a delay proportional to the
//! distance. When the delay elapses the impact resolves against whatever the
//! region looks like at that tick.
mod impact;
mod launch;
mod resolve;

pub use impact::{BoltImpact, ImpactContext, Resolution};
pub use launch::{
    LaunchContext, LaunchRequest, LaunchStep, impact_delay, launch, resume_after_line_of_sight,
    schedule_bolt, travel_ticks, visual_delay,
};
