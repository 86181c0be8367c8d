//! Platform abstraction layer
//!
//! Feeds the race core from the outside world:
//! - Time (`Clock`)
//! - Button samples (`InputSource`)
//! - The frame loop that ties them to `sim::tick`

pub mod clock;
pub mod driver;
pub mod input;

pub use clock::{Clock, FixedStepClock, SystemClock};
pub use driver::{LogReporter, run_race};
pub use input::{Autopilot, InputSource, ScriptedInput};
