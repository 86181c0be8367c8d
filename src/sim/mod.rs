//! Deterministic race simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time is injected by the caller, never read from the system
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies; collaborators are traits in `ports`

pub mod ai;
pub mod collision;
pub mod entity;
pub mod physics;
pub mod ports;
pub mod state;
pub mod tick;
pub mod track;
pub mod vehicle;

pub use ai::{AiEngine, Wander};
pub use collision::{BlockedSides, bounce_away, drag_push};
pub use entity::{
    Aabb, Entity, EntityId, EntityKind, ObstacleKind, FIRST_OBSTACLE_ID, PLAYER_ID, RIVAL_ID,
    SPAWN_WEIGHTS,
};
pub use ports::{CurrencyLedger, DisplaySink, NullDisplay, OutcomeReporter, RaceContext};
pub use state::{OutcomeKind, PlayerControl, RaceEngine, RaceExit, RaceOutcome, RacePhase};
pub use tick::{TickInput, tick};
pub use track::{TrackGenerator, TrackStats};
pub use vehicle::{UpgradeSet, Vehicle};
