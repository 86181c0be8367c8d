//! Race state and core simulation types
//!
//! A `RaceEngine` lives for exactly one race attempt. It owns the player's
//! trolley, the track generator, the rival and the seeded RNG, so a race is
//! fully reproducible from its seed, its inputs and the clock readings.

use std::fmt;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ai::AiEngine;
use super::collision::BlockedSides;
use super::entity::{Entity, PLAYER_ID};
use super::ports::DisplaySink;
use super::track::TrackGenerator;
use super::vehicle::Vehicle;
use crate::consts::PLAYER_START;
use crate::error::Result;
use crate::garage::PlayerStats;
use crate::settings::{Difficulty, Tuning};

/// Current phase of a race
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RacePhase {
    Running,
    Paused,
    /// Terminal; further ticks do nothing
    Finished,
}

/// How a race ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OutcomeKind {
    Win,
    Lose,
    Draw,
    Crash,
}

/// Terminal result reported to the menu layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RaceOutcome {
    pub kind: OutcomeKind,
    /// Prize credited (win/draw), 0 on a loss, repair cost on a crash
    pub amount: u64,
}

impl fmt::Display for RaceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            OutcomeKind::Win => write!(f, "You win! Prize money: ${}", self.amount),
            OutcomeKind::Lose => write!(f, "You lost! Better luck next time!"),
            OutcomeKind::Draw => write!(f, "You draw! You split the prize money: ${}", self.amount),
            OutcomeKind::Crash => write!(f, "You crashed! Repairs cost ${}", self.amount),
        }
    }
}

/// Why a race loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RaceExit {
    /// Win/lose/draw/crash, money already settled
    Finished(RaceOutcome),
    /// Player backed out from the pause screen; nothing settled
    Abandoned,
}

/// Transient player handling state, zeroed at race start
#[derive(Debug, Clone)]
pub struct PlayerControl {
    pub velocity: Vec2,
    /// Eased boost multiplier (1.0 when the boost button is released)
    pub boost_factor: f32,
    /// Eased brake multiplier (1.0 when the brake button is released)
    pub brake_factor: f32,
    pub blocked: BlockedSides,
    /// 1.0 normally, reduced while on a water spill
    pub grip_factor: f32,
    /// Time of the latest water spill hit while the effect is active
    pub water_hit_at: Option<f64>,
    pub last_move: f64,
    pub last_damage: f64,
}

impl PlayerControl {
    pub fn new(now: f64) -> Self {
        Self {
            velocity: Vec2::ZERO,
            boost_factor: 1.0,
            brake_factor: 1.0,
            blocked: BlockedSides::default(),
            grip_factor: 1.0,
            water_hit_at: None,
            last_move: now,
            last_damage: now,
        }
    }

    pub fn grip_affected(&self) -> bool {
        self.water_hit_at.is_some()
    }
}

/// One race attempt
#[derive(Debug, Clone)]
pub struct RaceEngine {
    pub(crate) difficulty: Difficulty,
    pub(crate) tuning: Tuning,
    pub(crate) seed: u64,
    pub(crate) rng: Pcg32,
    pub(crate) phase: RacePhase,
    pub(crate) player: Vehicle,
    pub(crate) control: PlayerControl,
    pub(crate) track: TrackGenerator,
    pub(crate) rival: AiEngine,
    pub(crate) pause_started: f64,
    pub(crate) total_pause: f64,
    /// Start button state last tick (pause toggles on the press edge)
    pub(crate) start_held: bool,
    pub(crate) ticks: u64,
    pub(crate) money_collected: u64,
    pub(crate) exit: Option<RaceExit>,
}

impl RaceEngine {
    /// Set up a race with `vehicle` (a garage trolley) at the start line
    pub fn new(difficulty: Difficulty, vehicle: &Vehicle, tuning: Tuning, seed: u64, now: f64) -> Self {
        let player = vehicle.race_copy(PLAYER_ID, Vec2::new(PLAYER_START.0, PLAYER_START.1));
        Self::with_player(difficulty, player, tuning, seed, now)
    }

    /// Set up a race with the player's selected trolley and difficulty.
    ///
    /// Fails with `NoVehicleSelected` when nothing is selected.
    pub fn from_garage(stats: &PlayerStats, tuning: Tuning, seed: u64, now: f64) -> Result<Self> {
        let player = stats.race_vehicle()?;
        Ok(Self::with_player(stats.difficulty, player, tuning, seed, now))
    }

    fn with_player(difficulty: Difficulty, player: Vehicle, tuning: Tuning, seed: u64, now: f64) -> Self {
        let mut track = TrackGenerator::new(difficulty, tuning.track.clone());
        track.start_clock(now);
        let rival = AiEngine::new(difficulty, tuning.rival.clone(), tuning.handling.clone());

        log::info!(
            "Race start: {} vs {} on {} (seed {})",
            player.model.key(),
            rival.vehicle().model.key(),
            difficulty,
            seed
        );

        Self {
            difficulty,
            tuning,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: RacePhase::Running,
            player,
            control: PlayerControl::new(now),
            track,
            rival,
            pause_started: 0.0,
            total_pause: 0.0,
            start_held: false,
            ticks: 0,
            money_collected: 0,
            exit: None,
        }
    }

    /// Put the two trolleys on the display
    pub fn announce(&self, display: &mut dyn DisplaySink) {
        display.add_entity(&self.player.entity);
        display.add_entity(self.rival.entity());
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn phase(&self) -> RacePhase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase == RacePhase::Paused
    }

    pub fn player(&self) -> &Vehicle {
        &self.player
    }

    pub fn player_velocity(&self) -> Vec2 {
        self.control.velocity
    }

    pub fn control(&self) -> &PlayerControl {
        &self.control
    }

    /// Current water-spill grip multiplier
    pub fn grip_multiplier(&self) -> f32 {
        self.control.grip_factor
    }

    pub fn track(&self) -> &TrackGenerator {
        &self.track
    }

    pub fn rival(&self) -> &AiEngine {
        &self.rival
    }

    pub fn obstacles(&self) -> &[Entity] {
        self.track.obstacles()
    }

    pub fn elapsed_time(&self) -> f64 {
        self.track.elapsed_time()
    }

    pub fn total_pause(&self) -> f64 {
        self.total_pause
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Money picked up on the track this race
    pub fn money_collected(&self) -> u64 {
        self.money_collected
    }

    pub fn exit(&self) -> Option<RaceExit> {
        self.exit
    }

    /// Mutable track access (scenario setup in tests and tools)
    pub fn track_mut(&mut self) -> &mut TrackGenerator {
        &mut self.track
    }

    /// Mutable rival access (scenario setup in tests and tools)
    pub fn rival_mut(&mut self) -> &mut AiEngine {
        &mut self.rival
    }

    /// Move the player's trolley (scenario setup in tests and tools)
    pub fn place_player(&mut self, pos: Vec2) {
        self.player.entity.pos = pos;
    }
}
