//! Race difficulty table and data-driven tuning
//!
//! Difficulty fixes the size of the obstacle field, the race length and the
//! prize. Tuning holds every physics/AI constant so balance can be adjusted
//! from a JSON file without a rebuild.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::catalog::{VehicleModel, VehicleStats};
use crate::error::{RaceError, Result};
use crate::sim::physics;

/// Race difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Difficult,
    Insane,
    /// Stress mode: huge obstacle churn, no collisions
    PerformanceTest,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Difficult,
        Difficulty::Insane,
        Difficulty::PerformanceTest,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Difficult => "difficult",
            Difficulty::Insane => "insane",
            Difficulty::PerformanceTest => "performance_test",
        }
    }

    pub fn from_key(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "difficult" => Ok(Difficulty::Difficult),
            "insane" => Ok(Difficulty::Insane),
            "performance_test" | "perf" => Ok(Difficulty::PerformanceTest),
            _ => Err(RaceError::UnknownDifficulty(s.to_string())),
        }
    }

    /// Menu title shown on the track select screen
    pub fn title(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Bargain Hunt",
            Difficulty::Medium => "Everyday Shopper",
            Difficulty::Difficult => "Black Friday Frenzy",
            Difficulty::Insane => "Clearance Chaos",
            Difficulty::PerformanceTest => "Performance Test",
        }
    }

    /// Cap on concurrently live obstacles
    pub fn max_obstacles(&self) -> usize {
        match self {
            Difficulty::Easy => 5,
            Difficulty::Medium => 8,
            Difficulty::Difficult => 12,
            Difficulty::Insane => 18,
            Difficulty::PerformanceTest => 22,
        }
    }

    /// Race length in seconds
    pub fn race_duration(&self) -> f64 {
        match self {
            Difficulty::Easy => 60.0,
            Difficulty::Medium => 120.0,
            Difficulty::Difficult => 180.0,
            Difficulty::Insane => 300.0,
            Difficulty::PerformanceTest => 7200.0,
        }
    }

    /// Prize for beating the rival
    pub fn winning_money(&self) -> u64 {
        match self {
            Difficulty::Easy => 1500,
            Difficulty::Medium => 4000,
            Difficulty::Difficult => 9000,
            Difficulty::Insane => 20_000,
            Difficulty::PerformanceTest => 1_000_000,
        }
    }

    /// Vehicle the rival drives at this difficulty
    pub fn rival_model(&self) -> VehicleModel {
        match self {
            Difficulty::Easy => VehicleModel::Basic,
            Difficulty::Medium => VehicleModel::Sports,
            Difficulty::Difficult => VehicleModel::Big,
            Difficulty::Insane | Difficulty::PerformanceTest => VehicleModel::Super,
        }
    }

    /// Whether player collisions are resolved at all
    pub fn collisions_enabled(&self) -> bool {
        *self != Difficulty::PerformanceTest
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Obstacle field tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackTuning {
    /// Placement attempts per tick before spawning is deferred
    pub spawn_attempts: u32,
    /// Highest spawn y (top of the visible arena)
    pub spawn_y_max: i32,
    /// Lowest spawn y (above the arena, scrolls into view)
    pub spawn_y_min: i32,
    /// Downward scroll per tick
    pub scroll_step: f32,
}

impl Default for TrackTuning {
    fn default() -> Self {
        Self {
            spawn_attempts: 10,
            spawn_y_max: 0,
            spawn_y_min: -256,
            scroll_step: 1.0,
        }
    }
}

/// Rival steering tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RivalTuning {
    /// Seconds between steering decisions
    pub decision_interval: f64,
    /// Chance per decision to start wandering diagonally
    pub wander_chance: f64,
    /// Wander duration range in seconds
    pub wander_min_secs: f64,
    pub wander_max_secs: f64,
    /// Rival chases the player when not this far ahead (vertically)
    pub min_distance_ahead: f32,
    /// Horizontal gap that triggers avoidance
    pub side_detection: f32,
    /// Vertical gap band that triggers avoidance
    pub up_detection: f32,
    pub down_detection: f32,
    /// Velocity decay before new acceleration is added
    pub smoothing: f32,
    /// Shove applied when the rival actually hits something
    pub drag_x: f32,
    pub drag_y: f32,
    /// Distance kept from the arena walls
    pub wall_buffer_x: f32,
    pub wall_buffer_y: f32,
}

impl Default for RivalTuning {
    fn default() -> Self {
        Self {
            decision_interval: 0.1,
            wander_chance: 0.075,
            wander_min_secs: 1.0,
            wander_max_secs: 5.0,
            min_distance_ahead: 10.0,
            side_detection: 10.0,
            up_detection: 10.0,
            down_detection: 10.0,
            smoothing: 0.9,
            drag_x: 3.0,
            drag_y: 5.0,
            wall_buffer_x: 5.0,
            wall_buffer_y: 25.0,
        }
    }
}

/// Player handling and collision response tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Seconds between physics integrations
    pub move_interval: f64,
    /// Extra reach of the player's hitbox
    pub collision_buffer: f32,
    /// Velocity kept (and reversed) on a bounce
    pub bounce_factor: f32,
    /// Shove applied after a head-on hit
    pub drag_x: f32,
    pub drag_y: f32,
    /// Health lost per hit
    pub damage: i32,
    /// Minimum seconds between two damage applications
    pub damage_interval: f64,
    /// Grip multiplier while on a water spill
    pub water_grip: f32,
    /// Seconds the water effect lasts after the latest hit
    pub water_duration: f64,
    /// Boost/brake target factor = strength * multiplier
    pub boost_multiplier: f32,
    pub brake_multiplier: f32,
    /// Per-integration easing step for boost/brake factors
    pub factor_easing: f32,
    /// Paid on a crash
    pub repair_cost: u64,
    /// Range credited for a money pickup (inclusive)
    pub money_min: u64,
    pub money_max: u64,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            move_interval: 0.05,
            collision_buffer: 2.0,
            bounce_factor: -0.5,
            drag_x: 3.0,
            drag_y: 4.0,
            damage: 20,
            damage_interval: 0.5,
            water_grip: 0.2,
            water_duration: 3.0,
            boost_multiplier: 10.0,
            brake_multiplier: 10.0,
            factor_easing: 0.1,
            repair_cost: 250,
            money_min: 10,
            money_max: 1000,
        }
    }
}

/// Weight-dependent handling shared by every trolley
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlingTuning {
    /// Weight can raise grip by at most this factor
    pub max_grip_multiplier: f32,
    /// Weight scaling of acceleration/deceleration
    pub acceleration_weight_factor: f32,
    pub deceleration_weight_factor: f32,
    pub min_deceleration_denominator: f32,
}

impl Default for HandlingTuning {
    fn default() -> Self {
        Self {
            max_grip_multiplier: 1.2,
            acceleration_weight_factor: 0.1,
            deceleration_weight_factor: 0.05,
            min_deceleration_denominator: 0.9,
        }
    }
}

impl HandlingTuning {
    /// Grip after the weight bonus
    pub fn grip(&self, stats: &VehicleStats) -> f32 {
        physics::weighted_grip(stats.grip, stats.weight, self.max_grip_multiplier)
    }

    /// Acceleration after weight scaling
    pub fn acceleration(&self, stats: &VehicleStats) -> f32 {
        physics::weighted_acceleration(stats.acceleration, stats.weight, self.acceleration_weight_factor)
    }

    /// Deceleration after weight scaling
    pub fn deceleration(&self, stats: &VehicleStats) -> f32 {
        physics::weighted_deceleration(
            stats.deceleration,
            stats.weight,
            self.deceleration_weight_factor,
            self.min_deceleration_denominator,
        )
    }
}

/// All data-driven balance values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub handling: HandlingTuning,
    pub track: TrackTuning,
    pub rival: RivalTuning,
    pub player: PlayerTuning,
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would leave a random range empty or a chance
    /// outside [0, 1]
    pub fn validate(&self) -> Result<()> {
        let rival = &self.rival;
        if !(0.0..=1.0).contains(&rival.wander_chance) {
            return Err(invalid(format!(
                "rival.wander_chance must be within [0, 1], got {}",
                rival.wander_chance
            )));
        }
        if rival.wander_min_secs < 0.0 || rival.wander_min_secs > rival.wander_max_secs {
            return Err(invalid(format!(
                "rival.wander_min_secs ({}) must be between 0 and rival.wander_max_secs ({})",
                rival.wander_min_secs, rival.wander_max_secs
            )));
        }

        let track = &self.track;
        if track.spawn_y_min > track.spawn_y_max {
            return Err(invalid(format!(
                "track.spawn_y_min ({}) is above track.spawn_y_max ({})",
                track.spawn_y_min, track.spawn_y_max
            )));
        }

        let player = &self.player;
        if player.money_min > player.money_max {
            return Err(invalid(format!(
                "player.money_min ({}) is above player.money_max ({})",
                player.money_min, player.money_max
            )));
        }
        Ok(())
    }

    /// Load tuning from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| RaceError::Config {
            path: path.display().to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }
}

fn invalid(reason: String) -> RaceError {
    log::warn!("Rejected tuning: {reason}");
    RaceError::InvalidTuning(reason)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_table() {
        let caps: Vec<usize> = Difficulty::ALL.iter().map(|d| d.max_obstacles()).collect();
        assert_eq!(caps, vec![5, 8, 12, 18, 22]);

        let prizes: Vec<u64> = Difficulty::ALL.iter().map(|d| d.winning_money()).collect();
        assert_eq!(prizes, vec![1500, 4000, 9000, 20_000, 1_000_000]);

        assert_eq!(Difficulty::Insane.race_duration(), 300.0);
        assert!(!Difficulty::PerformanceTest.collisions_enabled());
        assert!(Difficulty::Easy.collisions_enabled());
    }

    #[test]
    fn test_difficulty_keys() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_key(d.as_str()).unwrap(), d);
        }
        assert!(matches!(
            Difficulty::from_key("nightmare"),
            Err(RaceError::UnknownDifficulty(_))
        ));
    }

    #[test]
    fn test_rival_models() {
        assert_eq!(Difficulty::Easy.rival_model(), VehicleModel::Basic);
        assert_eq!(Difficulty::Difficult.rival_model(), VehicleModel::Big);
        assert_eq!(Difficulty::PerformanceTest.rival_model(), VehicleModel::Super);
    }

    #[test]
    fn test_partial_tuning_json() {
        let tuning = Tuning::from_json(r#"{ "player": { "damage": 35 } }"#).unwrap();
        assert_eq!(tuning.player.damage, 35);
        assert_eq!(tuning.player.repair_cost, 250);
        assert_eq!(tuning.track.spawn_attempts, 10);
        assert_eq!(tuning.rival.smoothing, 0.9);
        assert_eq!(tuning.handling.max_grip_multiplier, 1.2);
    }

    #[test]
    fn test_handling_for_basic_trolley() {
        let handling = HandlingTuning::default();
        let stats = VehicleModel::Basic.archetype().stats;
        assert!((handling.grip(&stats) - 0.24).abs() < 1e-6);
        assert!((handling.acceleration(&stats) - 0.5 / 4.6).abs() < 1e-6);
        assert!((handling.deceleration(&stats) - 0.35 / 2.8).abs() < 1e-6);
    }

    #[test]
    fn test_bad_tuning_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(RaceError::ConfigParse(_))
        ));
    }

    #[test]
    fn test_default_tuning_is_valid() {
        assert!(Tuning::default().validate().is_ok());
        // Degenerate but sampleable ranges are fine
        let tuning = Tuning::from_json(
            r#"{ "rival": { "wander_chance": 1.0, "wander_min_secs": 2.0, "wander_max_secs": 2.0 },
                 "track": { "spawn_y_min": 0, "spawn_y_max": 0 },
                 "player": { "money_min": 50, "money_max": 50 } }"#,
        );
        assert!(tuning.is_ok());
    }

    fn rejected(json: &str) -> String {
        match Tuning::from_json(json) {
            Err(RaceError::InvalidTuning(reason)) => reason,
            other => panic!("expected InvalidTuning for {json}, got {other:?}"),
        }
    }

    #[test]
    fn test_wander_chance_out_of_range() {
        assert!(rejected(r#"{ "rival": { "wander_chance": 1.5 } }"#).contains("wander_chance"));
        assert!(rejected(r#"{ "rival": { "wander_chance": -0.1 } }"#).contains("wander_chance"));
    }

    #[test]
    fn test_wander_secs_inverted() {
        let reason = rejected(r#"{ "rival": { "wander_min_secs": 6.0, "wander_max_secs": 5.0 } }"#);
        assert!(reason.contains("wander_min_secs"));
        assert!(rejected(r#"{ "rival": { "wander_min_secs": -1.0 } }"#).contains("wander_min_secs"));
    }

    #[test]
    fn test_spawn_band_inverted() {
        let reason = rejected(r#"{ "track": { "spawn_y_min": 10, "spawn_y_max": 0 } }"#);
        assert!(reason.contains("spawn_y_min"));
    }

    #[test]
    fn test_money_range_inverted() {
        let reason = rejected(r#"{ "player": { "money_min": 2000 } }"#);
        assert!(reason.contains("money_min"));
    }

    #[test]
    fn test_invalid_tuning_file_fails_to_load() {
        let path = std::env::temp_dir().join(format!("trolley_dash_tuning_{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "rival": { "wander_chance": 1.5 } }"#).unwrap();
        let result = Tuning::load(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(RaceError::InvalidTuning(_))));
    }

    #[test]
    fn test_missing_tuning_file() {
        let err = Tuning::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, RaceError::Config { .. }));
    }
}
