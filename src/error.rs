//! Error types for the race core.

use thiserror::Error;

/// Result type alias using [`RaceError`].
pub type Result<T> = std::result::Result<T, RaceError>;

/// Top-level error type for the race core.
#[derive(Debug, Error)]
pub enum RaceError {
    /// A race was started without a selected vehicle.
    ///
    /// The menu layer redirects to the shop when the garage is empty and to
    /// the garage otherwise.
    #[error("You need to select a trolley first")]
    NoVehicleSelected {
        /// True when the player owns no vehicle at all.
        garage_empty: bool,
    },

    /// Unknown vehicle catalog key.
    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(String),

    /// Unknown upgrade catalog key.
    #[error("Unknown upgrade: {0}")]
    UnknownUpgrade(String),

    /// Unknown obstacle type key.
    #[error("Unknown obstacle type: {0}")]
    UnknownObstacle(String),

    /// Unknown difficulty key.
    #[error("Unknown difficulty: {0}")]
    UnknownDifficulty(String),

    /// The vehicle is not in the player's garage.
    #[error("Vehicle not owned: {0}")]
    VehicleNotOwned(String),

    /// Failed to read a tuning file.
    #[error("Failed to read config '{path}': {source}")]
    Config {
        /// Path to the file that failed to load.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Failed to parse tuning JSON.
    #[error("Failed to parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Tuning parsed but holds a value the race cannot run with.
    #[error("Invalid tuning: {0}")]
    InvalidTuning(String),
}
