//! Vehicle and upgrade catalog
//!
//! The fixed table of purchasable trolleys and upgrades. The race core only
//! instantiates from these archetypes; it never mutates them.

use serde::{Deserialize, Serialize};

use crate::error::{RaceError, Result};

/// Handling stats shared by vehicles and upgrade deltas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct VehicleStats {
    pub max_health: i32,
    pub weight: f32,
    /// Top speed (per physics step)
    pub speed: f32,
    pub acceleration: f32,
    pub deceleration: f32,
    pub grip: f32,
    pub boost_strength: f32,
    pub brake_strength: f32,
}

impl VehicleStats {
    /// Add an upgrade delta to these stats
    pub fn apply_delta(&mut self, delta: &VehicleStats) {
        self.max_health += delta.max_health;
        self.weight += delta.weight;
        self.speed += delta.speed;
        self.acceleration += delta.acceleration;
        self.deceleration += delta.deceleration;
        self.grip += delta.grip;
        self.boost_strength += delta.boost_strength;
        self.brake_strength += delta.brake_strength;
    }
}

/// Trolley models sold in the shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum VehicleModel {
    Basic,
    Sports,
    Big,
    Super,
}

/// Catalog entry for a trolley model
#[derive(Debug, Clone, Copy)]
pub struct VehicleArchetype {
    pub key: &'static str,
    pub name: &'static str,
    pub cost: u64,
    pub stats: VehicleStats,
}

impl VehicleModel {
    pub const ALL: [VehicleModel; 4] = [
        VehicleModel::Basic,
        VehicleModel::Sports,
        VehicleModel::Big,
        VehicleModel::Super,
    ];

    pub fn key(&self) -> &'static str {
        self.archetype().key
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.key() == key)
            .ok_or_else(|| RaceError::UnknownVehicle(key.to_string()))
    }

    pub fn archetype(&self) -> VehicleArchetype {
        match self {
            VehicleModel::Basic => VehicleArchetype {
                key: "trolley_basic",
                name: "CartMaster 1000 by BudgetMart",
                cost: 100,
                stats: VehicleStats {
                    max_health: 120,
                    weight: 36.0,
                    speed: 1.8,
                    acceleration: 0.5,
                    deceleration: 0.35,
                    grip: 0.2,
                    boost_strength: 1.5,
                    brake_strength: 1.4,
                },
            },
            VehicleModel::Sports => VehicleArchetype {
                key: "trolley_better",
                name: "Speedy Shopper by QuickCart Co.",
                cost: 5000,
                stats: VehicleStats {
                    max_health: 80,
                    weight: 28.0,
                    speed: 2.4,
                    acceleration: 0.7,
                    deceleration: 0.5,
                    grip: 0.38,
                    boost_strength: 1.8,
                    brake_strength: 1.6,
                },
            },
            VehicleModel::Big => VehicleArchetype {
                key: "trolley_big",
                name: "Mega Mover by BulkBuy",
                cost: 10_000,
                stats: VehicleStats {
                    max_health: 300,
                    weight: 80.0,
                    speed: 2.04,
                    acceleration: 0.8,
                    deceleration: 0.4,
                    grip: 0.3,
                    boost_strength: 1.2,
                    brake_strength: 1.7,
                },
            },
            VehicleModel::Super => VehicleArchetype {
                key: "trolley_super",
                name: "Turbo Trolley by HyperMart",
                cost: 20_000,
                stats: VehicleStats {
                    max_health: 250,
                    weight: 30.0,
                    speed: 2.52,
                    acceleration: 1.0,
                    deceleration: 0.5,
                    grip: 0.18,
                    boost_strength: 2.4,
                    brake_strength: 2.2,
                },
            },
        }
    }
}

/// Upgrades sold in the upgrade shop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    CarbonFibreWheels,
    RacingHandle,
    ScanningComputer,
    CarbonFibreFrame,
    NitrousOxide,
    Brakes,
    Exhaust,
    Turbo,
    AirFilter,
    ComputerChip,
    Suspension,
}

/// Catalog entry for an upgrade
#[derive(Debug, Clone, Copy)]
pub struct UpgradeArchetype {
    pub key: &'static str,
    pub name: &'static str,
    pub cost: u64,
    pub delta: VehicleStats,
}

#[allow(clippy::too_many_arguments)]
const fn delta(
    max_health: i32,
    weight: f32,
    speed: f32,
    acceleration: f32,
    deceleration: f32,
    grip: f32,
    boost_strength: f32,
    brake_strength: f32,
) -> VehicleStats {
    VehicleStats {
        max_health,
        weight,
        speed,
        acceleration,
        deceleration,
        grip,
        boost_strength,
        brake_strength,
    }
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 11] = [
        UpgradeKind::CarbonFibreWheels,
        UpgradeKind::RacingHandle,
        UpgradeKind::ScanningComputer,
        UpgradeKind::CarbonFibreFrame,
        UpgradeKind::NitrousOxide,
        UpgradeKind::Brakes,
        UpgradeKind::Exhaust,
        UpgradeKind::Turbo,
        UpgradeKind::AirFilter,
        UpgradeKind::ComputerChip,
        UpgradeKind::Suspension,
    ];

    /// Bit used in a vehicle's applied-upgrade set
    pub fn bit(&self) -> u16 {
        1 << (*self as u16)
    }

    pub fn key(&self) -> &'static str {
        self.archetype().key
    }

    pub fn from_key(key: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|u| u.key() == key)
            .ok_or_else(|| RaceError::UnknownUpgrade(key.to_string()))
    }

    pub fn archetype(&self) -> UpgradeArchetype {
        // delta columns: health, weight, speed, accel, decel, grip, boost, brake
        let (key, name, cost, delta) = match self {
            UpgradeKind::CarbonFibreWheels => (
                "carbon_fibre_wheels",
                "Carbon Fibre Wheels",
                700,
                delta(35, -6.0, 0.05, 0.0, 0.35, 0.2, 0.0, 0.4),
            ),
            UpgradeKind::RacingHandle => (
                "racing_handle",
                "Racing Handle",
                1000,
                delta(20, -4.0, 0.075, 0.0, 0.15, 0.22, 0.0, 0.0),
            ),
            UpgradeKind::ScanningComputer => (
                "scanning_computer",
                "Scanning Computer",
                2000,
                delta(0, 0.0, 0.025, 0.05, 0.05, 0.0, 0.0, 0.0),
            ),
            UpgradeKind::CarbonFibreFrame => (
                "carbon_fibre_frame",
                "Carbon Fibre Frame",
                5000,
                delta(120, -12.0, 0.04, 0.075, 0.175, 0.0, 0.0, 0.0),
            ),
            UpgradeKind::NitrousOxide => (
                "nitrous_oxide",
                "Nitrous Oxide",
                6000,
                delta(0, 15.0, 0.06, 0.3, -0.45, 0.0, 0.2, 0.0),
            ),
            UpgradeKind::Brakes => (
                "brake_upgrade",
                "Brake Upgrade",
                500,
                delta(0, 0.0, 0.0, 0.0, 0.25, 0.0, 0.0, 0.35),
            ),
            UpgradeKind::Exhaust => (
                "exhaust_upgrade",
                "Exhaust Upgrade",
                800,
                delta(0, 10.0, 0.02, 0.25, 0.0, 0.0, 0.12, 0.0),
            ),
            UpgradeKind::Turbo => (
                "turbo_upgrade",
                "Turbo Upgrade",
                4500,
                delta(0, 55.0, 0.025, 0.2, -0.5, 0.0, 0.15, 0.0),
            ),
            UpgradeKind::AirFilter => (
                "air_filter_upgrade",
                "Air Filter Upgrade",
                350,
                delta(0, 0.0, 0.01, 0.015, 0.0, 0.0, 0.02, 0.0),
            ),
            UpgradeKind::ComputerChip => (
                "computer_chip_upgrade",
                "Computer Chip Upgrade",
                2500,
                delta(0, 0.0, 0.02, 0.025, 0.03, 0.0, 0.15, 0.0),
            ),
            UpgradeKind::Suspension => (
                "suspension_upgrade",
                "Suspension Upgrade",
                700,
                delta(0, 0.0, 0.0, 0.025, 0.085, 0.15, 0.0, 0.5),
            ),
        };
        UpgradeArchetype {
            key,
            name,
            cost,
            delta,
        }
    }
}
