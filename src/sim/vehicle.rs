//! Trolleys: catalog stats plus health, position and installed upgrades

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, EntityId, EntityKind};
use crate::catalog::{UpgradeKind, VehicleModel, VehicleStats};

/// Set of upgrades already installed on a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UpgradeSet(u16);

impl UpgradeSet {
    pub fn contains(&self, upgrade: UpgradeKind) -> bool {
        self.0 & upgrade.bit() != 0
    }

    /// Returns false if the upgrade was already present
    pub fn insert(&mut self, upgrade: UpgradeKind) -> bool {
        let fresh = !self.contains(upgrade);
        self.0 |= upgrade.bit();
        fresh
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

/// A trolley in the garage or on the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub entity: Entity,
    pub model: VehicleModel,
    pub stats: VehicleStats,
    pub health: i32,
    pub upgrades: UpgradeSet,
}

impl Vehicle {
    /// Instantiate a catalog model with full health and stock stats
    pub fn new(model: VehicleModel, id: EntityId, pos: Vec2) -> Self {
        let stats = model.archetype().stats;
        Self {
            entity: Entity::new(id, EntityKind::Vehicle(model), pos),
            model,
            stats,
            health: stats.max_health,
            upgrades: UpgradeSet::default(),
        }
    }

    /// Copy of this vehicle placed for a race, repaired to full health
    pub fn race_copy(&self, id: EntityId, pos: Vec2) -> Self {
        let mut vehicle = self.clone();
        vehicle.entity.id = id;
        vehicle.entity.pos = pos;
        vehicle.health = vehicle.stats.max_health;
        vehicle
    }

    /// Install an upgrade once. Returns false (and changes nothing) if it
    /// is already installed.
    pub fn apply_upgrade(&mut self, upgrade: UpgradeKind) -> bool {
        if !self.upgrades.insert(upgrade) {
            return false;
        }
        self.stats.apply_delta(&upgrade.archetype().delta);
        true
    }

    pub fn is_wrecked(&self) -> bool {
        self.health <= 0
    }
}
