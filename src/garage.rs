//! Player money, owned trolleys and the shop flows
//!
//! Kept in memory for the session; the race core sees it only through the
//! `CurrencyLedger` port.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::catalog::{UpgradeKind, VehicleModel};
use crate::consts::{PLAYER_START, STARTING_MONEY};
use crate::error::{RaceError, Result};
use crate::settings::Difficulty;
use crate::sim::entity::PLAYER_ID;
use crate::sim::ports::CurrencyLedger;
use crate::sim::vehicle::Vehicle;

/// Result of a shop action, shown to the player as-is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    Purchased,
    Selected,
    Installed,
    AlreadyApplied,
    NotEnoughMoney,
    NoVehicle,
}

impl fmt::Display for ShopOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ShopOutcome::Purchased => "Purchased.",
            ShopOutcome::Selected => "Selected.",
            ShopOutcome::Installed => "Installed.",
            ShopOutcome::AlreadyApplied => "Already applied.",
            ShopOutcome::NotEnoughMoney => "Not enough money.",
            ShopOutcome::NoVehicle => "No Trolley.",
        };
        f.write_str(text)
    }
}

/// Everything the player owns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerStats {
    pub money: u64,
    pub garage: BTreeMap<VehicleModel, Vehicle>,
    pub current: Option<VehicleModel>,
    pub difficulty: Difficulty,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerStats {
    /// Fresh player: starting money, empty garage, easy difficulty
    pub fn new() -> Self {
        Self {
            money: STARTING_MONEY,
            garage: BTreeMap::new(),
            current: None,
            difficulty: Difficulty::default(),
        }
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    pub fn owns(&self, model: VehicleModel) -> bool {
        self.garage.contains_key(&model)
    }

    /// Buy `model` if it is not owned yet, otherwise make it the current trolley
    pub fn buy_or_select(&mut self, model: VehicleModel) -> ShopOutcome {
        if self.owns(model) {
            self.current = Some(model);
            return ShopOutcome::Selected;
        }

        let archetype = model.archetype();
        if !self.debit(archetype.cost) {
            return ShopOutcome::NotEnoughMoney;
        }
        let start = Vec2::new(PLAYER_START.0, PLAYER_START.1);
        self.garage.insert(model, Vehicle::new(model, PLAYER_ID, start));
        log::info!("Bought {} for ${}", archetype.name, archetype.cost);
        ShopOutcome::Purchased
    }

    /// Make an owned trolley the current one
    pub fn select(&mut self, model: VehicleModel) -> Result<()> {
        if !self.owns(model) {
            return Err(RaceError::VehicleNotOwned(model.key().to_string()));
        }
        self.current = Some(model);
        Ok(())
    }

    /// Fit `upgrade` to the current trolley
    pub fn install_upgrade(&mut self, upgrade: UpgradeKind) -> ShopOutcome {
        let archetype = upgrade.archetype();
        let Some(vehicle) = self.current.and_then(|model| self.garage.get(&model)) else {
            return ShopOutcome::NoVehicle;
        };
        if vehicle.upgrades.contains(upgrade) {
            return ShopOutcome::AlreadyApplied;
        }
        if !self.has_enough(archetype.cost) {
            return ShopOutcome::NotEnoughMoney;
        }

        let Some(vehicle) = self.current.and_then(|model| self.garage.get_mut(&model)) else {
            return ShopOutcome::NoVehicle;
        };
        vehicle.apply_upgrade(upgrade);
        self.money -= archetype.cost;
        log::info!("Installed {} for ${}", archetype.name, archetype.cost);
        ShopOutcome::Installed
    }

    /// The current trolley as it sits in the garage
    pub fn selected_vehicle(&self) -> Result<&Vehicle> {
        self.current
            .and_then(|model| self.garage.get(&model))
            .ok_or(RaceError::NoVehicleSelected {
                garage_empty: self.garage.is_empty(),
            })
    }

    /// Race-ready copy of the current trolley: on the start line, fully repaired
    pub fn race_vehicle(&self) -> Result<Vehicle> {
        let vehicle = self.selected_vehicle()?;
        Ok(vehicle.race_copy(PLAYER_ID, Vec2::new(PLAYER_START.0, PLAYER_START.1)))
    }
}

impl CurrencyLedger for PlayerStats {
    fn has_enough(&self, amount: u64) -> bool {
        self.money >= amount
    }

    fn credit(&mut self, amount: u64) {
        self.money = self.money.saturating_add(amount);
    }

    fn debit(&mut self, amount: u64) -> bool {
        if !self.has_enough(amount) {
            return false;
        }
        self.money -= amount;
        true
    }
}
