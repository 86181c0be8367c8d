//! Collaborators the race core talks to
//!
//! The core never draws, persists or narrates anything itself. It reports
//! geometry to a `DisplaySink`, moves money through a `CurrencyLedger` and
//! hands terminal results to an `OutcomeReporter`.

use super::entity::{Entity, EntityId};
use super::state::RaceOutcome;

/// Player wallet
pub trait CurrencyLedger {
    fn has_enough(&self, amount: u64) -> bool;

    fn credit(&mut self, amount: u64);

    /// Remove `amount`; does nothing and returns false when funds are short
    fn debit(&mut self, amount: u64) -> bool;
}

/// Receives geometry changes and the progress indicator
pub trait DisplaySink {
    fn add_entity(&mut self, entity: &Entity);

    fn remove_entity(&mut self, id: EntityId);

    /// Race progress (the handheld shows it on its LED strip)
    fn set_progress(&mut self, elapsed: f64, total: f64);

    /// Drop everything on race exit
    fn clear(&mut self) {}
}

/// Receives the terminal result of a race for the menu layer to narrate
pub trait OutcomeReporter {
    fn report(&mut self, outcome: &RaceOutcome);
}

/// Sink that discards everything (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplaySink for NullDisplay {
    fn add_entity(&mut self, _entity: &Entity) {}

    fn remove_entity(&mut self, _id: EntityId) {}

    fn set_progress(&mut self, _elapsed: f64, _total: f64) {}
}

/// Bundle of collaborators handed to each race tick
pub struct RaceContext<'a> {
    pub ledger: &'a mut dyn CurrencyLedger,
    pub display: &'a mut dyn DisplaySink,
}

impl<'a> RaceContext<'a> {
    pub fn new(ledger: &'a mut dyn CurrencyLedger, display: &'a mut dyn DisplaySink) -> Self {
        Self { ledger, display }
    }
}
