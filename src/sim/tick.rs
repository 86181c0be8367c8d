//! Race simulation tick
//!
//! One call advances a race by one frame: pause handling, track and rival
//! updates, player collisions, player physics and the end-of-race checks.

use std::cmp::Ordering;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{bounce_away, drag_push};
use super::entity::{Entity, EntityKind, ObstacleKind};
use super::physics::{apply_friction, ease_toward};
use super::ports::RaceContext;
use super::state::{OutcomeKind, RaceEngine, RaceExit, RaceOutcome, RacePhase};
use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, SPRITE_SIZE};

/// Button samples for a single tick (already debounced)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Boost
    pub a: bool,
    /// Brake
    pub b: bool,
    /// Pause toggle (acts on the press edge)
    pub start: bool,
    /// Leave the race (only while paused)
    pub select: bool,
}

/// Advance the race to wall-clock time `now`.
///
/// Returns the exit once the race has ended; after that every call returns
/// the same exit without touching any state.
pub fn tick(race: &mut RaceEngine, now: f64, input: &TickInput, ctx: &mut RaceContext<'_>) -> Option<RaceExit> {
    if let Some(exit) = race.exit {
        return Some(exit);
    }

    // Toggle once per press, not once per held frame
    if input.start && !race.start_held {
        toggle_pause(race, now);
    }
    race.start_held = input.start;

    if race.phase == RacePhase::Paused {
        if input.select {
            log::info!("Race abandoned from the pause screen");
            return Some(finish(race, RaceExit::Abandoned, ctx));
        }
        return None;
    }

    race.ticks += 1;
    race.control.blocked.clear();

    if let Some(spawned) = race.track.update(now, race.total_pause, &mut race.rng) {
        ctx.display.add_entity(&spawned);
    }
    ctx.display.set_progress(race.track.elapsed_time(), race.track.race_duration());

    race.rival
        .update_ai_movement(now, race.track.obstacles(), &race.player.entity, &mut race.rng);

    for evicted in race.track.cleanup_obstacles() {
        ctx.display.remove_entity(evicted.id);
    }

    if race.difficulty.collisions_enabled() {
        resolve_collisions(race, now, ctx);
    }

    if now - race.control.last_move > race.tuning.player.move_interval {
        move_player(race, input);
        race.control.last_move = now;
    }

    expire_water(race, now);

    if race.player.is_wrecked() {
        let outcome = crash(race, ctx);
        return Some(finish(race, RaceExit::Finished(outcome), ctx));
    }

    if race.track.elapsed_time() >= race.track.race_duration() {
        let outcome = settle(race, ctx);
        return Some(finish(race, RaceExit::Finished(outcome), ctx));
    }

    None
}

fn toggle_pause(race: &mut RaceEngine, now: f64) {
    match race.phase {
        RacePhase::Running => {
            race.phase = RacePhase::Paused;
            race.pause_started = now;
            log::debug!("Paused at {:.2}s", race.track.elapsed_time());
        }
        RacePhase::Paused => {
            race.total_pause += now - race.pause_started;
            race.phase = RacePhase::Running;
            log::debug!("Resumed, {:.2}s paused in total", race.total_pause);
        }
        RacePhase::Finished => {}
    }
}

/// Test the player against every obstacle, then against the rival
fn resolve_collisions(race: &mut RaceEngine, now: f64, ctx: &mut RaceContext<'_>) {
    let buffer = race.tuning.player.collision_buffer;

    let mut index = 0;
    while index < race.track.obstacles().len() {
        let obstacle = race.track.obstacles()[index];
        let hit = race.player.entity.aabb().intersects_with_buffer(&obstacle.aabb(), buffer);
        if hit && on_collision(race, now, &obstacle, ctx) {
            // Obstacle removed; the next one shifted into this slot
            continue;
        }
        index += 1;
    }

    let rival = *race.rival.entity();
    if race.player.entity.aabb().intersects_with_buffer(&rival.aabb(), buffer) {
        on_collision(race, now, &rival, ctx);
    }
}

/// Apply the effect of touching `other`; returns true if it was removed
fn on_collision(race: &mut RaceEngine, now: f64, other: &Entity, ctx: &mut RaceContext<'_>) -> bool {
    match other.kind {
        EntityKind::Obstacle(ObstacleKind::Money) => {
            race.track.remove(other.id);
            ctx.display.remove_entity(other.id);
            let tuning = &race.tuning.player;
            let amount = race.rng.random_range(tuning.money_min..=tuning.money_max);
            ctx.ledger.credit(amount);
            race.money_collected += amount;
            log::debug!("Picked up ${amount}");
            true
        }
        EntityKind::Obstacle(ObstacleKind::WaterSpill) => {
            race.control.water_hit_at = Some(now);
            race.control.grip_factor = race.tuning.player.water_grip;
            false
        }
        EntityKind::Obstacle(
            ObstacleKind::Block
            | ObstacleKind::Block2
            | ObstacleKind::Block3
            | ObstacleKind::Block4
            | ObstacleKind::Block5
            | ObstacleKind::Person,
        )
        | EntityKind::Vehicle(_) => {
            hit_solid(race, now, other.pos);
            false
        }
    }
}

/// Bounce, shove and (rate limited) damage from a solid obstacle
fn hit_solid(race: &mut RaceEngine, now: f64, obstacle_pos: Vec2) {
    let tuning = &race.tuning.player;
    let control = &mut race.control;
    let player_pos = race.player.entity.pos;

    control.velocity = bounce_away(
        control.velocity,
        player_pos,
        obstacle_pos,
        tuning.bounce_factor,
        &mut control.blocked,
    );
    if control.blocked.above {
        control.velocity = drag_push(
            control.velocity,
            player_pos,
            obstacle_pos,
            Vec2::new(tuning.drag_x, tuning.drag_y),
        );
    }

    if now - control.last_damage > tuning.damage_interval {
        race.player.health -= tuning.damage;
        control.last_damage = now;
        log::debug!("Hit for {} damage, health {}", tuning.damage, race.player.health);
    }
}

/// Player handling step, run on the movement interval
fn move_player(race: &mut RaceEngine, input: &TickInput) {
    let stats = race.player.stats;
    let tuning = &race.tuning.player;
    let handling = &race.tuning.handling;
    let control = &mut race.control;

    let grip = handling.grip(&stats) * control.grip_factor;

    let boost_target = if input.a { stats.boost_strength * tuning.boost_multiplier } else { 1.0 };
    let brake_target = if input.b { stats.brake_strength * tuning.brake_multiplier } else { 1.0 };
    control.boost_factor = ease_toward(control.boost_factor, boost_target, tuning.factor_easing);
    control.brake_factor = ease_toward(control.brake_factor, brake_target, tuning.factor_easing);

    let max_speed = stats.speed * control.boost_factor;
    let push = handling.acceleration(&stats) * control.boost_factor * grip;
    let slow = handling.deceleration(&stats) * control.brake_factor * grip;

    let blocked = control.blocked;
    let v = &mut control.velocity;

    if input.left && !blocked.left {
        v.x = (v.x - push).max(-max_speed);
    } else if input.right && !blocked.right {
        v.x = (v.x + push).min(max_speed);
    } else {
        v.x = apply_friction(v.x, slow);
    }

    if input.up && !blocked.above {
        v.y = (v.y - push).max(-max_speed);
    } else if input.down && !blocked.below {
        v.y = (v.y + push).min(max_speed);
    } else {
        v.y = apply_friction(v.y, slow);
    }

    let max_pos = Vec2::new(ARENA_WIDTH - SPRITE_SIZE, ARENA_HEIGHT - SPRITE_SIZE);
    let pos = (race.player.entity.pos + control.velocity).clamp(Vec2::ZERO, max_pos);
    race.player.entity.pos = pos;
}

/// Restore full grip once the last spill hit is old enough
fn expire_water(race: &mut RaceEngine, now: f64) {
    let Some(hit_at) = race.control.water_hit_at else {
        return;
    };
    if now - hit_at > race.tuning.player.water_duration {
        race.control.water_hit_at = None;
        race.control.grip_factor = 1.0;
    }
}

fn crash(race: &mut RaceEngine, ctx: &mut RaceContext<'_>) -> RaceOutcome {
    let cost = race.tuning.player.repair_cost;
    if ctx.ledger.has_enough(cost) {
        ctx.ledger.debit(cost);
    } else {
        log::warn!("Crashed without ${cost} for repairs, nothing deducted");
    }
    RaceOutcome {
        kind: OutcomeKind::Crash,
        amount: cost,
    }
}

/// Time is up: the trolley nearer the top of the screen wins
fn settle(race: &mut RaceEngine, ctx: &mut RaceContext<'_>) -> RaceOutcome {
    let player_y = race.player.entity.screen_pos().y;
    let rival_y = race.rival.entity().screen_pos().y;
    let prize = race.track.winning_money();

    let outcome = match player_y.cmp(&rival_y) {
        Ordering::Less => RaceOutcome {
            kind: OutcomeKind::Win,
            amount: prize,
        },
        Ordering::Greater => RaceOutcome {
            kind: OutcomeKind::Lose,
            amount: 0,
        },
        Ordering::Equal => RaceOutcome {
            kind: OutcomeKind::Draw,
            amount: prize / 2,
        },
    };
    if outcome.amount > 0 {
        ctx.ledger.credit(outcome.amount);
    }
    outcome
}

fn finish(race: &mut RaceEngine, exit: RaceExit, ctx: &mut RaceContext<'_>) -> RaceExit {
    race.phase = RacePhase::Finished;
    race.exit = Some(exit);
    race.track.set_moving(false);
    ctx.display.clear();
    if let RaceExit::Finished(outcome) = exit {
        log::info!(
            "Race over after {:.1}s: {:?} (${})",
            race.track.elapsed_time(),
            outcome.kind,
            outcome.amount
        );
    }
    exit
}
