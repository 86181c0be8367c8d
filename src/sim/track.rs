//! Track generator: obstacle spawning, scrolling, eviction and race clock
//!
//! The obstacle set and the eviction buffer are preallocated to the
//! difficulty's cap, so a race never reallocates them. Spawning is a bounded
//! retry: if no free spot is found within `spawn_attempts` tries, the spawn is
//! deferred to a later tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::{Aabb, Entity, EntityId, EntityKind, FIRST_OBSTACLE_ID, ObstacleKind};
use crate::consts::{ARENA_WIDTH, EVICTION_Y, SPRITE_SIZE};
use crate::settings::{Difficulty, TrackTuning};

/// Obstacle churn counters (for the stress harness)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackStats {
    pub spawned: u64,
    pub evicted: u64,
    /// Ticks where every placement attempt overlapped
    pub deferred: u64,
}

#[derive(Debug, Clone)]
pub struct TrackGenerator {
    tuning: TrackTuning,
    obstacles: Vec<Entity>,
    /// Reused by `cleanup_obstacles`
    evicted: Vec<Entity>,
    max_obstacles: usize,
    race_duration: f64,
    winning_money: u64,
    moving: bool,
    /// Pause-adjusted time of the last clock update
    start_time: Option<f64>,
    elapsed_time: f64,
    next_id: u32,
    stats: TrackStats,
}

impl TrackGenerator {
    pub fn new(difficulty: Difficulty, tuning: TrackTuning) -> Self {
        let mut track = Self {
            tuning,
            obstacles: Vec::new(),
            evicted: Vec::new(),
            max_obstacles: 0,
            race_duration: 0.0,
            winning_money: 0,
            moving: true,
            start_time: None,
            elapsed_time: 0.0,
            next_id: FIRST_OBSTACLE_ID,
            stats: TrackStats::default(),
        };
        track.configure(difficulty);
        track
    }

    /// Apply a difficulty's parameters and empty the obstacle set
    pub fn configure(&mut self, difficulty: Difficulty) {
        self.max_obstacles = difficulty.max_obstacles();
        self.race_duration = difficulty.race_duration();
        self.winning_money = difficulty.winning_money();
        self.obstacles = Vec::with_capacity(self.max_obstacles);
        self.evicted = Vec::with_capacity(self.max_obstacles);
    }

    /// Anchor the race clock at `now`
    pub fn start_clock(&mut self, now: f64) {
        self.start_time = Some(now);
    }

    /// Advance one tick: accrue time, maybe spawn one obstacle, scroll all.
    ///
    /// `total_pause` is the cumulative time spent paused so far; it is
    /// subtracted from `now` so paused time never counts toward the race.
    /// Returns the obstacle spawned this tick, if any.
    pub fn update<R: Rng>(&mut self, now: f64, total_pause: f64, rng: &mut R) -> Option<Entity> {
        if !self.moving {
            self.start_time = None;
            return None;
        }

        let current = now - total_pause;
        let start = self.start_time.unwrap_or(current);
        self.elapsed_time += (current - start).max(0.0);
        self.start_time = Some(current);

        let spawned = if self.obstacles.len() < self.max_obstacles {
            self.try_spawn(rng)
        } else {
            None
        };

        // Scroll regardless of the spawn outcome
        let step = Vec2::new(0.0, self.tuning.scroll_step);
        for obstacle in &mut self.obstacles {
            obstacle.translate(step);
        }

        spawned.and_then(|id| self.obstacles.iter().find(|o| o.id == id).copied())
    }

    /// Try to place one obstacle; returns its id on success
    fn try_spawn<R: Rng>(&mut self, rng: &mut R) -> Option<EntityId> {
        let max_x = (ARENA_WIDTH - SPRITE_SIZE) as i32;
        let total_weight = ObstacleKind::total_weight();

        for _ in 0..self.tuning.spawn_attempts {
            let x = rng.random_range(0..=max_x);
            let y = rng.random_range(self.tuning.spawn_y_min..=self.tuning.spawn_y_max);
            let kind = ObstacleKind::from_weighted_roll(rng.random_range(0.0..total_weight));

            let pos = Vec2::new(x as f32, y as f32);
            if self.overlaps_existing(&Aabb::sprite(pos)) {
                continue;
            }

            let id = EntityId(self.next_id);
            self.next_id += 1;
            self.obstacles.push(Entity::new(id, EntityKind::Obstacle(kind), pos));
            self.stats.spawned += 1;
            return Some(id);
        }

        log::debug!(
            "No free spot after {} attempts, deferring spawn",
            self.tuning.spawn_attempts
        );
        self.stats.deferred += 1;
        None
    }

    /// Whether `candidate` intersects any live obstacle
    pub fn overlaps_existing(&self, candidate: &Aabb) -> bool {
        self.obstacles.iter().any(|o| o.aabb().intersects(candidate))
    }

    /// Remove every obstacle that has scrolled past the eviction line and
    /// return them.
    ///
    /// Two-phase: candidates are collected into the reused buffer first, then
    /// removed in one pass. The slice is valid until the next call.
    pub fn cleanup_obstacles(&mut self) -> &[Entity] {
        self.evicted.clear();
        self.evicted
            .extend(self.obstacles.iter().filter(|o| o.pos.y > EVICTION_Y).copied());
        if !self.evicted.is_empty() {
            self.obstacles.retain(|o| o.pos.y <= EVICTION_Y);
            self.stats.evicted += self.evicted.len() as u64;
        }
        &self.evicted
    }

    /// Remove a single obstacle (e.g. a collected money pickup)
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.obstacles.iter().position(|o| o.id == id)?;
        Some(self.obstacles.remove(index))
    }

    /// Stop or resume the track; stopping freezes the clock but keeps obstacles
    pub fn set_moving(&mut self, moving: bool) {
        self.moving = moving;
        if !moving {
            self.start_time = None;
        }
    }

    /// Place an obstacle directly (scenario setup in tests and tools)
    pub fn insert(&mut self, kind: ObstacleKind, pos: Vec2) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.obstacles.push(Entity::new(id, EntityKind::Obstacle(kind), pos));
        id
    }

    pub fn obstacles(&self) -> &[Entity] {
        &self.obstacles
    }

    pub fn max_obstacles(&self) -> usize {
        self.max_obstacles
    }

    pub fn race_duration(&self) -> f64 {
        self.race_duration
    }

    pub fn winning_money(&self) -> u64 {
        self.winning_money
    }

    pub fn elapsed_time(&self) -> f64 {
        self.elapsed_time
    }

    pub fn stats(&self) -> TrackStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn no_pairwise_overlap(obstacles: &[Entity]) -> bool {
        obstacles.iter().enumerate().all(|(i, a)| {
            obstacles[i + 1..]
                .iter()
                .all(|b| !a.aabb().intersects(&b.aabb()))
        })
    }

    #[test]
    fn test_configure_resets() {
        let mut track = TrackGenerator::new(Difficulty::Easy, TrackTuning::default());
        track.insert(ObstacleKind::Block, Vec2::ZERO);
        track.configure(Difficulty::Insane);
        assert!(track.obstacles().is_empty());
        assert_eq!(track.max_obstacles(), 18);
        assert_eq!(track.race_duration(), 300.0);
        assert_eq!(track.winning_money(), 20_000);
    }

    #[test]
    fn test_spawn_then_scroll() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut track = TrackGenerator::new(Difficulty::Easy, TrackTuning::default());
        track.start_clock(0.0);
        let spawned = track.update(0.0, 0.0, &mut rng).expect("empty track always has room");
        assert_eq!(track.obstacles().len(), 1);
        // The fresh obstacle already scrolled one step this tick
        assert_eq!(spawned.pos, track.obstacles()[0].pos);
        assert!(spawned.pos.x >= 0.0 && spawned.pos.x <= 144.0);
        assert!(spawned.pos.y >= -255.0 && spawned.pos.y <= 1.0);
    }

    #[test]
    fn test_capacity_is_respected() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut track = TrackGenerator::new(Difficulty::Easy, TrackTuning::default());
        for tick in 0..500 {
            track.update(tick as f64 / 60.0, 0.0, &mut rng);
            assert!(track.obstacles().len() <= 5);
        }
    }

    #[test]
    fn test_spawn_deferred_when_no_room() {
        let mut rng = Pcg32::seed_from_u64(3);
        let tuning = TrackTuning {
            spawn_y_min: 0,
            spawn_y_max: 0,
            ..TrackTuning::default()
        };
        let mut track = TrackGenerator::new(Difficulty::Insane, tuning);
        // Wall off the whole spawn row
        let mut x = -8.0;
        while x < ARENA_WIDTH {
            track.insert(ObstacleKind::Block, Vec2::new(x, -1.0));
            x += SPRITE_SIZE;
        }
        let before = track.obstacles().len();
        let spawned = track.update(0.0, 0.0, &mut rng);
        assert!(spawned.is_none());
        assert_eq!(track.obstacles().len(), before);
        assert_eq!(track.stats().deferred, 1);
    }

    #[test]
    fn test_cleanup_evicts_past_line_once() {
        let mut track = TrackGenerator::new(Difficulty::Medium, TrackTuning::default());
        let gone = track.insert(ObstacleKind::Money, Vec2::new(10.0, 144.5));
        let stays = track.insert(ObstacleKind::Block, Vec2::new(40.0, 144.0));
        let evicted = track.cleanup_obstacles();
        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].id, gone);
        assert_eq!(track.obstacles().len(), 1);
        assert_eq!(track.obstacles()[0].id, stays);
        assert!(track.cleanup_obstacles().is_empty());
        assert_eq!(track.stats().evicted, 1);
    }

    #[test]
    fn test_cleanup_reuses_buffer() {
        let mut track = TrackGenerator::new(Difficulty::Easy, TrackTuning::default());
        let capacity = track.evicted.capacity();
        assert!(capacity >= 5);
        for round in 0..3 {
            let x = 10.0 + 20.0 * round as f32;
            track.insert(ObstacleKind::Block, Vec2::new(x, 150.0));
            track.insert(ObstacleKind::Block, Vec2::new(x, 160.0));
            assert_eq!(track.cleanup_obstacles().len(), 2);
            assert_eq!(track.evicted.capacity(), capacity);
        }
        assert!(track.cleanup_obstacles().is_empty());
        assert_eq!(track.stats().evicted, 6);
    }

    #[test]
    fn test_elapsed_excludes_pause() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut track = TrackGenerator::new(Difficulty::Easy, TrackTuning::default());
        track.start_clock(0.0);
        track.update(1.0, 0.0, &mut rng);
        assert!((track.elapsed_time() - 1.0).abs() < 1e-9);
        // Paused from t=1 to t=4; the caller stops updating and then reports 3s of pause
        track.update(5.0, 3.0, &mut rng);
        assert!((track.elapsed_time() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_stopped_track_freezes() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut track = TrackGenerator::new(Difficulty::Easy, TrackTuning::default());
        track.start_clock(0.0);
        track.update(1.0, 0.0, &mut rng);
        let count = track.obstacles().len();
        let pos = track.obstacles()[0].pos;
        track.set_moving(false);
        track.update(2.0, 0.0, &mut rng);
        assert_eq!(track.obstacles().len(), count);
        assert_eq!(track.obstacles()[0].pos, pos);
        assert!((track.elapsed_time() - 1.0).abs() < 1e-9);
        // Resuming starts counting from the resume tick
        track.set_moving(true);
        track.update(2.5, 0.0, &mut rng);
        assert!((track.elapsed_time() - 1.0).abs() < 1e-9);
        track.update(3.0, 0.0, &mut rng);
        assert!((track.elapsed_time() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_remove_by_id() {
        let mut track = TrackGenerator::new(Difficulty::Easy, TrackTuning::default());
        let id = track.insert(ObstacleKind::Money, Vec2::new(10.0, 10.0));
        assert_eq!(track.remove(id).map(|o| o.id), Some(id));
        assert!(track.remove(id).is_none());
    }

    proptest! {
        #[test]
        fn prop_live_obstacles_never_overlap(seed in any::<u64>(), ticks in 1usize..400) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut track = TrackGenerator::new(Difficulty::PerformanceTest, TrackTuning::default());
            for tick in 0..ticks {
                track.update(tick as f64 / 60.0, 0.0, &mut rng);
                track.cleanup_obstacles();
                prop_assert!(track.obstacles().len() <= track.max_obstacles());
                prop_assert!(no_pairwise_overlap(track.obstacles()));
            }
        }

        #[test]
        fn prop_evicted_obstacles_never_return(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut track = TrackGenerator::new(Difficulty::Insane, TrackTuning::default());
            let mut evicted = Vec::new();
            for tick in 0..600 {
                track.update(tick as f64 / 60.0, 0.0, &mut rng);
                evicted.extend(track.cleanup_obstacles().iter().map(|o| o.id));
                for live in track.obstacles() {
                    prop_assert!(live.pos.y <= EVICTION_Y + 1.0);
                    prop_assert!(!evicted.contains(&live.id));
                }
            }
        }
    }
}
