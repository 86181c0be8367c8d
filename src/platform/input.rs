//! Button sources for the race loop

use crate::consts::{ARENA_WIDTH, SPRITE_SIZE};
use crate::sim::entity::{EntityKind, ObstacleKind};
use crate::sim::{RaceEngine, TickInput};

/// Produces one debounced button sample per tick
pub trait InputSource {
    fn sample(&mut self, race: &RaceEngine) -> TickInput;
}

/// Replays a fixed list of samples, then releases every button
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: Vec<TickInput>,
    cursor: usize,
}

impl ScriptedInput {
    pub fn new(frames: Vec<TickInput>) -> Self {
        Self { frames, cursor: 0 }
    }

    pub fn is_finished(&self) -> bool {
        self.cursor >= self.frames.len()
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self, _race: &RaceEngine) -> TickInput {
        let input = self.frames.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
        input
    }
}

/// Headless driver: dodges what is coming, chases the rival otherwise
#[derive(Debug, Clone, Copy)]
pub struct Autopilot {
    /// How far above the player an obstacle counts as a threat
    pub lookahead: f32,
    /// Extra width on each side of the player's lane
    pub lane_margin: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            lookahead: 40.0,
            lane_margin: 4.0,
        }
    }
}

impl InputSource for Autopilot {
    fn sample(&mut self, race: &RaceEngine) -> TickInput {
        let mut input = TickInput::default();
        let player = race.player().entity.pos;
        let lane = (player.x - self.lane_margin, player.x + SPRITE_SIZE + self.lane_margin);

        // Closest solid thing in our lane, above us
        let threat = race
            .obstacles()
            .iter()
            .filter(|o| !matches!(o.kind, EntityKind::Obstacle(ObstacleKind::Money)))
            .filter(|o| o.pos.x + SPRITE_SIZE > lane.0 && o.pos.x < lane.1)
            .filter(|o| o.pos.y < player.y && player.y - o.pos.y < self.lookahead)
            .max_by(|a, b| a.pos.y.partial_cmp(&b.pos.y).unwrap_or(std::cmp::Ordering::Equal));

        if let Some(obstacle) = threat {
            let dodge_left = obstacle.pos.x > player.x;
            // Sidestep, unless the wall is in the way
            if dodge_left && player.x > SPRITE_SIZE {
                input.left = true;
            } else if player.x + 2.0 * SPRITE_SIZE < ARENA_WIDTH {
                input.right = true;
            } else {
                input.left = true;
            }
            input.b = player.y - obstacle.pos.y < SPRITE_SIZE + 4.0;
            return input;
        }

        let rival = race.rival().entity().pos;
        if player.y >= rival.y {
            input.up = true;
            input.a = true;
        }
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VehicleModel;
    use crate::settings::{Difficulty, Tuning};
    use crate::sim::entity::PLAYER_ID;
    use crate::sim::vehicle::Vehicle;
    use glam::Vec2;

    fn race() -> RaceEngine {
        let trolley = Vehicle::new(VehicleModel::Basic, PLAYER_ID, Vec2::ZERO);
        RaceEngine::new(Difficulty::Easy, &trolley, Tuning::default(), 1, 0.0)
    }

    #[test]
    fn test_script_replays_then_releases() {
        let race = race();
        let up = TickInput {
            up: true,
            ..Default::default()
        };
        let mut script = ScriptedInput::new(vec![up, TickInput::default()]);
        assert_eq!(script.sample(&race), up);
        assert!(!script.is_finished());
        assert_eq!(script.sample(&race), TickInput::default());
        assert!(script.is_finished());
        assert_eq!(script.sample(&race), TickInput::default());
    }

    #[test]
    fn test_autopilot_chases_rival() {
        let race = race();
        let input = Autopilot::default().sample(&race);
        assert!(input.up && input.a);
        assert!(!input.left && !input.right);
    }

    #[test]
    fn test_autopilot_dodges_block_ahead() {
        let mut race = race();
        race.track_mut().insert(ObstacleKind::Block, Vec2::new(75.0, 70.0));
        let input = Autopilot::default().sample(&race);
        assert!(input.left);
        assert!(!input.up);

        // Money is not a threat
        let mut race = self::race();
        race.track_mut().insert(ObstacleKind::Money, Vec2::new(75.0, 70.0));
        let input = Autopilot::default().sample(&race);
        assert!(input.up);
    }
}
