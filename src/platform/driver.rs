//! Frame loop: clock and input in, ticks out

use crate::sim::{OutcomeReporter, RaceContext, RaceEngine, RaceExit, RaceOutcome, tick};

use super::clock::Clock;
use super::input::InputSource;

/// Reporter that narrates outcomes to the log
#[derive(Debug, Default, Clone)]
pub struct LogReporter {
    pub outcomes: Vec<RaceOutcome>,
}

impl OutcomeReporter for LogReporter {
    fn report(&mut self, outcome: &RaceOutcome) {
        log::info!("{outcome}");
        self.outcomes.push(*outcome);
    }
}

/// Run `race` until it ends or `max_ticks` frames have passed.
///
/// Returns `None` only when the frame limit is hit first. A race that has
/// already ended is returned as-is without ticking or reporting again.
pub fn run_race<C, I, R>(
    race: &mut RaceEngine,
    clock: &mut C,
    input: &mut I,
    ctx: &mut RaceContext<'_>,
    reporter: &mut R,
    max_ticks: u64,
) -> Option<RaceExit>
where
    C: Clock,
    I: InputSource,
    R: OutcomeReporter,
{
    if let Some(exit) = race.exit() {
        return Some(exit);
    }
    race.announce(ctx.display);

    for _ in 0..max_ticks {
        let now = clock.now();
        let sample = input.sample(race);
        let Some(exit) = tick(race, now, &sample, ctx) else {
            continue;
        };
        if let RaceExit::Finished(outcome) = exit {
            reporter.report(&outcome);
        }
        return Some(exit);
    }

    log::warn!("Race still running after {max_ticks} frames");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VehicleModel;
    use crate::consts::FRAME_DT;
    use crate::garage::PlayerStats;
    use crate::platform::{Autopilot, FixedStepClock, ScriptedInput};
    use crate::settings::{Difficulty, Tuning};
    use crate::sim::{NullDisplay, OutcomeKind, TickInput};

    fn player(difficulty: Difficulty) -> PlayerStats {
        let mut stats = PlayerStats::new();
        stats.set_difficulty(difficulty);
        stats.buy_or_select(VehicleModel::Basic);
        stats.buy_or_select(VehicleModel::Basic);
        stats
    }

    #[test]
    fn test_full_race_reports_once() {
        let mut stats = player(Difficulty::Easy);
        let mut race = RaceEngine::from_garage(&stats, Tuning::default(), 21, 0.0).unwrap();
        let mut clock = FixedStepClock::new(FRAME_DT);
        let mut reporter = LogReporter::default();
        let mut display = NullDisplay;

        let exit = {
            let mut ctx = RaceContext::new(&mut stats, &mut display);
            run_race(&mut race, &mut clock, &mut Autopilot::default(), &mut ctx, &mut reporter, 60 * 70)
        };

        let Some(RaceExit::Finished(outcome)) = exit else {
            panic!("a 60s race ends within 70s of frames, got {exit:?}");
        };
        assert_eq!(reporter.outcomes, vec![outcome]);
        assert_eq!(race.exit(), exit);
        if outcome.kind != OutcomeKind::Crash {
            assert!(clock.current() >= 60.0);
        }
    }

    #[test]
    fn test_finished_race_is_not_rerun() {
        let mut stats = player(Difficulty::Easy);
        let mut race = RaceEngine::from_garage(&stats, Tuning::default(), 4, 0.0).unwrap();
        let mut clock = FixedStepClock::new(FRAME_DT);
        let mut reporter = LogReporter::default();
        let mut display = NullDisplay;
        let mut ctx = RaceContext::new(&mut stats, &mut display);

        let first = run_race(&mut race, &mut clock, &mut Autopilot::default(), &mut ctx, &mut reporter, 60 * 70);
        assert!(first.is_some());
        let ticks = race.ticks();

        let again = run_race(&mut race, &mut clock, &mut Autopilot::default(), &mut ctx, &mut reporter, 60 * 70);
        assert_eq!(again, first);
        assert_eq!(race.ticks(), ticks);
        assert_eq!(reporter.outcomes.len(), 1);
    }

    #[test]
    fn test_frame_limit() {
        let mut stats = player(Difficulty::Insane);
        let mut race = RaceEngine::from_garage(&stats, Tuning::default(), 3, 0.0).unwrap();
        let mut clock = FixedStepClock::new(FRAME_DT);
        let mut reporter = LogReporter::default();
        let mut display = NullDisplay;
        let mut ctx = RaceContext::new(&mut stats, &mut display);

        let exit = run_race(&mut race, &mut clock, &mut ScriptedInput::default(), &mut ctx, &mut reporter, 10);
        assert_eq!(exit, None);
        assert_eq!(race.ticks(), 10);
        assert!(reporter.outcomes.is_empty());
    }

    #[test]
    fn test_abandon_reports_nothing() {
        let mut stats = player(Difficulty::Easy);
        let money = stats.money;
        let mut race = RaceEngine::from_garage(&stats, Tuning::default(), 3, 0.0).unwrap();
        let mut clock = FixedStepClock::new(FRAME_DT);
        let mut reporter = LogReporter::default();
        let mut display = NullDisplay;
        let mut script = ScriptedInput::new(vec![
            TickInput::default(),
            TickInput {
                start: true,
                ..Default::default()
            },
            TickInput {
                select: true,
                ..Default::default()
            },
        ]);

        let exit = {
            let mut ctx = RaceContext::new(&mut stats, &mut display);
            run_race(&mut race, &mut clock, &mut script, &mut ctx, &mut reporter, 100)
        };
        assert_eq!(exit, Some(RaceExit::Abandoned));
        assert!(reporter.outcomes.is_empty());
        assert_eq!(stats.money, money);
    }
}
