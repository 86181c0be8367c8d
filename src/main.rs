//! Trolley Dash headless runner
//!
//! Runs one race with the autopilot against a fixed-step clock and prints
//! the outcome plus obstacle churn. `performance_test` doubles as the stress
//! harness.

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::PathBuf;

    use clap::Parser;

    use trolley_dash::catalog::VehicleModel;
    use trolley_dash::consts::FRAME_DT;
    use trolley_dash::platform::{Autopilot, FixedStepClock, LogReporter, run_race};
    use trolley_dash::sim::{NullDisplay, RaceContext, RaceEngine, RaceExit};
    use trolley_dash::{Difficulty, PlayerStats, Result, Tuning};

    #[derive(Parser, Debug)]
    #[command(name = "trolley-dash")]
    #[command(about = "Run one headless trolley race with the autopilot")]
    struct Args {
        /// easy, medium, difficult, insane or performance_test
        #[arg(default_value = "easy")]
        difficulty: String,
        /// RNG seed for the race
        #[arg(default_value_t = 1)]
        seed: u64,
        /// JSON file overriding tuning constants
        tuning: Option<PathBuf>,
        /// Trolley to race with (catalog key)
        #[arg(long, default_value = "trolley_basic")]
        vehicle: String,
    }

    pub fn run() -> Result<()> {
        let args = Args::parse();
        let difficulty = Difficulty::from_key(&args.difficulty)?;
        let model = VehicleModel::from_key(&args.vehicle)?;
        let tuning = match &args.tuning {
            Some(path) => Tuning::load(path)?,
            None => Tuning::default(),
        };

        // Enough money to hand over any trolley for the run
        let mut stats = PlayerStats::new();
        stats.set_difficulty(difficulty);
        stats.money = stats.money.max(model.archetype().cost);
        stats.buy_or_select(model);
        stats.select(model)?;

        let mut race = RaceEngine::from_garage(&stats, tuning, args.seed, 0.0)?;
        let mut clock = FixedStepClock::new(FRAME_DT);
        let mut reporter = LogReporter::default();
        let mut display = NullDisplay;
        let max_ticks = ((difficulty.race_duration() + 1.0) / FRAME_DT).ceil() as u64;

        let exit = {
            let mut ctx = RaceContext::new(&mut stats, &mut display);
            run_race(&mut race, &mut clock, &mut Autopilot::default(), &mut ctx, &mut reporter, max_ticks)
        };

        match exit {
            Some(RaceExit::Finished(outcome)) => println!("{outcome}"),
            Some(RaceExit::Abandoned) => println!("Race abandoned"),
            None => println!("Race did not finish"),
        }

        let track = race.track().stats();
        println!(
            "{} on {} (seed {}): {} ticks, {:.1}s raced, health {}/{}",
            race.player().model.archetype().name,
            race.difficulty().title(),
            race.seed(),
            race.ticks(),
            race.elapsed_time(),
            race.player().health,
            race.player().stats.max_health
        );
        println!(
            "obstacles: {} spawned, {} evicted, {} spawns deferred",
            track.spawned, track.evicted, track.deferred
        );
        println!("money picked up: ${}, balance: ${}", race.money_collected(), stats.money);
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    if let Err(e) = headless::run() {
        log::error!("{e}");
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The race core is embedded by the handheld runtime; there is no wasm binary
}
