use clap::Args;
use wellspring_core::timer::BreathingExercise;

use crate::console::{print_event, runtime, CliResult, Clock};

#[derive(Args)]
pub struct BreatheArgs {
    /// Number of full breathing cycles
    #[arg(long, default_value = "3")]
    cycles: u64,
    /// Run on a virtual clock and print every event immediately
    #[arg(long)]
    simulate: bool,
}

pub fn run(args: BreatheArgs) -> CliResult {
    if args.cycles == 0 {
        return Err("cycles must be at least 1".into());
    }
    let mut exercise = BreathingExercise::new();
    if args.simulate {
        simulate(&mut exercise, args.cycles)
    } else {
        runtime()?.block_on(live(&mut exercise, args.cycles))
    }
}

fn simulate(exercise: &mut BreathingExercise, cycles: u64) -> CliResult {
    print_event(&exercise.start(0))?;
    while exercise.cycles_completed() < cycles {
        let Some(deadline) = exercise.next_deadline_ms() else {
            break;
        };
        for event in exercise.tick(deadline) {
            print_event(&event)?;
        }
    }
    finish(exercise)
}

async fn live(exercise: &mut BreathingExercise, cycles: u64) -> CliResult {
    let clock = Clock::start();
    print_event(&exercise.start(clock.now_ms()))?;
    eprintln!("{}", exercise.prompt());
    while exercise.cycles_completed() < cycles {
        clock.sleep_until(exercise.next_deadline_ms()).await;
        for event in exercise.tick(clock.now_ms()) {
            print_event(&event)?;
        }
        eprintln!("{}", exercise.prompt());
    }
    finish(exercise)
}

fn finish(exercise: &mut BreathingExercise) -> CliResult {
    if let Some(event) = exercise.stop() {
        print_event(&event)?;
    }
    Ok(())
}
