use clap::Args;
use wellspring_core::notify::{Notification, Notifier};
use wellspring_core::timer::{format_clock, MeditationTimer};
use wellspring_core::{Config, Event};

use crate::console::{print_event, runtime, CliResult, Clock, ConsoleNotifier};

#[derive(Args)]
pub struct MeditateArgs {
    /// Length in seconds (defaults to meditation.default_duration_secs)
    #[arg(long)]
    secs: Option<u32>,
    /// Run on a virtual clock and print every event immediately
    #[arg(long)]
    simulate: bool,
}

pub fn run(args: MeditateArgs) -> CliResult {
    let total = match args.secs {
        Some(secs) => secs,
        None => Config::load()?.meditation.default_duration_secs,
    };
    let mut timer = MeditationTimer::new(total)?;
    if args.simulate {
        simulate(&mut timer)
    } else {
        runtime()?.block_on(live(&mut timer))
    }
}

fn simulate(timer: &mut MeditationTimer) -> CliResult {
    if let Some(event) = timer.start(0) {
        print_event(&event)?;
    }
    while timer.is_running() {
        let Some(deadline) = timer.next_deadline_ms() else {
            break;
        };
        report(&timer.tick(deadline))?;
    }
    Ok(())
}

async fn live(timer: &mut MeditationTimer) -> CliResult {
    let clock = Clock::start();
    if let Some(event) = timer.start(clock.now_ms()) {
        print_event(&event)?;
    }
    eprintln!("{}", format_clock(timer.remaining_secs()));
    while timer.is_running() {
        clock.sleep_until(timer.next_deadline_ms()).await;
        report(&timer.tick(clock.now_ms()))?;
        if timer.is_running() {
            eprintln!("{}", format_clock(timer.remaining_secs()));
        }
    }
    Ok(())
}

fn report(events: &[Event]) -> CliResult {
    for event in events {
        print_event(event)?;
        if let Event::MeditationCompleted { .. } = event {
            ConsoleNotifier.notify(Notification::info(
                "Meditation Complete! 🧘‍♀️",
                "Great job taking time for yourself. How do you feel?",
            ));
        }
    }
    Ok(())
}
