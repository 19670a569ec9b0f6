//! Interactive shell.
//!
//! Reads commands from stdin while sleeping until the next timer deadline,
//! so breathing phases, the meditation countdown and the dashboard quotes
//! keep moving between keystrokes. Events go to stdout as JSON lines,
//! notifications to stderr.

use chrono::Utc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;
use wellspring_core::auth::{PasswordResetForm, SignInForm, SignUpForm};
use wellspring_core::error::Result as CoreResult;
use wellspring_core::screens::{time_ago, Panel};
use wellspring_core::timer::{format_clock, preset_label};
use wellspring_core::{App, AuthMode, Config, Event, Mood, Screen, View};

use crate::console::{build_app, print_event, runtime, CliResult, Clock};

const HELP: &str = "\
signed out:
  login [<email> <password>]            sign in (no arguments shows the form)
  signup [<name> <email> <pw> <confirm>] create an account
  forgot                                show the password reset form
  reset <email>                         send a reset link
signed in:
  go <home|mood|relax|journal|profile>  switch screens
  back                                  return to the dashboard
  logout                                sign out
  mood <mood> [note...]                 log a mood
  journal <text...>                     save a journal entry
  entries                               list journal entries
  search <query>                        search journal entries
  panel <menu|breathing|meditation>     relaxation tools panel
  breathe [reset]                       start/stop or reset breathing
  meditate [<secs>|reset]               start/pause, set length, or reset
always:
  status, help, quit";

#[derive(Debug, Clone, PartialEq)]
enum ShellCommand {
    Help,
    Status,
    Quit,
    Login(Option<(String, String)>),
    SignUp(Option<SignUpForm>),
    Forgot,
    Reset(String),
    Logout,
    Go(View),
    Back,
    LogMood(Mood, String),
    Journal(String),
    Entries,
    Search(String),
    OpenPanel(Panel),
    ToggleBreathing,
    ResetBreathing,
    ToggleMeditation,
    ConfigureMeditation(u32),
    ResetMeditation,
}

fn parse(line: &str) -> Result<Option<ShellCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();
    let rest = args.join(" ");
    let command = match (head, args.as_slice()) {
        ("help" | "?", _) => ShellCommand::Help,
        ("status", _) => ShellCommand::Status,
        ("quit" | "exit", _) => ShellCommand::Quit,
        ("login", []) => ShellCommand::Login(None),
        ("login", [email, password]) => {
            ShellCommand::Login(Some((email.to_string(), password.to_string())))
        }
        ("signup", []) => ShellCommand::SignUp(None),
        ("signup", [name, email, password, confirm]) => ShellCommand::SignUp(Some(SignUpForm {
            full_name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        })),
        ("forgot", []) => ShellCommand::Forgot,
        ("reset", [email]) => ShellCommand::Reset(email.to_string()),
        ("logout", []) => ShellCommand::Logout,
        ("go", [view]) => ShellCommand::Go(view.parse().map_err(|e| format!("{e}"))?),
        ("back", []) => ShellCommand::Back,
        ("mood", [mood, ..]) => {
            let mood: Mood = mood.parse().map_err(|e| format!("{e}"))?;
            ShellCommand::LogMood(mood, args[1..].join(" "))
        }
        ("journal", [_, ..]) => ShellCommand::Journal(rest),
        ("entries", []) => ShellCommand::Entries,
        ("search", [_, ..]) => ShellCommand::Search(rest),
        ("panel", [panel]) => ShellCommand::OpenPanel(parse_panel(panel)?),
        ("breathe", []) => ShellCommand::ToggleBreathing,
        ("breathe", ["reset"]) => ShellCommand::ResetBreathing,
        ("meditate", []) => ShellCommand::ToggleMeditation,
        ("meditate", ["reset"]) => ShellCommand::ResetMeditation,
        ("meditate", [secs]) => ShellCommand::ConfigureMeditation(
            secs.parse()
                .map_err(|_| format!("invalid duration '{secs}'"))?,
        ),
        _ => return Err(format!("unrecognised command '{line}' (try 'help')")),
    };
    Ok(Some(command))
}

fn parse_panel(name: &str) -> Result<Panel, String> {
    match name {
        "menu" => Ok(Panel::Menu),
        "breathing" => Ok(Panel::Breathing),
        "meditation" => Ok(Panel::Meditation),
        other => Err(format!("unknown panel '{other}'")),
    }
}

pub fn run() -> CliResult {
    let config = Config::load()?;
    let app = build_app(&config)?;
    runtime()?.block_on(session(app))
}

async fn session(mut app: App) -> CliResult {
    let clock = Clock::start();
    settle(app.restore().await);
    render(&app);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let deadline = app.next_deadline_ms();
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse(&line) {
                    Ok(None) => {}
                    Ok(Some(ShellCommand::Quit)) => break,
                    Ok(Some(command)) => execute(&mut app, command, clock.now_ms()).await?,
                    Err(message) => eprintln!("{message}"),
                }
                emit(&app.tick(clock.now_ms()))?;
            }
            _ = clock.sleep_until(deadline) => {
                emit(&app.tick(clock.now_ms()))?;
            }
        }
    }
    Ok(())
}

async fn execute(app: &mut App, command: ShellCommand, now_ms: u64) -> CliResult {
    match command {
        ShellCommand::Help => println!("{HELP}"),
        ShellCommand::Status | ShellCommand::Quit => render(app),
        ShellCommand::Login(None) => {
            app.gate_mut().show_login();
            render(app);
        }
        ShellCommand::Login(Some((email, password))) => {
            if let Some(event) = settle(app.sign_in(&SignInForm::new(email, password)).await) {
                print_event(&event)?;
                render(app);
            }
        }
        ShellCommand::SignUp(None) => {
            app.gate_mut().show_sign_up();
            render(app);
        }
        ShellCommand::SignUp(Some(form)) => {
            settle(app.sign_up(&form).await);
            render(app);
        }
        ShellCommand::Forgot => {
            app.gate_mut().show_forgot_password();
            render(app);
        }
        ShellCommand::Reset(email) => {
            settle(app.request_password_reset(&PasswordResetForm::new(email)).await);
            render(app);
        }
        ShellCommand::Logout => {
            if let Some(event) = settle(app.sign_out().await) {
                print_event(&event)?;
                render(app);
            }
        }
        ShellCommand::Go(view) => {
            let result = app.navigate(view, now_ms);
            navigate(app, result)?;
        }
        ShellCommand::Back => {
            let result = app.back(now_ms);
            navigate(app, result)?;
        }
        ShellCommand::LogMood(mood, note) => {
            if let Some(form) = settle(app.mood_mut()) {
                form.select(mood);
                form.set_note(note);
                if let Some(event) = settle(app.log_mood(Utc::now())) {
                    print_event(&event)?;
                }
            }
        }
        ShellCommand::Journal(text) => {
            if let Some(journal) = settle(app.journal_mut()) {
                journal.set_draft(text);
                if let Some(event) = settle(app.save_journal_entry(Utc::now())) {
                    print_event(&event)?;
                }
            }
        }
        ShellCommand::Entries => list_entries(app, ""),
        ShellCommand::Search(query) => list_entries(app, &query),
        ShellCommand::OpenPanel(panel) => {
            if settle(app.open_panel(panel)).is_some() {
                render(app);
            }
        }
        ShellCommand::ToggleBreathing => emit_one(settle(app.toggle_breathing(now_ms)))?,
        ShellCommand::ResetBreathing => emit_one(settle(app.reset_breathing()))?,
        ShellCommand::ToggleMeditation => {
            emit(&settle(app.toggle_meditation(now_ms)).unwrap_or_default())?
        }
        ShellCommand::ConfigureMeditation(secs) => {
            if let Some(event) = settle(app.configure_meditation(secs)) {
                print_event(&event)?;
                render(app);
            }
        }
        ShellCommand::ResetMeditation => emit_one(settle(app.reset_meditation()))?,
    }
    Ok(())
}

fn navigate(app: &App, result: CoreResult<Vec<Event>>) -> CliResult {
    if let Some(events) = settle(result) {
        emit(&events)?;
        render(app);
    }
    Ok(())
}

/// Failed actions were already reported through the notifier.
fn settle<T>(result: CoreResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!(kind = ?e.kind(), error = %e, "shell action failed");
            None
        }
    }
}

fn emit(events: &[Event]) -> CliResult {
    for event in events {
        print_event(event)?;
    }
    Ok(())
}

fn emit_one(event: Option<Event>) -> CliResult {
    match event {
        Some(event) => print_event(&event),
        None => Ok(()),
    }
}

fn list_entries(app: &App, query: &str) {
    let now = Utc::now();
    let entries = app.journal().search(query);
    if entries.is_empty() {
        println!("(no entries)");
    }
    for entry in entries {
        println!("[{}] {}", time_ago(entry.created_at, now), entry.content);
    }
}

fn render(app: &App) {
    match app.screen() {
        Screen::Loading => println!("Loading..."),
        Screen::SignedOut(mode) => {
            println!("== {} ==", mode.title());
            println!("{}", mode.subtitle());
            if let AuthMode::ResetLinkSent { email } = &mode {
                println!("Reset link sent to {email}");
            }
        }
        Screen::Active(view) => {
            println!("== {} ==", view.title());
            match view {
                View::Dashboard | View::Profile => render_dashboard(app),
                View::Mood => {
                    let moods: Vec<String> = Mood::ALL.iter().map(|m| m.to_string()).collect();
                    println!("{}", moods.join("  "));
                }
                View::Relax => render_relax(app),
                View::Journal => println!("{} entries", app.journal().entries().len()),
            }
            let nav: Vec<String> = View::ALL
                .iter()
                .map(|v| {
                    if app.router().is_active(*v) {
                        format!("[{}]", v.nav_label())
                    } else {
                        v.nav_label().to_string()
                    }
                })
                .collect();
            println!("{}", nav.join(" | "));
        }
    }
}

fn render_dashboard(app: &App) {
    if let Some(user) = app.user() {
        println!("Welcome, {}", user.display_name());
    }
    let quote = app.dashboard().quote();
    println!("\"{}\" -- {}", quote.text, quote.author);
    for action in app.dashboard().quick_actions() {
        println!("  {:<16} {}", action.title, action.description);
    }
}

fn render_relax(app: &App) {
    let relax = app.relax();
    match relax.panel() {
        Panel::Menu => println!("Choose: panel breathing | panel meditation"),
        Panel::Breathing => println!("{}", relax.breathing().prompt()),
        Panel::Meditation => {
            let meditation = relax.meditation();
            let presets: Vec<String> = app
                .meditation_presets()
                .iter()
                .map(|s| preset_label(*s))
                .collect();
            println!(
                "{} {}  (presets: {})",
                format_clock(meditation.remaining_secs()),
                meditation.status_text(),
                presets.join(", ")
            );
        }
    }
}
