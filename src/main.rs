use serde::Deserialize;
use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use writer_stats::render::{self, month_svg, render_text, week_svg};
use writer_stats::{Config, Effect, JsonFileStorage, SystemClock, Tracker, Transaction};

type AppTracker = Tracker<JsonFileStorage, SystemClock>;

// How often the watch loop wakes up to run due effects (roughly 60 FPS)
const TICK: Duration = Duration::from_millis(16);

const USAGE: &str = "\
usage: writer-stats [command]

  --stats                 show the dashboard (default)
  --text                  print the dashboard as plain text
  --status                print the status line
  --svg week|month        print a chart as SVG
  --settings              print the current settings
  --set <field> <value>   change a setting (dailyGoal, countPastes,
                          includeFolders, excludeFolders)
  --watch                 count edit events read as JSON lines from stdin";

/// One line of `--watch` input: the active document plus its transaction.
#[derive(Debug, Deserialize)]
struct HostEvent {
    #[serde(default)]
    path: Option<String>,
    #[serde(flatten)]
    transaction: Transaction,
}

fn open_tracker(config: &Config) -> writer_stats::Result<AppTracker> {
    let storage = JsonFileStorage::new(config.data_path());
    Tracker::new(storage, SystemClock, config.debounce_periods())
}

fn print_settings(tracker: &AppTracker) {
    let s = tracker.settings();
    println!("dailyGoal      = {}", s.daily_goal);
    println!("countPastes    = {}", s.count_pastes);
    println!("includeFolders = {:?}", s.include_folders);
    println!("excludeFolders = {:?}", s.exclude_folders);
}

/// Feeds stdin events to the tracker until EOF, then does the final save.
fn watch(mut tracker: AppTracker) -> writer_stats::Result<()> {
    // Stdin blocks, so read it on its own thread and poll the channel
    let (tx, rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("failed to read stdin: {}", e);
                    break;
                }
            }
        }
    });

    println!("{}", tracker.summary().status_line());

    loop {
        match rx.recv_timeout(TICK) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<HostEvent>(&line) {
                    Ok(event) => {
                        tracker.record(event.path.as_deref(), &event.transaction);
                    }
                    Err(e) => log::warn!("skipping malformed event: {}", e),
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }

        // A failed save stays pending in the tracker; keep counting and
        // let the next tick or the final save retry it
        let effects = match tracker.tick() {
            Ok(effects) => effects,
            Err(e) => {
                log::error!("failed to save stats: {}", e);
                continue;
            }
        };
        for effect in effects {
            match effect {
                Effect::StatusRefresh => println!("{}", tracker.summary().status_line()),
                Effect::DashboardRefresh => log::debug!("dashboard refresh due"),
                Effect::Persist => log::debug!("stats saved"),
            }
        }
    }

    let summary = tracker.summary();
    tracker.shutdown()?;
    println!("{}", summary.status_line());
    Ok(())
}

fn run(args: &[String]) -> writer_stats::Result<bool> {
    let config = Config::load();
    let command = args.get(1).map(String::as_str).unwrap_or("--stats");

    match command {
        "--stats" => {
            let tracker = open_tracker(&config)?;
            render::show_dashboard(&tracker.dashboard())?;
        }
        "--text" => {
            let tracker = open_tracker(&config)?;
            print!("{}", render_text(&tracker.dashboard()));
        }
        "--status" => {
            let tracker = open_tracker(&config)?;
            println!("{}", tracker.summary().status_line());
        }
        "--svg" => {
            let tracker = open_tracker(&config)?;
            let dash = tracker.dashboard();
            match args.get(2).map(String::as_str) {
                Some("week") => println!("{}", week_svg(&dash.week)),
                Some("month") => println!("{}", month_svg(&dash.month)),
                _ => return Ok(false),
            }
        }
        "--settings" => {
            let tracker = open_tracker(&config)?;
            print_settings(&tracker);
        }
        "--set" => {
            let (Some(name), Some(value)) = (args.get(2), args.get(3)) else {
                return Ok(false);
            };
            let mut tracker = open_tracker(&config)?;
            tracker.update_setting(name, value)?;
            print_settings(&tracker);
        }
        "--watch" => {
            watch(open_tracker(&config)?)?;
        }
        _ => return Ok(false),
    }

    Ok(true)
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("{}", USAGE);
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("writer-stats: {}", e);
            ExitCode::FAILURE
        }
    }
}
