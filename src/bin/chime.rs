use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use jiff::civil::DateTime;
use jiff::Zoned;

use chime::{notify, parse_hhmm, Alarm, AlarmError, AlarmStore, Repeat, Snooze, WeekdaySet};

#[derive(Parser)]
#[command(name = "chime", about = "Alarm scheduling core", version)]
struct Cli {
    /// Path to the alarm store file
    #[arg(long, global = true, default_value = "alarms.json")]
    store: PathBuf,

    /// Evaluation time override (civil datetime, e.g. 2023-05-01T12:00:00).
    /// Defaults to the current local time.
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add an alarm to the store
    Add {
        #[arg(long)]
        label: String,

        /// Trigger time, HH:MM
        #[arg(long)]
        time: String,

        /// Repeat rule: once, daily, weekly, monthly or yearly
        #[arg(long, default_value = "once")]
        repeat: String,

        /// Weekday list for weekly alarms (e.g. mon,wed,fri)
        #[arg(long)]
        days: Option<String>,

        /// Calendar date for one-shot alarms (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// Sound to play when ringing
        #[arg(long)]
        sound: Option<String>,

        /// Vibrate when ringing
        #[arg(long)]
        vibration: bool,

        /// Snooze duration in minutes (enables snooze)
        #[arg(long)]
        snooze: Option<u16>,
    },

    /// List alarms with their next fire time
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show upcoming triggers, earliest first (one per enabled alarm)
    Next {
        /// Number of triggers to show
        #[arg(short, long, default_value = "1")]
        n: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Enable or disable an alarm
    Toggle {
        id: String,

        /// Disable instead of enable
        #[arg(long)]
        off: bool,
    },

    /// Remove an alarm
    Rm { id: String },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{}", e.display_rich());
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AlarmError> {
    let now = match &cli.now {
        Some(raw) => raw
            .parse::<DateTime>()
            .map_err(|e| AlarmError::validation("now", format!("'{raw}': {e}")))?,
        None => Zoned::now().datetime(),
    };
    let mut store = AlarmStore::load(&cli.store)?;

    match cli.command {
        Command::Add {
            label,
            time,
            repeat,
            days,
            date,
            sound,
            vibration,
            snooze,
        } => {
            let repeat: Repeat = repeat.parse()?;
            let mut alarm = Alarm::new(label, parse_hhmm(&time)?, repeat);
            if let Some(raw) = days {
                alarm.days = WeekdaySet::parse_list(&raw)?;
            }
            if let Some(raw) = date {
                let date = raw
                    .parse()
                    .map_err(|e| AlarmError::validation("date", format!("'{raw}': {e}")))?;
                alarm.date = Some(date);
            }
            alarm.sound = sound;
            alarm.vibration = vibration;
            if let Some(minutes) = snooze {
                alarm.snooze = Snooze {
                    enabled: true,
                    minutes,
                };
            }
            let added = store.add(alarm, now)?;
            println!("added [{}] {added}", added.id);
            store.save(&cli.store)
        }

        Command::List { json } => {
            if json {
                let mut entries = Vec::new();
                for a in store.all() {
                    let next = a.next_trigger(now)?;
                    entries.push(serde_json::json!({
                        "id": a.id,
                        "label": a.label,
                        "summary": a.to_string(),
                        "enabled": a.enabled,
                        "next": next.map(|dt| dt.to_string()),
                    }));
                }
                println!(
                    "{}",
                    serde_json::to_string_pretty(&entries)
                        .map_err(|e| AlarmError::store(format!("{e}")))?
                );
            } else {
                for alarm in store.all() {
                    match alarm.next_trigger(now)? {
                        Some(next) => println!("[{}] {alarm} -> {next}", alarm.id),
                        None => println!("[{}] {alarm}", alarm.id),
                    }
                }
            }
            Ok(())
        }

        Command::Next { n, json } => {
            let triggers = notify::plan(&store, now)?;
            let shown = &triggers[..n.min(triggers.len())];
            if json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(shown)
                        .map_err(|e| AlarmError::store(format!("{e}")))?
                );
            } else {
                for t in shown {
                    println!("{} {} ({})", t.fire_at, t.title, t.alarm_id);
                }
            }
            Ok(())
        }

        Command::Toggle { id, off } => {
            let toggled = store.toggle(&id, !off, now)?;
            println!("{toggled}");
            store.save(&cli.store)
        }

        Command::Rm { id } => {
            let removed = store.remove(&id)?;
            println!("removed [{}] {removed}", removed.id);
            store.save(&cli.store)
        }
    }
}
