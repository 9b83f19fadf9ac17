//! Text and JSON rendering of timer state

use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use serde::Serialize;

use crate::state::{Preset, SessionRecord, TimerSnapshot};

/// Formats a completion timestamp as a local hour:minute
pub trait TimeOfDayFormatter: Send + Sync {
    fn format(&self, at: DateTime<Utc>) -> String;
}

/// Clock convention for time-of-day display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ClockStyle {
    #[default]
    #[value(name = "24h")]
    H24,
    #[value(name = "12h")]
    H12,
}

/// Regions whose everyday clock is 12-hour
const TWELVE_HOUR_REGIONS: &[&str] = &["US", "CA", "AU", "NZ", "PH", "IN", "PK", "EG", "SA"];

impl ClockStyle {
    /// Pick the convention for a POSIX locale name such as `en_US.UTF-8`
    pub fn for_locale(locale: &str) -> Self {
        let name = locale.split(['.', '@']).next().unwrap_or_default();
        let region = name.split_once('_').map(|(_, region)| region);
        match region {
            Some(region) if TWELVE_HOUR_REGIONS.contains(&region) => ClockStyle::H12,
            _ => ClockStyle::H24,
        }
    }

    /// Resolve from `LC_ALL`, `LC_TIME` then `LANG`, first non-empty wins
    pub fn from_env() -> Self {
        ["LC_ALL", "LC_TIME", "LANG"]
            .iter()
            .filter_map(|key| std::env::var(key).ok())
            .find(|value| !value.is_empty())
            .map(|locale| Self::for_locale(&locale))
            .unwrap_or_default()
    }

    fn pattern(&self) -> &'static str {
        match self {
            ClockStyle::H24 => "%H:%M",
            ClockStyle::H12 => "%I:%M %p",
        }
    }
}

/// Time of day in the system's local timezone
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock {
    pub style: ClockStyle,
}

impl TimeOfDayFormatter for LocalClock {
    fn format(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&Local).format(self.style.pattern()).to_string()
    }
}

#[derive(Serialize)]
struct InfoView<'a> {
    uptime: &'a str,
    last_action: Option<&'a str>,
    last_action_time: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct JournalEntryView<'a> {
    #[serde(flatten)]
    record: &'a SessionRecord,
    time_of_day: String,
}

pub const HELP: &str = "\
Commands:
  presets | ls            list presets
  select <id> | use <id>  switch to a preset
  custom <minutes>        custom session, 1-120 minutes
  toggle | start | pause  start or pause the countdown
  reset | r               back to the full duration
  notes <text>            replace session notes
  status | s              show the countdown
  journal | j             show completed sessions
  info                    uptime and last action
  help | ?                this help
  quit | q                leave";

pub struct Renderer {
    json: bool,
    clock: Box<dyn TimeOfDayFormatter>,
}

impl Renderer {
    pub fn new(json: bool, clock: Box<dyn TimeOfDayFormatter>) -> Self {
        Self { json, clock }
    }

    fn to_json<T: Serialize + ?Sized>(value: &T) -> String {
        serde_json::to_string(value)
            .unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
    }

    pub fn status(&self, snapshot: &TimerSnapshot) -> String {
        if self.json {
            return Self::to_json(snapshot);
        }

        let mut line = format!(
            "[{}] {} {} {:>3.0}% cycles:{}",
            snapshot.phase.as_str(),
            snapshot.preset.label,
            snapshot.remaining_display,
            snapshot.progress * 100.0,
            snapshot.cycle_count
        );
        if !snapshot.session_notes.is_empty() {
            line.push_str(&format!(" notes: {}", snapshot.session_notes));
        }
        line
    }

    pub fn journal(&self, records: &[SessionRecord]) -> String {
        if self.json {
            let entries: Vec<_> = records
                .iter()
                .map(|record| JournalEntryView {
                    record,
                    time_of_day: self.clock.format(record.completed_at),
                })
                .collect();
            return Self::to_json(&entries);
        }

        if records.is_empty() {
            return "No completed sessions yet".to_string();
        }
        records
            .iter()
            .map(|record| self.journal_line(record))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn journal_line(&self, record: &SessionRecord) -> String {
        format!(
            "{}  {} ({} min)",
            self.clock.format(record.completed_at),
            record.preset_label,
            record.duration_minutes
        )
    }

    pub fn completion(&self, record: &SessionRecord) -> String {
        if self.json {
            return Self::to_json(record);
        }
        format!("Session complete: {}", self.journal_line(record))
    }

    pub fn info(
        &self,
        uptime: &str,
        last_action: Option<&str>,
        last_action_time: Option<DateTime<Utc>>,
    ) -> String {
        if self.json {
            return Self::to_json(&InfoView {
                uptime,
                last_action,
                last_action_time,
            });
        }
        match (last_action, last_action_time) {
            (Some(action), Some(at)) => format!(
                "uptime {}, last action: {} at {}",
                uptime,
                action,
                self.clock.format(at)
            ),
            (Some(action), None) => format!("uptime {}, last action: {}", uptime, action),
            _ => format!("uptime {}, no actions yet", uptime),
        }
    }

    pub fn presets(&self, presets: &[Preset]) -> String {
        if self.json {
            return Self::to_json(presets);
        }
        presets
            .iter()
            .map(|p| format!("{:<12} {:<12} {:>3} min  {}", p.id, p.label, p.minutes, p.description))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
