use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};

/// User settings, stored next to the day counters in the data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    // Comma-separated folder prefixes; empty means "everywhere"
    #[serde(default)]
    pub include_folders: String,

    #[serde(default)]
    pub exclude_folders: String,

    #[serde(default = "default_count_pastes")]
    pub count_pastes: bool,

    // Always > 0: both the loader and `apply` refuse anything else
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u64,
}

fn default_count_pastes() -> bool {
    true
}

fn default_daily_goal() -> u64 {
    500
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            include_folders: String::new(),
            exclude_folders: String::new(),
            count_pastes: default_count_pastes(),
            daily_goal: default_daily_goal(),
        }
    }
}

impl Settings {
    /// Builds settings from whatever was persisted, field by field.
    ///
    /// Missing fields, fields of the wrong type and a goal that isn't a
    /// positive integer all fall back to the defaults instead of failing.
    pub fn from_value(value: &Value) -> Self {
        let mut settings = Settings::default();
        let Some(obj) = value.as_object() else {
            if !value.is_null() {
                log::warn!("stored settings are not an object, using defaults");
            }
            return settings;
        };

        if let Some(s) = obj.get("includeFolders").and_then(Value::as_str) {
            settings.include_folders = s.to_string();
        }
        if let Some(s) = obj.get("excludeFolders").and_then(Value::as_str) {
            settings.exclude_folders = s.to_string();
        }
        if let Some(b) = obj.get("countPastes").and_then(Value::as_bool) {
            settings.count_pastes = b;
        }
        match obj.get("dailyGoal").and_then(Value::as_u64) {
            Some(goal) if goal > 0 => settings.daily_goal = goal,
            Some(_) => log::warn!("stored daily goal is zero, using default"),
            None => {}
        }

        settings
    }

    /// Applies one user edit from the settings surface.
    ///
    /// `name` is the persisted field name or its snake_case spelling.
    /// A rejected value leaves the settings as they were.
    pub fn apply(&mut self, name: &str, value: &str) -> Result<()> {
        match name {
            "dailyGoal" | "daily_goal" => {
                self.daily_goal = parse_goal(value)?;
            }
            "countPastes" | "count_pastes" => {
                self.count_pastes = parse_flag(value)?;
            }
            "includeFolders" | "include_folders" => {
                self.include_folders = value.to_string();
            }
            "excludeFolders" | "exclude_folders" => {
                self.exclude_folders = value.to_string();
            }
            other => return Err(Error::UnknownSetting(other.to_string())),
        }
        Ok(())
    }
}

fn parse_goal(value: &str) -> Result<u64> {
    let invalid = |reason| Error::InvalidSetting {
        name: "dailyGoal",
        value: value.to_string(),
        reason,
    };
    let goal: u64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("not a whole number"))?;
    if goal == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(goal)
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::InvalidSetting {
            name: "countPastes",
            value: value.to_string(),
            reason: "expected true or false",
        }),
    }
}
