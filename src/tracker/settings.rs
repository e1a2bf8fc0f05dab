use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// User preferences stored next to the tracked data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub screenshot_enabled: bool,
    /// Minutes without user input after which every running timer is stopped.
    pub idle_timeout: u32,
    pub dark_mode: bool,
    /// Hours per day the user aims for.
    pub daily_goal: f64,
    pub auto_export: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            screenshot_enabled: true,
            idle_timeout: 5,
            dark_mode: true,
            daily_goal: 6.,
            auto_export: false,
        }
    }
}

impl Settings {
    /// Reads settings leniently: every recognised field with a usable value overrides the
    /// default, anything else is ignored.
    pub fn from_value(value: &Value) -> Settings {
        let mut settings = Settings::default();
        let Value::Object(map) = value else {
            warn!("Settings are not an object, using defaults");
            return settings;
        };

        if let Some(v) = map.get("screenshotEnabled").and_then(Value::as_bool) {
            settings.screenshot_enabled = v;
        }
        if let Some(v) = map
            .get("idleTimeout")
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite() && *v >= 0.)
        {
            settings.idle_timeout = v.round().min(u32::MAX as f64) as u32;
        }
        if let Some(v) = map.get("darkMode").and_then(Value::as_bool) {
            settings.dark_mode = v;
        }
        if let Some(v) = map
            .get("dailyGoal")
            .and_then(Value::as_f64)
            .filter(|v| v.is_finite() && *v >= 0.)
        {
            settings.daily_goal = v;
        }
        if let Some(v) = map.get("autoExport").and_then(Value::as_bool) {
            settings.auto_export = v;
        }
        settings
    }
}
