use std::cmp::Ordering;

pub const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Info;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
}

impl PartialOrd for LogLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for LogLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        fn rank(level: LogLevel) -> u8 {
            match level {
                LogLevel::Debug => 0,
                LogLevel::Info => 1,
            }
        }

        rank(*self).cmp(&rank(*other))
    }
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "debug" => Some(Self::Debug),
            "info" => Some(Self::Info),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl LogConfig {
    pub fn new(level: LogLevel) -> Self {
        Self { level }
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level
    }
}

pub fn log_event(config: &LogConfig, level: LogLevel, event: &str, fields: serde_json::Value) {
    if !config.enabled(level) {
        return;
    }

    emit_line(&build_event(now_unix_millis(), level, event, fields).to_string());
}

fn build_event(ts: u64, level: LogLevel, event: &str, fields: serde_json::Value) -> serde_json::Value {
    let mut payload = serde_json::Map::new();
    payload.insert("ts".to_string(), serde_json::Value::Number(serde_json::Number::from(ts)));
    payload.insert("level".to_string(), serde_json::Value::String(level.as_str().to_string()));
    payload.insert("event".to_string(), serde_json::Value::String(event.to_string()));

    if let serde_json::Value::Object(extra) = fields {
        for (key, value) in extra {
            payload.insert(key, value);
        }
    }

    serde_json::Value::Object(payload)
}

#[cfg(not(target_arch = "wasm32"))]
fn now_unix_millis() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|value| value.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(target_arch = "wasm32")]
fn now_unix_millis() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

#[cfg(not(target_arch = "wasm32"))]
fn emit_line(line: &str) {
    println!("{line}");
}

#[cfg(target_arch = "wasm32")]
fn emit_line(line: &str) {
    web_sys::console::log_1(&wasm_bindgen::JsValue::from_str(line));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_events_are_dropped_at_info_threshold() {
        let config = LogConfig::new(LogLevel::Info);

        assert!(!config.enabled(LogLevel::Debug));
        assert!(config.enabled(LogLevel::Info));
        assert!(LogConfig::new(LogLevel::Debug).enabled(LogLevel::Debug));
    }

    #[test]
    fn event_payload_merges_fields_after_header() {
        let payload = build_event(
            42,
            LogLevel::Debug,
            "reveal_fired",
            serde_json::json!({ "section": "projects", "delay": 0.12 }),
        );

        assert_eq!(payload["ts"], 42);
        assert_eq!(payload["level"], "debug");
        assert_eq!(payload["event"], "reveal_fired");
        assert_eq!(payload["section"], "projects");
    }

    #[test]
    fn non_object_fields_are_ignored() {
        let payload = build_event(1, LogLevel::Info, "frame_driver_start", serde_json::json!(7));

        assert_eq!(payload.as_object().map(|map| map.len()), Some(3));
    }

    #[test]
    fn parses_levels_case_insensitively() {
        assert_eq!(LogLevel::parse(" DEBUG "), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("info"), Some(LogLevel::Info));
        assert_eq!(LogLevel::parse("trace"), None);
    }
}
