use std::{env, path::PathBuf, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    /// Directory holding one JSON file per storage key.
    pub data_dir: PathBuf,
    pub debounce: Duration,
    pub tick_interval: Duration,
    pub rollover_poll: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("data"),
            debounce: Duration::from_millis(250),
            tick_interval: Duration::from_secs(1),
            rollover_poll: Duration::from_secs(30),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: parse_var("PORT").unwrap_or(defaults.port),
            data_dir: env::var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            debounce: parse_var::<u64>("WIDGET_DEBOUNCE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.debounce),
            tick_interval: parse_var::<u64>("WIDGET_TICK_MS")
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(defaults.tick_interval),
            rollover_poll: parse_var::<u64>("WIDGET_ROLLOVER_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.rollover_poll),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.trim().parse().ok())
}
