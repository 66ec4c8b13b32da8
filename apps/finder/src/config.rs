use std::{collections::HashMap, fs, path::Path, path::PathBuf};

use serde::Deserialize;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    pub server_url: String,
    pub puzzle_name: String,
    pub visitor: String,
    pub state_file: PathBuf,
    pub submit_timeout_secs: u64,
    pub allow_committed: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            puzzle_name: "treasure_as".into(),
            visitor: "anonymous".into(),
            state_file: PathBuf::from("./data/finder_session.json"),
            submit_timeout_secs: 30,
            allow_committed: false,
        }
    }
}

pub fn load_settings(config_path: &Path) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(config_path) {
        apply_file_overrides(&mut settings, &raw);
    }
    apply_env_overrides(&mut settings, |name| std::env::var(name).ok());

    settings
}

pub(crate) fn apply_file_overrides(settings: &mut Settings, raw: &str) {
    let file_cfg = match toml::from_str::<HashMap<String, toml::Value>>(raw) {
        Ok(file_cfg) => file_cfg,
        Err(err) => {
            warn!(%err, "ignoring unreadable config file");
            return;
        }
    };

    let text = |key: &str| match file_cfg.get(key) {
        Some(toml::Value::String(v)) => Some(v.clone()),
        Some(other) => Some(other.to_string()),
        None => None,
    };

    if let Some(v) = text("server_url") {
        settings.server_url = v;
    }
    if let Some(v) = text("puzzle_name") {
        settings.puzzle_name = v;
    }
    if let Some(v) = text("visitor") {
        settings.visitor = v;
    }
    if let Some(v) = text("state_file") {
        settings.state_file = PathBuf::from(v);
    }
    if let Some(v) = text("submit_timeout_secs") {
        set_parsed(&mut settings.submit_timeout_secs, "submit_timeout_secs", &v);
    }
    if let Some(v) = text("allow_committed") {
        set_parsed(&mut settings.allow_committed, "allow_committed", &v);
    }
}

pub(crate) fn apply_env_overrides(
    settings: &mut Settings,
    lookup: impl Fn(&str) -> Option<String>,
) {
    // The APP__ form wins when both are set.
    let var = |plain: &str, app: &str| lookup(app).or_else(|| lookup(plain));

    if let Some(v) = var("FINDER_SERVER_URL", "APP__SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = var("FINDER_PUZZLE_NAME", "APP__PUZZLE_NAME") {
        settings.puzzle_name = v;
    }
    if let Some(v) = var("FINDER_VISITOR", "APP__VISITOR") {
        settings.visitor = v;
    }
    if let Some(v) = var("FINDER_STATE_FILE", "APP__STATE_FILE") {
        settings.state_file = PathBuf::from(v);
    }
    if let Some(v) = var("FINDER_SUBMIT_TIMEOUT_SECS", "APP__SUBMIT_TIMEOUT_SECS") {
        set_parsed(&mut settings.submit_timeout_secs, "submit_timeout_secs", &v);
    }
    if let Some(v) = var("FINDER_ALLOW_COMMITTED", "APP__ALLOW_COMMITTED") {
        set_parsed(&mut settings.allow_committed, "allow_committed", &v);
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, name: &str, raw: &str) {
    match raw.trim().parse() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(setting = name, value = raw, "ignoring unparsable setting"),
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
