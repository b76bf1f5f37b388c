use crate::direction::TieBreak;
use gloo_net::http::Request;
use log::warn;
use serde::Deserialize;

const CONFIG_URL: &str = "assets/config.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SwipeConfig {
    pub hint_threshold: f64,
    pub commit_threshold: f64,
    pub advance_delay_ms: u32,
    pub fly_off_distance: f64,
    pub fly_off_rotation: f64,
    pub drag_scale: f64,
    pub rotation_divisor: f64,
    pub tie_break: TieBreak,
}

impl Default for SwipeConfig {
    fn default() -> Self {
        Self {
            hint_threshold: 20.0,
            commit_threshold: 30.0,
            advance_delay_ms: 300,
            fly_off_distance: 500.0,
            fly_off_rotation: 30.0,
            drag_scale: 1.05,
            rotation_divisor: 10.0,
            tie_break: TieBreak::HorizontalFirst,
        }
    }
}

impl SwipeConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

pub async fn load_config() -> SwipeConfig {
    let response = match Request::get(CONFIG_URL).send().await {
        Ok(response) if response.ok() => response,
        Ok(response) => {
            warn!("HTTP {} while fetching {}, using defaults", response.status(), CONFIG_URL);
            return SwipeConfig::default();
        }
        Err(err) => {
            warn!("Failed to fetch {}: {}", CONFIG_URL, err);
            return SwipeConfig::default();
        }
    };

    match response.text().await {
        Ok(text) => SwipeConfig::from_json(&text).unwrap_or_else(|err| {
            warn!("Invalid swipe config, using defaults: {}", err);
            SwipeConfig::default()
        }),
        Err(err) => {
            warn!("Failed to read {}: {}", CONFIG_URL, err);
            SwipeConfig::default()
        }
    }
}
