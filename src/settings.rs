// Live presentation settings: background colour and obstacle shape.
use serde::{Deserialize, Serialize};

use crate::game::obstacle::ObstacleShape;

pub const DEFAULT_BACKGROUND: &str = "#70c5ce";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub background: String,
    pub obstacle_shape: ObstacleShape,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND.to_string(),
            obstacle_shape: ObstacleShape::default(),
        }
    }
}

/// A single edit coming from one of the settings controls.
#[derive(Clone, Debug, PartialEq)]
pub enum SettingChange {
    Background(String),
    ObstacleShape(ObstacleShape),
}

impl Settings {
    pub fn apply(&mut self, change: SettingChange) {
        match change {
            SettingChange::Background(color) => {
                log::info!("background set to {color}");
                self.background = color;
            }
            SettingChange::ObstacleShape(shape) => {
                log::info!("obstacle shape set to {shape:?}");
                self.obstacle_shape = shape;
            }
        }
    }

    /// Parse a JSON settings document on top of the current values; keys
    /// absent from `json` keep what `self` has.
    pub fn merged_with_json(&self, json: &str) -> Result<Settings, serde_json::Error> {
        let mut value = serde_json::to_value(self)?;
        let patch: serde_json::Value = serde_json::from_str(json)?;
        if let (Some(base), serde_json::Value::Object(patch)) = (value.as_object_mut(), patch) {
            for (k, v) in patch {
                base.insert(k, v);
            }
        }
        serde_json::from_value(value)
    }
}
