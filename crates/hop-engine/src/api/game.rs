use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::components::player::PlayerConfig;
use crate::core::physics::PhysicsWorld;
use crate::input::keys::KeyBindings;

/// Configuration for the engine, provided by the game or loaded from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Physics timestep in seconds (default: 1/60). One step runs per frame.
    pub fixed_dt: f32,
    /// Gravity vector, Y-up. Default: Earth gravity.
    pub gravity: Vec3,
    /// Tuning for the controlled ball.
    pub player: PlayerConfig,
    /// Physical key code → logical key.
    pub bindings: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            gravity: Vec3::new(0.0, -9.81, 0.0),
            player: PlayerConfig::default(),
            bindings: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the static scenery. Runs before the player body is created.
    fn init(&mut self, world: &mut PhysicsWorld);
}
