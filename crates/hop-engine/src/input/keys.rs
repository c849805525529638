use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Abstract key identifiers, decoupled from platform key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalKey {
    Forward,
    Back,
    Left,
    Right,
    Jump,
}

impl LogicalKey {
    pub const ALL: [LogicalKey; 5] = [
        LogicalKey::Forward,
        LogicalKey::Back,
        LogicalKey::Left,
        LogicalKey::Right,
        LogicalKey::Jump,
    ];
}

/// Raw press/release notifications from the windowing layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(LogicalKey),
    KeyUp(LogicalKey),
}

/// Maps physical key codes (DOM `KeyboardEvent.code` strings such as
/// `"KeyW"` or `"Space"`) to logical keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    map: HashMap<String, LogicalKey>,
}

impl KeyBindings {
    /// No bindings at all.
    pub fn empty() -> Self {
        Self { map: HashMap::new() }
    }

    pub fn bind(mut self, code: impl Into<String>, key: LogicalKey) -> Self {
        self.map.insert(code.into(), key);
        self
    }

    /// Resolve a physical code. Unbound codes yield `None` and are ignored upstream.
    pub fn lookup(&self, code: &str) -> Option<LogicalKey> {
        self.map.get(code).copied()
    }

    pub fn key_down(&self, code: &str) -> Option<InputEvent> {
        self.lookup(code).map(InputEvent::KeyDown)
    }

    pub fn key_up(&self, code: &str) -> Option<InputEvent> {
        self.lookup(code).map(InputEvent::KeyUp)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for KeyBindings {
    /// WASD and arrow keys steer, Space jumps.
    fn default() -> Self {
        Self::empty()
            .bind("KeyW", LogicalKey::Forward)
            .bind("ArrowUp", LogicalKey::Forward)
            .bind("KeyS", LogicalKey::Back)
            .bind("ArrowDown", LogicalKey::Back)
            .bind("KeyA", LogicalKey::Left)
            .bind("ArrowLeft", LogicalKey::Left)
            .bind("KeyD", LogicalKey::Right)
            .bind("ArrowRight", LogicalKey::Right)
            .bind("Space", LogicalKey::Jump)
    }
}
