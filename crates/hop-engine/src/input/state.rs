use std::collections::HashSet;

use crate::input::keys::{InputEvent, LogicalKey};

/// The set of logical keys currently held.
///
/// Set membership only: no press order, no repeat counts. Pressing a held
/// key or releasing an unheld one changes nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    held: HashSet<LogicalKey>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: LogicalKey) {
        self.held.insert(key);
    }

    pub fn release(&mut self, key: LogicalKey) {
        self.held.remove(&key);
    }

    /// Route a raw press/release notification.
    pub fn apply(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.press(key),
            InputEvent::KeyUp(key) => self.release(key),
        }
    }

    pub fn is_held(&self, key: LogicalKey) -> bool {
        self.held.contains(&key)
    }

    /// Drop every held key (e.g. the window lost focus and will never
    /// deliver the matching key-ups).
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }
}

impl FromIterator<LogicalKey> for InputState {
    fn from_iter<I: IntoIterator<Item = LogicalKey>>(iter: I) -> Self {
        Self {
            held: iter.into_iter().collect(),
        }
    }
}
