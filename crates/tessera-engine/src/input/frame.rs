use std::collections::HashSet;

use super::types::{InputEvent, Key};

/// Per-frame input deltas. Cleared by the runtime after each frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,

    pub keys_released: HashSet<Key>,

    /// Auto-repeat presses of keys already held.
    pub keys_repeated: HashSet<Key>,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.keys_repeated.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Pressed this frame, counting auto-repeat.
    pub fn key_hit(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key) || self.keys_repeated.contains(&key)
    }
}
