use std::collections::HashSet;

use winit::{event::ElementState, keyboard::KeyCode};

/// Physical keys currently held down.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    pressed: HashSet<KeyCode>,
}
impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update_key(&mut self, event: &winit::event::KeyEvent) {
        let winit::keyboard::PhysicalKey::Code(key) = event.physical_key else {
            return;
        };
        self.set_key(key, event.state);
    }
    pub fn set_key(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed.insert(key);
            }
            ElementState::Released => {
                self.pressed.remove(&key);
            }
        }
    }
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed.contains(&key)
    }

    /// Focus loss swallows release events.
    pub fn release_all(&mut self) {
        self.pressed.clear();
    }
}
