//! Keyboard state consumed by the simulation
//!
//! Key events only toggle flags; the next frame reads them synchronously.

use crate::settings::KeyBindings;

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Reset,
    Skip,
}

impl Key {
    pub const ALL: [Key; 6] = [
        Key::Left,
        Key::Right,
        Key::Up,
        Key::Down,
        Key::Reset,
        Key::Skip,
    ];

    fn index(self) -> usize {
        match self {
            Key::Left => 0,
            Key::Right => 1,
            Key::Up => 2,
            Key::Down => 3,
            Key::Reset => 4,
            Key::Skip => 5,
        }
    }
}

impl KeyBindings {
    /// Map a `KeyboardEvent.code` to a game key; unbound codes give `None`
    pub fn resolve(&self, code: &str) -> Option<Key> {
        Key::ALL.into_iter().find(|key| self.code_for(*key) == code)
    }

    pub fn code_for(&self, key: Key) -> &str {
        match key {
            Key::Left => &self.left,
            Key::Right => &self.right,
            Key::Up => &self.up,
            Key::Down => &self.down,
            Key::Reset => &self.reset,
            Key::Skip => &self.skip,
        }
    }
}

/// Pressed/released flag per recognized key
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pressed: [bool; 6],
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: Key, down: bool) {
        self.pressed[key.index()] = down;
    }

    pub fn press(&mut self, key: Key) {
        self.set(key, true);
    }

    pub fn release(&mut self, key: Key) {
        self.set(key, false);
    }

    pub fn is_down(&self, key: Key) -> bool {
        self.pressed[key.index()]
    }

    /// Release everything
    pub fn clear(&mut self) {
        self.pressed = [false; 6];
    }
}
