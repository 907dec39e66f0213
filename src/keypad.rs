/// # Keypad
/// The pressed status of the 16 hexadecimal keys 0..F.
///
/// The interpreter only ever reads it; a frontend writes it between cycles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Keypad {
    keys: [bool; 16],
}

impl Keypad {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as held down; keys outside 0..F are ignored
    pub fn press(&mut self, key: u8) {
        if let Some(pressed) = self.keys.get_mut(key as usize) {
            *pressed = true;
        }
    }

    /// Marks `key` as released; keys outside 0..F are ignored
    pub fn release(&mut self, key: u8) {
        if let Some(pressed) = self.keys.get_mut(key as usize) {
            *pressed = false;
        }
    }

    /// Replaces every key's status at once
    pub fn set_all(&mut self, keys: [bool; 16]) {
        self.keys = keys;
    }

    /// Whether `key` is held down. A register can name a key past F, which is never pressed.
    pub fn is_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    /// The lowest numbered key that is held down
    pub fn first_pressed(&self) -> Option<u8> {
        self.keys.iter().position(|&pressed| pressed).map(|key| key as u8)
    }
}

impl From<[bool; 16]> for Keypad {
    fn from(keys: [bool; 16]) -> Self {
        Keypad { keys }
    }
}

#[cfg(test)]
mod test_keypad {
    use super::*;

    #[test]
    fn test_press_and_release() {
        let mut keypad = Keypad::new();
        keypad.press(0xA);
        assert!(keypad.is_pressed(0xA));
        keypad.release(0xA);
        assert!(!keypad.is_pressed(0xA));
    }

    #[test]
    fn test_keys_past_f_are_never_pressed() {
        let mut keypad = Keypad::new();
        keypad.press(0x10);
        assert!(!keypad.is_pressed(0x10));
        assert_eq!(keypad, Keypad::new());
    }

    #[test]
    fn test_first_pressed_is_lowest() {
        let mut keys = [false; 16];
        keys[0x9] = true;
        keys[0x3] = true;
        assert_eq!(Keypad::from(keys).first_pressed(), Some(0x3));
        assert_eq!(Keypad::new().first_pressed(), None);
    }
}
