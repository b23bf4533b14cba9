use crate::config::RunConfig;
use sdl2::event::Event;
use sdl2::keyboard::Keycode;

/// Joystick axis movement beyond this threshold registers as a d-pad press.
const AXIS_THRESHOLD: i16 = 3200;

// Active-low pad bits
const PAD_RIGHT: u8 = 0x01;
const PAD_LEFT: u8 = 0x02;
const PAD_UP: u8 = 0x04;
const PAD_DOWN: u8 = 0x08;
const BTN_A: u8 = 0x01;
const BTN_B: u8 = 0x02;
const BTN_SELECT: u8 = 0x04;
const BTN_START: u8 = 0x08;

/// Pad state sampled by the bus when the CPU reads JOYP. Both nibbles are
/// active-low: a cleared bit means pressed.
pub struct Joypad {
    dpad_bits: u8,
    btn_bits: u8,
}

impl Joypad {
    pub fn new() -> Self {
        Self {
            dpad_bits: 0x0F,
            btn_bits: 0x0F,
        }
    }

    pub fn dpad_bits(&self) -> u8 {
        self.dpad_bits
    }

    pub fn button_bits(&self) -> u8 {
        self.btn_bits
    }

    pub fn set_dpad(&mut self, bits: u8) {
        self.dpad_bits = bits & 0x0F;
    }

    pub fn set_buttons(&mut self, bits: u8) {
        self.btn_bits = bits & 0x0F;
    }

    /// Fold one SDL event into the pad state. Unrelated events are ignored.
    pub fn handle_event(&mut self, event: &Event, config: &RunConfig) {
        match *event {
            Event::KeyDown {
                keycode: Some(keycode),
                ..
            } => self.handle_key(keycode, true),
            Event::KeyUp {
                keycode: Some(keycode),
                ..
            } => self.handle_key(keycode, false),
            Event::JoyButtonDown { button_idx, .. } => {
                self.handle_joy_button(button_idx, true, config);
            }
            Event::JoyButtonUp { button_idx, .. } => {
                self.handle_joy_button(button_idx, false, config);
            }
            Event::JoyAxisMotion {
                axis_idx, value, ..
            } => self.handle_axis(axis_idx, value, config),
            _ => {}
        }
    }

    fn handle_key(&mut self, keycode: Keycode, pressed: bool) {
        let (bits, mask) = match keycode {
            Keycode::Right => (&mut self.dpad_bits, PAD_RIGHT),
            Keycode::Left => (&mut self.dpad_bits, PAD_LEFT),
            Keycode::Up => (&mut self.dpad_bits, PAD_UP),
            Keycode::Down => (&mut self.dpad_bits, PAD_DOWN),
            Keycode::X => (&mut self.btn_bits, BTN_A),
            Keycode::Z => (&mut self.btn_bits, BTN_B),
            Keycode::RShift => (&mut self.btn_bits, BTN_SELECT),
            Keycode::Return => (&mut self.btn_bits, BTN_START),
            _ => return,
        };
        if pressed {
            *bits &= !mask;
        } else {
            *bits |= mask;
        }
    }

    fn handle_joy_button(&mut self, button: u8, pressed: bool, config: &RunConfig) {
        let mask = if u32::from(button) == config.joy_a {
            BTN_A
        } else if u32::from(button) == config.joy_b {
            BTN_B
        } else if u32::from(button) == config.joy_select {
            BTN_SELECT
        } else if u32::from(button) == config.joy_start {
            BTN_START
        } else {
            return;
        };
        if pressed {
            self.btn_bits &= !mask;
        } else {
            self.btn_bits |= mask;
        }
    }

    fn handle_axis(&mut self, axis: u8, value: i16, config: &RunConfig) {
        if u32::from(axis) == config.joy_x {
            if value > AXIS_THRESHOLD {
                self.dpad_bits &= !PAD_RIGHT;
                self.dpad_bits |= PAD_LEFT;
            } else if value < -AXIS_THRESHOLD {
                self.dpad_bits |= PAD_RIGHT;
                self.dpad_bits &= !PAD_LEFT;
            } else {
                self.dpad_bits |= PAD_RIGHT | PAD_LEFT;
            }
        } else if u32::from(axis) == config.joy_y {
            if value > AXIS_THRESHOLD {
                self.dpad_bits |= PAD_UP;
                self.dpad_bits &= !PAD_DOWN;
            } else if value < -AXIS_THRESHOLD {
                self.dpad_bits &= !PAD_UP;
                self.dpad_bits |= PAD_DOWN;
            } else {
                self.dpad_bits |= PAD_UP | PAD_DOWN;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_clear_and_set_active_low_bits() {
        let mut joypad = Joypad::new();

        joypad.handle_key(Keycode::Down, true);
        assert_eq!(0x07, joypad.dpad_bits());

        joypad.handle_key(Keycode::Down, false);
        assert_eq!(0x0F, joypad.dpad_bits());

        joypad.handle_key(Keycode::X, true);
        joypad.handle_key(Keycode::Return, true);
        assert_eq!(0x06, joypad.button_bits());
    }

    #[test]
    fn axis_motion_maps_to_dpad() {
        let mut joypad = Joypad::new();
        let config = RunConfig::default();

        joypad.handle_axis(0, 10000, &config);
        assert_eq!(0, joypad.dpad_bits() & PAD_RIGHT);

        joypad.handle_axis(0, 0, &config);
        assert_eq!(0x0F, joypad.dpad_bits());

        joypad.handle_axis(1, -10000, &config);
        assert_eq!(0, joypad.dpad_bits() & PAD_UP);
    }
}
