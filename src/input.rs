use sdl2::keyboard::Scancode;

/// Movement keys held during the current frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MoveKeys {
    pub forward: bool,
    pub back: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveKeys {
    /// Samples W/S/A/D through `is_down`, which reports whether a physical key is held.
    pub fn from_pressed(is_down: impl Fn(Scancode) -> bool) -> Self {
        Self {
            forward: is_down(Scancode::W),
            back: is_down(Scancode::S),
            left: is_down(Scancode::A),
            right: is_down(Scancode::D),
        }
    }

    /// Polls SDL's instantaneous keyboard state.
    pub fn poll(event_pump: &sdl2::EventPump) -> Self {
        let keyboard = event_pump.keyboard_state();
        Self::from_pressed(|scancode| keyboard.is_scancode_pressed(scancode))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn wasd_maps_to_directions() {
        let held: HashSet<Scancode> = [Scancode::W, Scancode::D].into_iter().collect();
        let keys = MoveKeys::from_pressed(|scancode| held.contains(&scancode));
        assert_eq!(
            keys,
            MoveKeys {
                forward: true,
                back: false,
                left: false,
                right: true,
            }
        );
    }

    #[test]
    fn other_keys_are_ignored() {
        let held: HashSet<Scancode> = [Scancode::Up, Scancode::Space].into_iter().collect();
        let keys = MoveKeys::from_pressed(|scancode| held.contains(&scancode));
        assert_eq!(keys, MoveKeys::default());
    }
}
