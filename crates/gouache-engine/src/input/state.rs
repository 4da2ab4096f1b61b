use std::collections::HashSet;

use super::frame::InputFrame;
use super::types::{
    InputEvent,
    Key,
    KeyState,
    Modifiers,
    MouseButton,
    MouseButtonState,
    PointerButtonEvent,
    PointerMoveEvent,
    Tilt,
};

/// Current input state for a single window.
///
/// Per-frame transitions are recorded into an `InputFrame`.
#[derive(Debug)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in logical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Last reported contact pressure, `[0, 1]`.
    pub pointer_pressure: f32,

    /// Last reported stylus tilt.
    pub pointer_tilt: Tilt,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            modifiers: Modifiers::default(),
            focused: false,
            pointer_pos: None,
            pointer_pressure: 1.0,
            pointer_tilt: Tilt::default(),
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
        }
    }
}

impl InputState {
    /// Applies `ev` to the current state and records deltas into `frame`.
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => {
                self.modifiers = *m;
            }

            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Releases are not delivered after focus loss.
                    self.keys_down.clear();
                    self.buttons_down.clear();
                }
            }

            InputEvent::PointerMoved(PointerMoveEvent { x, y, pressure, tilt }) => {
                self.pointer_pos = Some((*x, *y));
                self.pointer_pressure = pressure.clamp(0.0, 1.0);
                self.pointer_tilt = *tilt;
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Key { key, state, modifiers, .. } => {
                self.modifiers = *modifiers;

                match state {
                    KeyState::Pressed => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        }
                    }
                    KeyState::Released => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton(PointerButtonEvent {
                button,
                state,
                x,
                y,
                pressure,
                tilt,
                modifiers,
            }) => {
                self.pointer_pos = Some((*x, *y));
                self.pointer_pressure = pressure.clamp(0.0, 1.0);
                self.pointer_tilt = *tilt;
                self.modifiers = *modifiers;

                match state {
                    MouseButtonState::Pressed => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    MouseButtonState::Released => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { modifiers, .. } => {
                self.modifiers = *modifiers;
            }
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, btn: MouseButton) -> bool {
        self.buttons_down.contains(&btn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn moved(x: f32, pressure: f32) -> InputEvent {
        InputEvent::PointerMoved(PointerMoveEvent {
            x,
            y: 0.0,
            pressure,
            tilt: Tilt { angle: 0.5, magnitude: 30.0 },
        })
    }

    fn button(state: MouseButtonState) -> InputEvent {
        InputEvent::PointerButton(PointerButtonEvent {
            button: MouseButton::Left,
            state,
            x: 4.0,
            y: 2.0,
            pressure: 0.25,
            tilt: Tilt::default(),
            modifiers: Modifiers::default(),
        })
    }

    #[test]
    fn pointer_move_tracks_pressure_and_tilt() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        assert_eq!(s.pointer_pressure, 1.0);

        s.apply_event(&mut f, moved(3.0, 0.5));
        assert_eq!(s.pointer_pos, Some((3.0, 0.0)));
        assert_eq!(s.pointer_pressure, 0.5);
        assert_eq!(s.pointer_tilt.magnitude, 30.0);
    }

    #[test]
    fn pressure_is_clamped() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, moved(0.0, 1.7));
        assert_eq!(s.pointer_pressure, 1.0);
        s.apply_event(&mut f, moved(0.0, -0.2));
        assert_eq!(s.pointer_pressure, 0.0);
    }

    #[test]
    fn button_transitions_land_in_frame() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, button(MouseButtonState::Pressed));
        assert!(s.button_down(MouseButton::Left));
        assert!(f.buttons_pressed.contains(&MouseButton::Left));
        assert_eq!(s.pointer_pressure, 0.25);
        assert_eq!(s.pointer_pos, Some((4.0, 2.0)));

        s.apply_event(&mut f, button(MouseButtonState::Released));
        assert!(!s.button_down(MouseButton::Left));
        assert!(f.buttons_released.contains(&MouseButton::Left));
        assert_eq!(f.events.len(), 2);
    }

    #[test]
    fn focus_loss_releases_everything() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        s.apply_event(&mut f, button(MouseButtonState::Pressed));
        s.apply_event(&mut f, InputEvent::Focused(false));
        assert!(s.buttons_down.is_empty());
    }

    #[test]
    fn events_keep_arrival_order() {
        let (mut s, mut f) = (InputState::default(), InputFrame::default());
        for i in 0..5 {
            s.apply_event(&mut f, moved(i as f32, 1.0));
        }
        let xs: Vec<f32> = f
            .events
            .iter()
            .filter_map(|e| match e {
                InputEvent::PointerMoved(m) => Some(m.x),
                _ => None,
            })
            .collect();
        assert_eq!(xs, vec![0.0, 1.0, 2.0, 3.0, 4.0]);

        f.clear();
        assert!(f.events.is_empty());
    }
}
