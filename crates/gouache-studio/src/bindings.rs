//! Keyboard and wheel bindings for the painting surface.

use gouache_brush::{BrushConfig, Rgba};
use gouache_engine::input::{Key, Modifiers};

/// Multiplier per `[` / `]` press.
const SIZE_STEP: f32 = 1.25;
/// Multiplier per wheel line.
const WHEEL_SIZE_STEP: f32 = 1.1;
const UNIT_STEP: f32 = 0.1;

/// Digit-row swatches, `1` through `0`.
pub const SWATCHES: [Rgba; 10] = [
    Rgba::new(0.0, 0.0, 0.0, 1.0),
    Rgba::new(1.0, 1.0, 1.0, 1.0),
    Rgba::new(0.86, 0.20, 0.18, 1.0),
    Rgba::new(0.95, 0.55, 0.12, 1.0),
    Rgba::new(0.98, 0.84, 0.25, 1.0),
    Rgba::new(0.30, 0.65, 0.30, 1.0),
    Rgba::new(0.18, 0.45, 0.78, 1.0),
    Rgba::new(0.45, 0.27, 0.62, 1.0),
    Rgba::new(0.45, 0.30, 0.20, 1.0),
    Rgba::new(0.5, 0.5, 0.5, 1.0),
];

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Action {
    Undo,
    Redo,
    Clear,
    Exit,
    ScaleSize(f32),
    AdjustHardness(f32),
    AdjustOpacity(f32),
    AdjustSmoothing(f32),
    Swatch(usize),
}

impl Action {
    /// Maps a key press to an action.
    pub fn for_key(key: Key, modifiers: Modifiers) -> Option<Action> {
        let signed = |step: f32| if modifiers.shift { -step } else { step };

        if modifiers.command() {
            return match key {
                Key::Z if modifiers.shift => Some(Action::Redo),
                Key::Z => Some(Action::Undo),
                Key::Y => Some(Action::Redo),
                _ => None,
            };
        }

        let action = match key {
            Key::Escape => Action::Exit,
            Key::C | Key::Delete | Key::Backspace => Action::Clear,
            Key::BracketLeft => Action::ScaleSize(1.0 / SIZE_STEP),
            Key::BracketRight => Action::ScaleSize(SIZE_STEP),
            Key::H => Action::AdjustHardness(signed(UNIT_STEP)),
            Key::S => Action::AdjustSmoothing(signed(UNIT_STEP)),
            Key::Minus => Action::AdjustOpacity(-UNIT_STEP),
            Key::Equal => Action::AdjustOpacity(UNIT_STEP),
            Key::Digit1 => Action::Swatch(0),
            Key::Digit2 => Action::Swatch(1),
            Key::Digit3 => Action::Swatch(2),
            Key::Digit4 => Action::Swatch(3),
            Key::Digit5 => Action::Swatch(4),
            Key::Digit6 => Action::Swatch(5),
            Key::Digit7 => Action::Swatch(6),
            Key::Digit8 => Action::Swatch(7),
            Key::Digit9 => Action::Swatch(8),
            Key::Digit0 => Action::Swatch(9),
            _ => return None,
        };
        Some(action)
    }

    /// Maps vertical wheel movement to a size change.
    pub fn for_wheel(lines_y: f32) -> Option<Action> {
        if lines_y == 0.0 || !lines_y.is_finite() {
            return None;
        }
        Some(Action::ScaleSize(WHEEL_SIZE_STEP.powf(lines_y)))
    }

    /// Applies a brush-setting action. Returns `false` for actions that do
    /// not touch the configuration.
    pub fn apply(self, config: &mut BrushConfig) -> bool {
        match self {
            Action::ScaleSize(f) => config.set_size(config.size() * f),
            Action::AdjustHardness(d) => config.set_hardness(config.hardness() + d),
            Action::AdjustOpacity(d) => config.set_opacity(config.opacity() + d),
            Action::AdjustSmoothing(d) => config.set_smoothing(config.smoothing() + d),
            Action::Swatch(i) => match SWATCHES.get(i) {
                Some(c) => config.set_color(*c),
                None => return false,
            },
            Action::Undo | Action::Redo | Action::Clear | Action::Exit => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        if cfg!(target_os = "macos") {
            Modifiers { meta: true, ..Default::default() }
        } else {
            Modifiers { ctrl: true, ..Default::default() }
        }
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn history_shortcuts() {
        let shift = Modifiers { shift: true, ..ctrl() };
        assert_eq!(Action::for_key(Key::Z, ctrl()), Some(Action::Undo));
        assert_eq!(Action::for_key(Key::Z, shift), Some(Action::Redo));
        assert_eq!(Action::for_key(Key::Y, ctrl()), Some(Action::Redo));
        assert_eq!(Action::for_key(Key::C, ctrl()), None);
    }

    #[test]
    fn plain_z_does_nothing() {
        assert_eq!(Action::for_key(Key::Z, Modifiers::default()), None);
    }

    #[test]
    fn clear_keys() {
        for key in [Key::C, Key::Delete, Key::Backspace] {
            assert_eq!(Action::for_key(key, Modifiers::default()), Some(Action::Clear));
        }
    }

    #[test]
    fn shift_inverts_unit_steps() {
        let shift = Modifiers { shift: true, ..Default::default() };
        assert_eq!(Action::for_key(Key::H, Modifiers::default()), Some(Action::AdjustHardness(0.1)));
        assert_eq!(Action::for_key(Key::H, shift), Some(Action::AdjustHardness(-0.1)));
    }

    #[test]
    fn digit_row_selects_swatches() {
        assert_eq!(Action::for_key(Key::Digit1, Modifiers::default()), Some(Action::Swatch(0)));
        assert_eq!(Action::for_key(Key::Digit0, Modifiers::default()), Some(Action::Swatch(9)));
    }

    // ── config ────────────────────────────────────────────────────────────

    #[test]
    fn brackets_scale_size() {
        let mut config = BrushConfig::default();
        config.set_size(32.0);
        assert!(Action::ScaleSize(SIZE_STEP).apply(&mut config));
        assert_eq!(config.size(), 40.0);
        Action::ScaleSize(1.0 / SIZE_STEP).apply(&mut config);
        assert!((config.size() - 32.0).abs() < 1e-4);
    }

    #[test]
    fn adjustments_stay_clamped() {
        let mut config = BrushConfig::default();
        for _ in 0..20 {
            Action::AdjustOpacity(UNIT_STEP).apply(&mut config);
            Action::AdjustSmoothing(UNIT_STEP).apply(&mut config);
        }
        assert_eq!(config.opacity(), 1.0);
        assert!(config.smoothing() <= gouache_brush::config::MAX_SMOOTHING);
    }

    #[test]
    fn wheel_scales_size() {
        assert_eq!(Action::for_wheel(0.0), None);
        let Some(Action::ScaleSize(f)) = Action::for_wheel(1.0) else {
            panic!("expected a size action");
        };
        assert!((f - WHEEL_SIZE_STEP).abs() < 1e-6);
    }

    #[test]
    fn history_actions_leave_config_alone() {
        let mut config = BrushConfig::default();
        let before = config;
        assert!(!Action::Undo.apply(&mut config));
        assert_eq!(config, before);
    }

    #[test]
    fn swatch_sets_color() {
        let mut config = BrushConfig::default();
        Action::Swatch(2).apply(&mut config);
        assert_eq!(config.color(), SWATCHES[2]);
    }
}
