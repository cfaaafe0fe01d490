// Activation input: one button that flaps mid-round and restarts after a crash.
use crate::game::GameState;

/// `KeyboardEvent.code` of the activation key.
pub const ACTIVATION_KEY: &str = "Space";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputOutcome {
    Jumped,
    Restarted,
}

/// Whether a keydown should count as an activation (and have its default
/// scrolling suppressed).
pub fn is_activation_key(code: &str) -> bool {
    code == ACTIVATION_KEY
}

pub fn activate(state: &mut GameState) -> InputOutcome {
    if state.is_game_over() {
        state.restart();
        InputOutcome::Restarted
    } else {
        state.jump();
        InputOutcome::Jumped
    }
}
