use crate::command::Command;
use crate::input::keys::LogicalKey;
use crate::input::state::InputState;

/// Turn the held keys into at most one command for this frame.
///
/// Jump wins over movement. Directional keys each contribute ±1: forward is
/// `-z`, back `+z`, left `-x`, right `+x`. Opposing keys cancel, and zero
/// intent yields `None` rather than a zero-length move.
pub fn resolve(state: &InputState) -> Option<Command> {
    if state.is_held(LogicalKey::Jump) {
        return Some(Command::Jump);
    }

    let axis = |neg: LogicalKey, pos: LogicalKey| -> f32 {
        let mut v = 0.0;
        if state.is_held(neg) {
            v -= 1.0;
        }
        if state.is_held(pos) {
            v += 1.0;
        }
        v
    };

    let dx = axis(LogicalKey::Left, LogicalKey::Right);
    let dz = axis(LogicalKey::Forward, LogicalKey::Back);

    if dx == 0.0 && dz == 0.0 {
        None
    } else {
        Some(Command::Move { dx, dz })
    }
}
