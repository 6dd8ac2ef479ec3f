use serde::{Deserialize, Serialize};

/// Key state sampled once at the start of a tick. Most recent state wins;
/// nothing is queued between ticks.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
    pub reset: bool,
}

pub const INPUT_UP: u8 = 0x01;
pub const INPUT_DOWN: u8 = 0x02;
pub const INPUT_LEFT: u8 = 0x04;
pub const INPUT_RIGHT: u8 = 0x08;
pub const INPUT_FIRE: u8 = 0x10;
pub const INPUT_RESET: u8 = 0x20;
pub const INPUT_RESERVED_MASK: u8 = 0xC0;

#[inline]
pub fn encode_input_byte(input: FrameInput) -> u8 {
    (if input.up { INPUT_UP } else { 0 })
        | (if input.down { INPUT_DOWN } else { 0 })
        | (if input.left { INPUT_LEFT } else { 0 })
        | (if input.right { INPUT_RIGHT } else { 0 })
        | (if input.fire { INPUT_FIRE } else { 0 })
        | (if input.reset { INPUT_RESET } else { 0 })
}

/// Reserved bits are ignored here; recorded streams are checked separately
/// with [`first_reserved_input`].
#[inline]
pub fn decode_input_byte(byte: u8) -> FrameInput {
    FrameInput {
        up: (byte & INPUT_UP) != 0,
        down: (byte & INPUT_DOWN) != 0,
        left: (byte & INPUT_LEFT) != 0,
        right: (byte & INPUT_RIGHT) != 0,
        fire: (byte & INPUT_FIRE) != 0,
        reset: (byte & INPUT_RESET) != 0,
    }
}

/// Index and value of the first byte in a recorded stream with reserved bits
/// set.
pub fn first_reserved_input(inputs: &[u8]) -> Option<(usize, u8)> {
    inputs
        .iter()
        .enumerate()
        .find(|(_, byte)| (**byte & INPUT_RESERVED_MASK) != 0)
        .map(|(index, byte)| (index, *byte))
}
