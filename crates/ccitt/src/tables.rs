//! # Code tables
//!
//! The run length code words of ITU-T T.4 (Tables 2/T.4 and 3/T.4) and the
//! 2D mode code words of T.6 (Table 1/T.6), compiled into binary tries at
//! build time.

use crate::Color;

/// Longest code word of the run length tables
pub const MAX_RUN_CODE_LEN: u8 = 13;

/// `000000000001`
pub const EOL: u32 = 0x001;
/// Length of [`EOL`] in bits
pub const EOL_LEN: u8 = 12;

// Trie encoding:
// - 0x0000-0x7FFF: next node index
// - VALUE_FLAG | value: code word complete
// - INVALID: no code word continues this way
const VALUE_FLAG: u16 = 0x8000;
const VALUE_MASK: u16 = 0x1FFF;
const INVALID: u16 = 0xFFFF;

/// (run length or mode id, code length, code)
type Entry = (u16, u8, u16);

/// Table 2/T.4 - White terminating codes.
pub(crate) const WHITE_TERMINATING: [Entry; 64] = [
    (0, 8, 0b00110101),
    (1, 6, 0b000111),
    (2, 4, 0b0111),
    (3, 4, 0b1000),
    (4, 4, 0b1011),
    (5, 4, 0b1100),
    (6, 4, 0b1110),
    (7, 4, 0b1111),
    (8, 5, 0b10011),
    (9, 5, 0b10100),
    (10, 5, 0b00111),
    (11, 5, 0b01000),
    (12, 6, 0b001000),
    (13, 6, 0b000011),
    (14, 6, 0b110100),
    (15, 6, 0b110101),
    (16, 6, 0b101010),
    (17, 6, 0b101011),
    (18, 7, 0b0100111),
    (19, 7, 0b0001100),
    (20, 7, 0b0001000),
    (21, 7, 0b0010111),
    (22, 7, 0b0000011),
    (23, 7, 0b0000100),
    (24, 7, 0b0101000),
    (25, 7, 0b0101011),
    (26, 7, 0b0010011),
    (27, 7, 0b0100100),
    (28, 7, 0b0011000),
    (29, 8, 0b00000010),
    (30, 8, 0b00000011),
    (31, 8, 0b00011010),
    (32, 8, 0b00011011),
    (33, 8, 0b00010010),
    (34, 8, 0b00010011),
    (35, 8, 0b00010100),
    (36, 8, 0b00010101),
    (37, 8, 0b00010110),
    (38, 8, 0b00010111),
    (39, 8, 0b00101000),
    (40, 8, 0b00101001),
    (41, 8, 0b00101010),
    (42, 8, 0b00101011),
    (43, 8, 0b00101100),
    (44, 8, 0b00101101),
    (45, 8, 0b00000100),
    (46, 8, 0b00000101),
    (47, 8, 0b00001010),
    (48, 8, 0b00001011),
    (49, 8, 0b01010010),
    (50, 8, 0b01010011),
    (51, 8, 0b01010100),
    (52, 8, 0b01010101),
    (53, 8, 0b00100100),
    (54, 8, 0b00100101),
    (55, 8, 0b01011000),
    (56, 8, 0b01011001),
    (57, 8, 0b01011010),
    (58, 8, 0b01011011),
    (59, 8, 0b01001010),
    (60, 8, 0b01001011),
    (61, 8, 0b00110010),
    (62, 8, 0b00110011),
    (63, 8, 0b00110100),
];

/// Table 3a/T.4 - White make-up codes.
pub(crate) const WHITE_MAKEUP: [Entry; 27] = [
    (64, 5, 0b11011),
    (128, 5, 0b10010),
    (192, 6, 0b010111),
    (256, 7, 0b0110111),
    (320, 8, 0b00110110),
    (384, 8, 0b00110111),
    (448, 8, 0b01100100),
    (512, 8, 0b01100101),
    (576, 8, 0b01101000),
    (640, 8, 0b01100111),
    (704, 9, 0b011001100),
    (768, 9, 0b011001101),
    (832, 9, 0b011010010),
    (896, 9, 0b011010011),
    (960, 9, 0b011010100),
    (1024, 9, 0b011010101),
    (1088, 9, 0b011010110),
    (1152, 9, 0b011010111),
    (1216, 9, 0b011011000),
    (1280, 9, 0b011011001),
    (1344, 9, 0b011011010),
    (1408, 9, 0b011011011),
    (1472, 9, 0b010011000),
    (1536, 9, 0b010011001),
    (1600, 9, 0b010011010),
    (1664, 6, 0b011000),
    (1728, 9, 0b010011011),
];

/// Table 2/T.4 - Black terminating codes.
pub(crate) const BLACK_TERMINATING: [Entry; 64] = [
    (0, 10, 0b0000110111),
    (1, 3, 0b010),
    (2, 2, 0b11),
    (3, 2, 0b10),
    (4, 3, 0b011),
    (5, 4, 0b0011),
    (6, 4, 0b0010),
    (7, 5, 0b00011),
    (8, 6, 0b000101),
    (9, 6, 0b000100),
    (10, 7, 0b0000100),
    (11, 7, 0b0000101),
    (12, 7, 0b0000111),
    (13, 8, 0b00000100),
    (14, 8, 0b00000111),
    (15, 9, 0b000011000),
    (16, 10, 0b0000010111),
    (17, 10, 0b0000011000),
    (18, 10, 0b0000001000),
    (19, 11, 0b00001100111),
    (20, 11, 0b00001101000),
    (21, 11, 0b00001101100),
    (22, 11, 0b00000110111),
    (23, 11, 0b00000101000),
    (24, 11, 0b00000010111),
    (25, 11, 0b00000011000),
    (26, 12, 0b000011001010),
    (27, 12, 0b000011001011),
    (28, 12, 0b000011001100),
    (29, 12, 0b000011001101),
    (30, 12, 0b000001101000),
    (31, 12, 0b000001101001),
    (32, 12, 0b000001101010),
    (33, 12, 0b000001101011),
    (34, 12, 0b000011010010),
    (35, 12, 0b000011010011),
    (36, 12, 0b000011010100),
    (37, 12, 0b000011010101),
    (38, 12, 0b000011010110),
    (39, 12, 0b000011010111),
    (40, 12, 0b000001101100),
    (41, 12, 0b000001101101),
    (42, 12, 0b000011011010),
    (43, 12, 0b000011011011),
    (44, 12, 0b000001010100),
    (45, 12, 0b000001010101),
    (46, 12, 0b000001010110),
    (47, 12, 0b000001010111),
    (48, 12, 0b000001100100),
    (49, 12, 0b000001100101),
    (50, 12, 0b000001010010),
    (51, 12, 0b000001010011),
    (52, 12, 0b000000100100),
    (53, 12, 0b000000110111),
    (54, 12, 0b000000111000),
    (55, 12, 0b000000100111),
    (56, 12, 0b000000101000),
    (57, 12, 0b000001011000),
    (58, 12, 0b000001011001),
    (59, 12, 0b000000101011),
    (60, 12, 0b000000101100),
    (61, 12, 0b000001011010),
    (62, 12, 0b000001100110),
    (63, 12, 0b000001100111),
];

/// Table 3a/T.4 - Black make-up codes.
pub(crate) const BLACK_MAKEUP: [Entry; 27] = [
    (64, 10, 0b0000001111),
    (128, 12, 0b000011001000),
    (192, 12, 0b000011001001),
    (256, 12, 0b000001011011),
    (320, 12, 0b000000110011),
    (384, 12, 0b000000110100),
    (448, 12, 0b000000110101),
    (512, 13, 0b0000001101100),
    (576, 13, 0b0000001101101),
    (640, 13, 0b0000001001010),
    (704, 13, 0b0000001001011),
    (768, 13, 0b0000001001100),
    (832, 13, 0b0000001001101),
    (896, 13, 0b0000001110010),
    (960, 13, 0b0000001110011),
    (1024, 13, 0b0000001110100),
    (1088, 13, 0b0000001110101),
    (1152, 13, 0b0000001110110),
    (1216, 13, 0b0000001110111),
    (1280, 13, 0b0000001010010),
    (1344, 13, 0b0000001010011),
    (1408, 13, 0b0000001010100),
    (1472, 13, 0b0000001010101),
    (1536, 13, 0b0000001011010),
    (1600, 13, 0b0000001011011),
    (1664, 13, 0b0000001100100),
    (1728, 13, 0b0000001100101),
];

/// Table 3b/T.4 - Extended make-up codes, shared by both colors.
pub(crate) const EXTENDED_MAKEUP: [Entry; 13] = [
    (1792, 11, 0b00000001000),
    (1856, 11, 0b00000001100),
    (1920, 11, 0b00000001101),
    (1984, 12, 0b000000010010),
    (2048, 12, 0b000000010011),
    (2112, 12, 0b000000010100),
    (2176, 12, 0b000000010101),
    (2240, 12, 0b000000010110),
    (2304, 12, 0b000000010111),
    (2368, 12, 0b000000011100),
    (2432, 12, 0b000000011101),
    (2496, 12, 0b000000011110),
    (2560, 12, 0b000000011111),
];

pub(crate) const MODE_PASS: u16 = 0;
pub(crate) const MODE_HORIZONTAL: u16 = 1;
pub(crate) const MODE_V0: u16 = 2;
pub(crate) const MODE_VR1: u16 = 3;
pub(crate) const MODE_VR2: u16 = 4;
pub(crate) const MODE_VR3: u16 = 5;
pub(crate) const MODE_VL1: u16 = 6;
pub(crate) const MODE_VL2: u16 = 7;
pub(crate) const MODE_VL3: u16 = 8;
pub(crate) const MODE_EXT_2D: u16 = 9;
pub(crate) const MODE_EXT_1D: u16 = 10;

/// Table 1/T.6 - Code words of the 2D modes.
pub(crate) const MODE_CODES: [Entry; 11] = [
    (MODE_PASS, 4, 0b0001),
    (MODE_HORIZONTAL, 3, 0b001),
    (MODE_V0, 1, 0b1),
    (MODE_VR1, 3, 0b011),
    (MODE_VR2, 6, 0b000011),
    (MODE_VR3, 7, 0b0000011),
    (MODE_VL1, 3, 0b010),
    (MODE_VL2, 6, 0b000010),
    (MODE_VL3, 7, 0b0000010),
    (MODE_EXT_2D, 7, 0b0000001),
    (MODE_EXT_1D, 7, 0b0000000),
];

#[derive(Clone, Copy)]
struct Node {
    on_0: u16,
    on_1: u16,
}

impl Node {
    const fn new() -> Self {
        Self {
            on_0: INVALID,
            on_1: INVALID,
        }
    }
}

const fn insert<const N: usize>(nodes: &mut [Node; N], mut len: usize, entry: Entry) -> usize {
    let (value, code_len, code) = entry;
    let mut node = 0;
    let mut i = 0;
    while i < code_len {
        let bit = (code >> (code_len - 1 - i)) & 1;
        let next = if bit == 0 {
            nodes[node].on_0
        } else {
            nodes[node].on_1
        };

        if i == code_len - 1 {
            let leaf = VALUE_FLAG | (value & VALUE_MASK);
            if bit == 0 {
                nodes[node].on_0 = leaf;
            } else {
                nodes[node].on_1 = leaf;
            }
        } else if next == INVALID {
            let fresh = len;
            len += 1;
            if bit == 0 {
                nodes[node].on_0 = fresh as u16;
            } else {
                nodes[node].on_1 = fresh as u16;
            }
            node = fresh;
        } else {
            // a leaf on the way would break prefix-freeness
            assert!(next & VALUE_FLAG == 0, "code table is not prefix-free");
            node = next as usize;
        }
        i += 1;
    }
    len
}

const fn insert_all<const N: usize>(nodes: &mut [Node; N], mut len: usize, entries: &[Entry]) -> usize {
    let mut i = 0;
    while i < entries.len() {
        len = insert(nodes, len, entries[i]);
        i += 1;
    }
    len
}

const fn build_runs<const N: usize>(terminating: &[Entry], makeup: &[Entry]) -> [Node; N] {
    let mut nodes = [Node::new(); N];
    let mut len = 1;
    len = insert_all(&mut nodes, len, terminating);
    len = insert_all(&mut nodes, len, makeup);
    let _ = insert_all(&mut nodes, len, &EXTENDED_MAKEUP);
    nodes
}

const fn build_modes<const N: usize>() -> [Node; N] {
    let mut nodes = [Node::new(); N];
    let _ = insert_all(&mut nodes, 1, &MODE_CODES);
    nodes
}

static WHITE_NODES: [Node; 128] = build_runs(&WHITE_TERMINATING, &WHITE_MAKEUP);
static BLACK_NODES: [Node; 128] = build_runs(&BLACK_TERMINATING, &BLACK_MAKEUP);
static MODE_NODES: [Node; 16] = build_modes();

/// Result of feeding one bit into a [`CodeTable`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Step {
    /// The bits so far are a proper prefix of some code word
    Partial,
    /// A code word is complete
    Match(u16),
    /// No code word starts with the bits so far
    Invalid,
}

/// A prefix-free code table walked one bit at a time
#[derive(Copy, Clone)]
pub struct CodeTable {
    nodes: &'static [Node],
}

/// White run lengths
pub static WHITE: CodeTable = CodeTable {
    nodes: &WHITE_NODES,
};
/// Black run lengths
pub static BLACK: CodeTable = CodeTable {
    nodes: &BLACK_NODES,
};
/// 2D mode words
pub static MODES: CodeTable = CodeTable { nodes: &MODE_NODES };

impl CodeTable {
    /// The run length table for a color
    pub fn runs(color: Color) -> &'static CodeTable {
        match color {
            Color::White => &WHITE,
            Color::Black => &BLACK,
        }
    }

    /// Advance `node` (0 at the start of a code word) by one bit
    #[inline]
    pub fn step(&self, node: &mut usize, bit: bool) -> Step {
        let state = &self.nodes[*node];
        let next = if bit { state.on_1 } else { state.on_0 };
        if next == INVALID {
            Step::Invalid
        } else if next & VALUE_FLAG != 0 {
            *node = 0;
            Step::Match(next & VALUE_MASK)
        } else {
            *node = next as usize;
            Step::Partial
        }
    }

    /// Look up a complete code word of the given length
    pub fn lookup(&self, len: u8, code: u32) -> Option<u16> {
        let mut node = 0;
        for i in (0..len).rev() {
            match self.step(&mut node, (code >> i) & 1 == 1) {
                Step::Partial => {}
                Step::Match(value) if i == 0 => return Some(value),
                Step::Match(_) | Step::Invalid => return None,
            }
        }
        None
    }
}

/// The terminating code word for a run of `run < 64` pixels, as (code, length)
///
/// # Panics
///
/// If `run` is 64 or more.
pub fn terminating_code(color: Color, run: usize) -> (u32, u8) {
    let table = match color {
        Color::White => &WHITE_TERMINATING,
        Color::Black => &BLACK_TERMINATING,
    };
    let (_, len, code) = table[run];
    (u32::from(code), len)
}

/// The make-up code word for a multiple of 64 up to 2560, as (code, length)
///
/// # Panics
///
/// If `run` is not a multiple of 64 in `64..=2560`. Release builds only
/// catch values outside the tables.
pub fn makeup_code(color: Color, run: usize) -> (u32, u8) {
    debug_assert!(run % 64 == 0 && (64..=2560).contains(&run));
    let (_, len, code) = if run <= 1728 {
        match color {
            Color::White => WHITE_MAKEUP[run / 64 - 1],
            Color::Black => BLACK_MAKEUP[run / 64 - 1],
        }
    } else {
        EXTENDED_MAKEUP[(run - 1792) / 64]
    };
    (u32::from(code), len)
}

/// The code word for a 2D mode id, as (code, length)
pub(crate) fn mode_code(id: u16) -> (u32, u8) {
    let (_, len, code) = MODE_CODES[usize::from(id)];
    (u32::from(code), len)
}
