//! Mouthpiece button-state codec.
//!
//! A Quadstick mouthpiece action is a combination of lip switches (left,
//! center, right), an airflow direction (sip or puff) and an optional
//! "soft" intensity. The set of valid combinations is a fixed enumeration:
//! a token either appears in [`CANONICAL_TABLE`] or it is plain text.

use serde::Serialize;
use std::fmt;

/// Five-bit encoding `[left, center, right, puff, soft]` of a button state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ButtonStateVector {
    /// Left lip switch
    pub left: bool,
    /// Center lip switch
    pub center: bool,
    /// Right lip switch
    pub right: bool,
    /// Airflow direction: `true` for puff, `false` for sip
    pub puff: bool,
    /// Soft (low pressure) variant
    pub soft: bool,
}

impl ButtonStateVector {
    /// Builds a vector from its bit representation (non-zero is set).
    #[must_use]
    pub const fn from_bits(bits: [u8; 5]) -> Self {
        Self {
            left: bits[0] != 0,
            center: bits[1] != 0,
            right: bits[2] != 0,
            puff: bits[3] != 0,
            soft: bits[4] != 0,
        }
    }

    /// Returns the bit representation.
    #[must_use]
    pub const fn bits(self) -> [u8; 5] {
        [
            self.left as u8,
            self.center as u8,
            self.right as u8,
            self.puff as u8,
            self.soft as u8,
        ]
    }

    /// The three lip switches in drawing order.
    #[must_use]
    pub const fn switches(self) -> [bool; 3] {
        [self.left, self.center, self.right]
    }
}

impl fmt::Display for ButtonStateVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [l, c, r, p, s] = self.bits();
        write!(f, "[{l}, {c}, {r}, {p}, {s}]")
    }
}

/// Every registered button-state token and its vector.
pub const CANONICAL_TABLE: [(&str, ButtonStateVector); 24] = [
    ("mp_left_sip", ButtonStateVector::from_bits([1, 0, 0, 0, 0])),
    ("mp_left_puff", ButtonStateVector::from_bits([1, 0, 0, 1, 0])),
    ("mp_left_sip_soft", ButtonStateVector::from_bits([1, 0, 0, 0, 1])),
    ("mp_left_puff_soft", ButtonStateVector::from_bits([1, 0, 0, 1, 1])),
    ("mp_center_sip", ButtonStateVector::from_bits([0, 1, 0, 0, 0])),
    ("mp_center_puff", ButtonStateVector::from_bits([0, 1, 0, 1, 0])),
    ("mp_center_sip_soft", ButtonStateVector::from_bits([0, 1, 0, 0, 1])),
    ("mp_center_puff_soft", ButtonStateVector::from_bits([0, 1, 0, 1, 1])),
    ("mp_right_sip", ButtonStateVector::from_bits([0, 0, 1, 0, 0])),
    ("mp_right_puff", ButtonStateVector::from_bits([0, 0, 1, 1, 0])),
    ("mp_right_sip_soft", ButtonStateVector::from_bits([0, 0, 1, 0, 1])),
    ("mp_right_puff_soft", ButtonStateVector::from_bits([0, 0, 1, 1, 1])),
    ("mp_left_center_sip", ButtonStateVector::from_bits([1, 1, 0, 0, 0])),
    ("mp_left_center_puff", ButtonStateVector::from_bits([1, 1, 0, 1, 0])),
    ("mp_left_center_sip_soft", ButtonStateVector::from_bits([1, 1, 0, 0, 1])),
    ("mp_left_center_puff_soft", ButtonStateVector::from_bits([1, 1, 0, 1, 1])),
    ("mp_right_center_sip", ButtonStateVector::from_bits([0, 1, 1, 0, 0])),
    ("mp_right_center_puff", ButtonStateVector::from_bits([0, 1, 1, 1, 0])),
    ("mp_right_center_sip_soft", ButtonStateVector::from_bits([0, 1, 1, 0, 1])),
    ("mp_right_center_puff_soft", ButtonStateVector::from_bits([0, 1, 1, 1, 1])),
    ("mp_triple_sip", ButtonStateVector::from_bits([1, 1, 1, 0, 0])),
    ("mp_triple_puff", ButtonStateVector::from_bits([1, 1, 1, 1, 0])),
    ("mp_triple_sip_soft", ButtonStateVector::from_bits([1, 1, 1, 0, 1])),
    ("mp_triple_puff_soft", ButtonStateVector::from_bits([1, 1, 1, 1, 1])),
];

/// Looks up a canonical token. `None` means "draw the code as text".
#[must_use]
pub fn decode(token: &str) -> Option<ButtonStateVector> {
    CANONICAL_TABLE
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, vector)| *vector)
}

/// Iterates over all canonical tokens in table order.
pub fn canonical_tokens() -> impl Iterator<Item = &'static str> {
    CANONICAL_TABLE.iter().map(|(name, _)| *name)
}
