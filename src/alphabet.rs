//! Symbol alphabet shared by every permutation and rotor.

use crate::error::Error;

/// Characters reserved by the configuration grammar, never valid as symbols.
const RESERVED: [char; 3] = ['(', ')', '*'];

/// An immutable, ordered, duplicate-free set of symbols defining the
/// bijection between symbol and index `0..size`.
///
/// Constructed once from configuration text and shared read-only (behind an
/// `Arc`) by every permutation and rotor of a machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from its symbols in order.
    ///
    /// Fails if a symbol repeats, is whitespace, or is one of the reserved
    /// grammar characters `(`, `)`, `*`.
    pub fn new(symbols: &str) -> Result<Self, Error> {
        let mut chars = Vec::new();
        for c in symbols.chars() {
            if c.is_whitespace() {
                return Err(Error::InvalidAlphabet(
                    "whitespace is not a valid symbol".to_string(),
                ));
            }
            if RESERVED.contains(&c) {
                return Err(Error::InvalidAlphabet(format!(
                    "'{c}' is reserved by the configuration grammar"
                )));
            }
            if chars.contains(&c) {
                return Err(Error::InvalidAlphabet(format!("duplicate symbol '{c}'")));
            }
            chars.push(c);
        }
        if chars.is_empty() {
            return Err(Error::InvalidAlphabet("alphabet is empty".to_string()));
        }
        Ok(Self { chars })
    }

    /// Number of symbols.
    pub fn size(&self) -> usize {
        self.chars.len()
    }

    /// Whether `c` is one of the symbols.
    #[allow(dead_code)]
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Symbol at `index`.
    pub fn to_char(&self, index: usize) -> Result<char, Error> {
        self.chars.get(index).copied().ok_or(Error::OutOfRange {
            index,
            size: self.size(),
        })
    }

    /// Index of symbol `c`.
    pub fn to_int(&self, c: char) -> Result<usize, Error> {
        self.chars
            .iter()
            .position(|&s| s == c)
            .ok_or(Error::NotInAlphabet(c))
    }
}
