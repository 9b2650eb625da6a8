//! Error types for the cipher engine and its configuration surface.
//!
//! Every variant is an eager contract violation, raised at the construction
//! site or setter/convert call where the contract breaks. Nothing here is
//! transient or retryable; the engine never substitutes or skips on error.

use thiserror::Error;

/// Errors raised by alphabet, permutation, rotor, and machine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // ── Alphabet ──
    #[error("invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("symbol '{0}' is not in the alphabet")]
    NotInAlphabet(char),

    #[error("index {index} out of range for alphabet of size {size}")]
    OutOfRange { index: usize, size: usize },

    // ── Permutation ──
    #[error("malformed cycle specification: {0}")]
    MalformedCycle(String),

    #[error("reflector '{0}' wiring maps a symbol to itself (not a derangement)")]
    ReflectorNotDerangement(String),

    // ── Machine configuration ──
    #[error("unknown rotor '{0}'")]
    UnknownRotor(String),

    #[error("rotor '{0}' inserted more than once")]
    DuplicateRotor(String),

    #[error("expected {expected} rotor names, got {got}")]
    WrongSlotCount { expected: usize, got: usize },

    #[error("initial setting must have {expected} symbols, got {got}")]
    BadSettingLength { expected: usize, got: usize },

    #[error("slot 0 must hold a reflector, '{0}' is not one")]
    MisplacedReflector(String),

    #[error("bad rotor/pawl counts: {rotors} rotors, {pawls} pawls")]
    BadRotorCounts { rotors: usize, pawls: usize },

    // ── Message conversion ──
    #[error("message symbol '{0}' is not in the alphabet")]
    SymbolNotInAlphabet(char),

    // ── Configuration file ──
    #[error("configuration file truncated: {0}")]
    ConfigTruncated(String),

    #[error("bad rotor description: {0}")]
    BadRotorDescription(String),

    #[error("unknown rotor type '{0}' (expected R, N, or M<notches>)")]
    UnknownRotorType(String),

    // ── Input processing ──
    #[error("input must start with a setting line (beginning with '*')")]
    MissingSettingLine,

    #[error("bad setting line: {0}")]
    BadSettingLine(String),
}
