//! Rotors: a wiring permutation plus a rotational setting.
//!
//! The three kinds share state and differ only in stepping behavior, so they
//! are one struct with a [`RotorKind`] sum type rather than a trait hierarchy;
//! `advance`/`at_notch` match on the kind exhaustively.

use crate::error::Error;
use crate::permutation::Permutation;

/// Per-kind stepping behavior of a [`Rotor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RotorKind {
    /// Fixed at setting 0, never advances; wiring must be a derangement.
    Reflector,
    /// Holds a setting but never advances and carries no notches.
    Fixed,
    /// Advances one position per pawl engagement; `notches` are the settings
    /// (as alphabet indices) at which it engages the pawl to its left.
    Moving { notches: Vec<usize> },
}

/// One rotor: a named wiring with a current rotational offset.
///
/// The wiring permutation is built once and represents all rotational
/// positions: `convert_forward`/`convert_backward` shift the contact by the
/// current setting, run the wiring, and shift back, all modulo alphabet size.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    wiring: Permutation,
    setting: usize,
    kind: RotorKind,
}

impl Rotor {
    /// A reflector. Fails with [`Error::ReflectorNotDerangement`] if the
    /// wiring maps any symbol to itself.
    pub fn reflector(name: &str, wiring: Permutation) -> Result<Self, Error> {
        if !wiring.derangement() {
            return Err(Error::ReflectorNotDerangement(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            wiring,
            setting: 0,
            kind: RotorKind::Reflector,
        })
    }

    /// A non-rotating rotor with a settable offset.
    pub fn fixed(name: &str, wiring: Permutation) -> Self {
        Self {
            name: name.to_string(),
            wiring,
            setting: 0,
            kind: RotorKind::Fixed,
        }
    }

    /// A moving rotor whose notches sit at the given symbols.
    pub fn moving(name: &str, wiring: Permutation, notches: &str) -> Result<Self, Error> {
        let alphabet = wiring.alphabet().clone();
        let notches = notches
            .chars()
            .map(|c| alphabet.to_int(c))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            name: name.to_string(),
            wiring,
            setting: 0,
            kind: RotorKind::Moving { notches },
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &RotorKind {
        &self.kind
    }

    /// Current rotational setting, always in `0..size`.
    pub fn setting(&self) -> usize {
        self.setting
    }

    /// Alphabet size this rotor operates over.
    pub fn size(&self) -> usize {
        self.wiring.size()
    }

    /// Set the rotational offset by index.
    pub fn set(&mut self, position: usize) -> Result<(), Error> {
        if position >= self.size() {
            return Err(Error::OutOfRange {
                index: position,
                size: self.size(),
            });
        }
        self.setting = position;
        Ok(())
    }

    /// Set the rotational offset by symbol.
    pub fn set_char(&mut self, c: char) -> Result<(), Error> {
        let position = self.wiring.alphabet().to_int(c)?;
        self.set(position)
    }

    /// Whether the current setting sits at a notch. Only a moving rotor can.
    pub fn at_notch(&self) -> bool {
        match &self.kind {
            RotorKind::Moving { notches } => notches.contains(&self.setting),
            RotorKind::Reflector | RotorKind::Fixed => false,
        }
    }

    /// Advance one position. No-op except for moving rotors.
    pub fn advance(&mut self) {
        if let RotorKind::Moving { .. } = self.kind {
            self.setting = (self.setting + 1) % self.size();
        }
    }

    /// Signal entering from the right: shift by the setting, run the wiring
    /// forward, shift back.
    pub fn convert_forward(&self, p: usize) -> usize {
        let s = self.setting as isize;
        let contact = self.wiring.permute(p as isize + s);
        self.wiring.wrap(contact as isize - s)
    }

    /// Signal returning from the left: same contact shift around the inverse
    /// wiring.
    pub fn convert_backward(&self, c: usize) -> usize {
        let s = self.setting as isize;
        let contact = self.wiring.invert(c as isize + s);
        self.wiring.wrap(contact as isize - s)
    }
}
