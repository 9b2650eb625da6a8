//! The machine: an ordered rotor stack, a plugboard, and the stepping rule.
//!
//! Slot 0 holds the reflector and the last slot the fast rotor. Pawls sit
//! behind the rightmost `num_pawls` slots; each keystroke first advances the
//! stack as one atomic batch (decided from a snapshot of notch positions, so
//! the double-step anomaly falls out naturally), then routes the signal
//! plugboard → rotors right-to-left → reflector → rotors left-to-right →
//! plugboard.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorKind};

/// Per-keystroke state handed to a [`StepObserver`], all values alphabet
/// indices. `settings` covers slots `1..num_rotors` after advancement.
#[derive(Debug, Clone)]
pub struct StepEvent {
    pub settings: Vec<usize>,
    pub input: usize,
    pub plugged: usize,
    pub output: usize,
}

/// Observation seam for per-keystroke tracing. The engine itself never
/// writes to a stream; install an observer to see each step.
pub trait StepObserver {
    fn on_step(&mut self, event: &StepEvent);
}

/// A complete rotor machine: rotor catalog, inserted stack, and plugboard.
pub struct Machine {
    alphabet: Arc<Alphabet>,
    num_rotors: usize,
    num_pawls: usize,
    catalog: Vec<Rotor>,
    inserted: Vec<Rotor>,
    plugboard: Permutation,
    observer: Option<Box<dyn StepObserver>>,
}

impl Machine {
    /// A machine with `num_rotors` slots, of which the rightmost `num_pawls`
    /// are pawl-driven, drawing rotors from `catalog`.
    ///
    /// Fails with [`Error::BadRotorCounts`] unless `0 < num_pawls <= num_rotors`.
    pub fn new(
        alphabet: Arc<Alphabet>,
        num_rotors: usize,
        num_pawls: usize,
        catalog: Vec<Rotor>,
    ) -> Result<Self, Error> {
        if num_pawls == 0 || num_pawls > num_rotors {
            return Err(Error::BadRotorCounts {
                rotors: num_rotors,
                pawls: num_pawls,
            });
        }
        let plugboard = Permutation::identity(alphabet.clone());
        Ok(Self {
            alphabet,
            num_rotors,
            num_pawls,
            catalog,
            inserted: Vec::new(),
            plugboard,
            observer: None,
        })
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn num_rotors(&self) -> usize {
        self.num_rotors
    }

    pub fn num_pawls(&self) -> usize {
        self.num_pawls
    }

    /// The rotor in slot `k` (0 = reflector, `num_rotors - 1` = fast rotor).
    #[allow(dead_code)]
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.inserted.get(k)
    }

    /// Install a per-keystroke observer, replacing any previous one.
    pub fn set_observer(&mut self, observer: Option<Box<dyn StepObserver>>) {
        self.observer = observer;
    }

    /// Replace the inserted rotor stack with the named catalog rotors, all
    /// reset to setting 0. `names[0]` must name a reflector.
    pub fn insert_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<(), Error> {
        if names.len() != self.num_rotors {
            return Err(Error::WrongSlotCount {
                expected: self.num_rotors,
                got: names.len(),
            });
        }
        let mut stack = Vec::with_capacity(self.num_rotors);
        for (slot, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let rotor = self
                .catalog
                .iter()
                .find(|r| r.name() == name)
                .ok_or_else(|| Error::UnknownRotor(name.to_string()))?;
            if stack.iter().any(|r: &Rotor| r.name() == name) {
                return Err(Error::DuplicateRotor(name.to_string()));
            }
            if slot == 0 && !matches!(rotor.kind(), RotorKind::Reflector) {
                return Err(Error::MisplacedReflector(name.to_string()));
            }
            let mut rotor = rotor.clone();
            rotor.set(0)?;
            stack.push(rotor);
        }
        self.inserted = stack;
        Ok(())
    }

    /// Set slots `1..num_rotors` from a string of `num_rotors - 1` symbols,
    /// leftmost first. The reflector slot is never set.
    pub fn set_rotors(&mut self, setting: &str) -> Result<(), Error> {
        if self.inserted.len() != self.num_rotors {
            return Err(Error::WrongSlotCount {
                expected: self.num_rotors,
                got: self.inserted.len(),
            });
        }
        let symbols: Vec<char> = setting.chars().collect();
        if symbols.len() != self.num_rotors - 1 {
            return Err(Error::BadSettingLength {
                expected: self.num_rotors - 1,
                got: symbols.len(),
            });
        }
        for (i, &c) in symbols.iter().enumerate() {
            self.inserted[i + 1].set_char(c)?;
        }
        Ok(())
    }

    /// Replace the plugboard wholesale. It need not be a derangement;
    /// self-mapped symbols mean "not plugged".
    pub fn set_plugboard(&mut self, plugboard: Permutation) {
        self.plugboard = plugboard;
    }

    /// Advance the stack for one keystroke, as a single atomic batch.
    ///
    /// With `first = num_rotors - num_pawls` the leftmost pawl-driven slot:
    /// the fast rotor always advances; each pawl-driven slot with a right
    /// neighbor at a notch advances and drags that neighbor with it (the
    /// pawl falls through the notch — the double-step). All notch checks use
    /// the settings prior to any advancement this keystroke. Slot 0 never
    /// advances.
    fn advance_rotors(&mut self) {
        let n = self.inserted.len();
        if n == 0 {
            return;
        }
        let at_notch: Vec<bool> = self.inserted.iter().map(Rotor::at_notch).collect();
        let mut advancing = vec![false; n];
        advancing[n - 1] = true;
        let first = (self.num_rotors - self.num_pawls).max(1);
        for k in first..n - 1 {
            if at_notch[k + 1] {
                advancing[k] = true;
                advancing[k + 1] = true;
            }
        }
        for (rotor, advance) in self.inserted.iter_mut().zip(advancing) {
            if advance {
                rotor.advance();
            }
        }
    }

    /// Route one index through the rotor stack (no stepping).
    fn apply_rotors(&self, mut c: usize) -> usize {
        for rotor in self.inserted.iter().rev() {
            c = rotor.convert_forward(c);
        }
        for rotor in self.inserted.iter().skip(1) {
            c = rotor.convert_backward(c);
        }
        c
    }

    /// Convert one index, advancing the machine first. Not idempotent: every
    /// call moves the rotor stack.
    pub fn convert(&mut self, c: usize) -> Result<usize, Error> {
        if c >= self.alphabet.size() {
            return Err(Error::OutOfRange {
                index: c,
                size: self.alphabet.size(),
            });
        }
        self.advance_rotors();
        let plugged = self.plugboard.permute(c as isize);
        let through = self.apply_rotors(plugged);
        let output = self.plugboard.permute(through as isize);
        if let Some(observer) = self.observer.as_mut() {
            let event = StepEvent {
                settings: self.inserted.iter().skip(1).map(Rotor::setting).collect(),
                input: c,
                plugged,
                output,
            };
            observer.on_step(&event);
        }
        Ok(output)
    }

    /// Convert a whole message, threading rotor state across it. Fails with
    /// [`Error::SymbolNotInAlphabet`] on the first foreign symbol, before
    /// anything is produced for it.
    pub fn convert_message(&mut self, msg: &str) -> Result<String, Error> {
        let mut out = String::with_capacity(msg.len());
        for c in msg.chars() {
            let index = self
                .alphabet
                .to_int(c)
                .map_err(|_| Error::SymbolNotInAlphabet(c))?;
            let converted = self.convert(index)?;
            out.push(self.alphabet.to_char(converted)?);
        }
        Ok(out)
    }

    /// Current settings of slots `1..num_rotors` as symbols (the operator's
    /// window view).
    #[allow(dead_code)]
    pub fn window(&self) -> Result<String, Error> {
        self.inserted
            .iter()
            .skip(1)
            .map(|r| self.alphabet.to_char(r.setting()))
            .collect()
    }
}
