//! Cycle-notation permutations with precomputed lookup tables.
//!
//! A permutation is specified as whitespace-separated parenthesized cycles,
//! e.g. `(AELTPHQXRU) (BKNW) (CMOY)`. Symbols absent from every cycle map to
//! themselves. Both directions are resolved into index tables once, at
//! construction, so `permute`/`invert` are single array lookups — the cycle
//! text is never scanned again after parsing.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::Error;

/// A bijection over the indices of an [`Alphabet`].
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parse `cycles` against `alphabet` and build the lookup tables.
    ///
    /// Fails with [`Error::MalformedCycle`] if a symbol repeats across the
    /// cycles, lies outside the alphabet, or the parenthesization is broken.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self, Error> {
        let size = alphabet.size();
        let mut forward: Vec<usize> = (0..size).collect();
        let mut seen = vec![false; size];

        let mut current: Option<Vec<usize>> = None;
        for c in cycles.chars() {
            match c {
                '(' => {
                    if current.is_some() {
                        return Err(Error::MalformedCycle(
                            "nested '(' in cycle specification".to_string(),
                        ));
                    }
                    current = Some(Vec::new());
                }
                ')' => {
                    let group = current.take().ok_or_else(|| {
                        Error::MalformedCycle("')' without matching '('".to_string())
                    })?;
                    // Resolve the cycle into successor pairs.
                    for (i, &from) in group.iter().enumerate() {
                        forward[from] = group[(i + 1) % group.len()];
                    }
                }
                c if c.is_whitespace() => {
                    if current.is_some() {
                        return Err(Error::MalformedCycle(
                            "whitespace inside a cycle".to_string(),
                        ));
                    }
                }
                c => {
                    let group = current.as_mut().ok_or_else(|| {
                        Error::MalformedCycle(format!("symbol '{c}' outside parentheses"))
                    })?;
                    let index = alphabet
                        .to_int(c)
                        .map_err(|_| Error::MalformedCycle(format!("'{c}' not in alphabet")))?;
                    if seen[index] {
                        return Err(Error::MalformedCycle(format!(
                            "symbol '{c}' appears more than once"
                        )));
                    }
                    seen[index] = true;
                    group.push(index);
                }
            }
        }
        if current.is_some() {
            return Err(Error::MalformedCycle("unterminated cycle".to_string()));
        }

        let mut inverse = vec![0usize; size];
        for (i, &f) in forward.iter().enumerate() {
            inverse[f] = i;
        }

        Ok(Self {
            alphabet,
            forward,
            inverse,
        })
    }

    /// The identity permutation (every symbol a fixed point). Used as the
    /// default plugboard.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let size = alphabet.size();
        Self {
            alphabet,
            forward: (0..size).collect(),
            inverse: (0..size).collect(),
        }
    }

    /// Size of the underlying alphabet.
    pub fn size(&self) -> usize {
        self.alphabet.size()
    }

    /// The alphabet this permutation operates over.
    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Reduce `p` modulo the alphabet size, mapping negative and over-range
    /// values into `0..size`. Rotor offset arithmetic relies on this.
    pub fn wrap(&self, p: isize) -> usize {
        p.rem_euclid(self.size() as isize) as usize
    }

    /// Apply the permutation to `p` (reduced modulo the alphabet size).
    pub fn permute(&self, p: isize) -> usize {
        self.forward[self.wrap(p)]
    }

    /// Apply the inverse permutation to `c` (reduced modulo the alphabet size).
    pub fn invert(&self, c: isize) -> usize {
        self.inverse[self.wrap(c)]
    }

    /// Symbol-typed [`Self::permute`].
    #[allow(dead_code)]
    pub fn permute_char(&self, p: char) -> Result<char, Error> {
        let index = self.alphabet.to_int(p)?;
        self.alphabet.to_char(self.forward[index])
    }

    /// Symbol-typed [`Self::invert`].
    #[allow(dead_code)]
    pub fn invert_char(&self, c: char) -> Result<char, Error> {
        let index = self.alphabet.to_int(c)?;
        self.alphabet.to_char(self.inverse[index])
    }

    /// True iff no index maps to itself. Required of reflector wirings.
    pub fn derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &f)| i != f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha(s: &str) -> Arc<Alphabet> {
        Arc::new(Alphabet::new(s).unwrap())
    }

    #[test]
    fn bijection_round_trip() {
        let a = alpha("ABCDEFGHIJKLMNOPQRSTUVWXYZ");
        let p = Permutation::new("(AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)", a).unwrap();
        for i in 0..26isize {
            assert_eq!(p.invert(p.permute(i) as isize) as isize, i);
            assert_eq!(p.permute(p.invert(i) as isize) as isize, i);
        }
    }

    #[test]
    fn absent_symbols_are_fixed_points() {
        let a = alpha("ABCDE");
        let p = Permutation::new("(AB)", a.clone()).unwrap();
        assert_eq!(p.permute(0), 1);
        assert_eq!(p.permute(1), 0);
        for i in 2..5 {
            assert_eq!(p.permute(i as isize), i);
        }
    }

    #[test]
    fn wrap_handles_negative_and_over_range() {
        let a = alpha("ABCDE");
        let p = Permutation::new("(ACBED)", a).unwrap();
        assert_eq!(p.permute(5), p.permute(0));
        assert_eq!(p.permute(-1), p.permute(4));
        assert_eq!(p.invert(12), p.invert(2));
        assert_eq!(p.wrap(-7), 3);
    }

    #[test]
    fn symbol_typed_overloads() {
        let a = alpha("ABCDE");
        let p = Permutation::new("(ACBED)", a).unwrap();
        assert_eq!(p.permute_char('A').unwrap(), 'C');
        assert_eq!(p.invert_char('C').unwrap(), 'A');
        assert!(matches!(p.permute_char('Z'), Err(Error::NotInAlphabet('Z'))));
    }

    #[test]
    fn derangement_detection() {
        let a = alpha("ABCDE");
        let fixed_point = Permutation::new("(AB) (CD)", a.clone()).unwrap();
        assert!(!fixed_point.derangement());
        let total = Permutation::new("(ABCDE)", a.clone()).unwrap();
        assert!(total.derangement());
        assert!(!Permutation::identity(a).derangement());
    }

    #[test]
    fn malformed_cycles_rejected() {
        let a = alpha("ABCDE");
        for bad in ["(AA)", "(AB) (BC)", "(AZ)", "(AB", "AB)", "AB", "((AB))", "(A B)"] {
            assert!(
                matches!(
                    Permutation::new(bad, a.clone()),
                    Err(Error::MalformedCycle(_))
                ),
                "expected MalformedCycle for {bad:?}"
            );
        }
    }

    #[test]
    fn empty_specification_is_identity() {
        let a = alpha("ABCDE");
        let p = Permutation::new("", a).unwrap();
        for i in 0..5isize {
            assert_eq!(p.permute(i) as isize, i);
        }
    }
}
