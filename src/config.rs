//! Machine configuration parsing.
//!
//! The configuration file is plain text: an alphabet line, a line with the
//! rotor and pawl counts, then one rotor description per line —
//! `NAME TYPE CYCLES...` — where TYPE is `R` (reflector), `N` (fixed), or
//! `M` followed by the rotor's notch symbols (e.g. `MQV`). A rotor's cycle
//! list may spill onto following lines that begin with `(`.
//!
//! All wiring validation is delegated to [`Permutation`] and [`Rotor`]
//! construction; this module only handles the line grammar.

use std::sync::Arc;

use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::machine::Machine;
use crate::permutation::Permutation;
use crate::rotor::Rotor;

/// One rotor description, before wiring construction.
struct RotorSpec<'a> {
    name: &'a str,
    type_token: &'a str,
    cycles: String,
}

/// Parse a full configuration file into a machine with an empty rotor stack
/// (rotors are inserted later by each setting line).
pub fn parse(text: &str) -> Result<Machine, Error> {
    let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

    let alphabet_line = lines
        .next()
        .ok_or_else(|| Error::ConfigTruncated("missing alphabet line".to_string()))?;
    let alphabet = Arc::new(Alphabet::new(alphabet_line)?);

    let counts_line = lines
        .next()
        .ok_or_else(|| Error::ConfigTruncated("missing rotor/pawl counts".to_string()))?;
    let mut counts = counts_line.split_whitespace();
    let num_rotors = parse_count(counts.next(), "rotor count")?;
    let num_pawls = parse_count(counts.next(), "pawl count")?;
    if let Some(extra) = counts.next() {
        return Err(Error::BadRotorDescription(format!(
            "unexpected '{extra}' after rotor/pawl counts"
        )));
    }

    let mut specs: Vec<RotorSpec> = Vec::new();
    for line in lines {
        if line.starts_with('(') {
            // Continuation of the previous rotor's cycle list.
            let spec = specs.last_mut().ok_or_else(|| {
                Error::BadRotorDescription(format!("cycles without a rotor: {line}"))
            })?;
            spec.cycles.push(' ');
            spec.cycles.push_str(line);
            continue;
        }
        let mut tokens = line.split_whitespace();
        let name = tokens
            .next()
            .ok_or_else(|| Error::BadRotorDescription(line.to_string()))?;
        let type_token = tokens
            .next()
            .ok_or_else(|| Error::BadRotorDescription(format!("rotor '{name}' has no type")))?;
        let cycles = tokens.collect::<Vec<_>>().join(" ");
        specs.push(RotorSpec {
            name,
            type_token,
            cycles,
        });
    }

    let mut catalog = Vec::with_capacity(specs.len());
    for spec in specs {
        catalog.push(build_rotor(&spec, &alphabet)?);
    }

    Machine::new(alphabet, num_rotors, num_pawls, catalog)
}

fn parse_count(token: Option<&str>, what: &str) -> Result<usize, Error> {
    let token =
        token.ok_or_else(|| Error::ConfigTruncated(format!("missing {what}")))?;
    token
        .parse::<usize>()
        .map_err(|_| Error::ConfigTruncated(format!("{what} '{token}' is not a number")))
}

fn build_rotor(spec: &RotorSpec, alphabet: &Arc<Alphabet>) -> Result<Rotor, Error> {
    let wiring = Permutation::new(&spec.cycles, alphabet.clone())?;
    let mut type_chars = spec.type_token.chars();
    match type_chars.next() {
        Some('M') => Rotor::moving(spec.name, wiring, type_chars.as_str()),
        Some('N') => Ok(Rotor::fixed(spec.name, wiring)),
        Some('R') => Rotor::reflector(spec.name, wiring),
        _ => Err(Error::UnknownRotorType(spec.type_token.to_string())),
    }
}
