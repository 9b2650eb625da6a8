//! Message processing on top of a configured machine.
//!
//! The input is a line stream. Lines beginning with `*` are setting lines
//! (`* NAME... SETTING [PLUGBOARD-CYCLES...]`) and reconfigure the inserted
//! rotors, their initial settings, and the plugboard; the first line must be
//! one. Blank lines pass through as blank output lines. Every other line is
//! enciphered (spaces stripped) and written out in five-symbol groups.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::alphabet::Alphabet;
use crate::error::Error;
use crate::machine::{Machine, StepEvent, StepObserver};
use crate::permutation::Permutation;

/// Symbols per output group.
const GROUP: usize = 5;

/// Run the whole input stream through `machine`, writing converted message
/// lines to `output`.
pub fn process<R: BufRead, W: Write>(
    machine: &mut Machine,
    input: R,
    output: &mut W,
) -> Result<()> {
    let mut configured = false;
    for line in input.lines() {
        let line = line.context("failed to read input")?;
        let line = line.trim();
        if !configured && !line.starts_with('*') {
            return Err(Error::MissingSettingLine.into());
        }
        if line.starts_with('*') {
            apply_setting_line(machine, line)?;
            configured = true;
        } else if line.is_empty() {
            writeln!(output).context("failed to write output")?;
        } else {
            let msg: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            let converted = machine.convert_message(&msg)?;
            write_grouped(output, &converted).context("failed to write output")?;
        }
    }
    Ok(())
}

/// Apply `* NAME1 ... NAMEn SETTING [CYCLES...]`: insert the named rotors,
/// set their initial positions, and replace the plugboard (identity when no
/// cycles are given).
fn apply_setting_line(machine: &mut Machine, line: &str) -> Result<(), Error> {
    let mut tokens: Vec<&str> = Vec::new();
    for (i, token) in line.split_whitespace().enumerate() {
        if i == 0 {
            // The leading '*' may be glued to the first rotor name.
            let rest = token.trim_start_matches('*');
            if !rest.is_empty() {
                tokens.push(rest);
            }
        } else {
            tokens.push(token);
        }
    }

    let slots = machine.num_rotors();
    if tokens.len() < slots + 1 {
        return Err(Error::BadSettingLine(format!(
            "expected {} rotor names and a setting: {line}",
            slots
        )));
    }
    machine.insert_rotors(&tokens[..slots])?;
    machine.set_rotors(tokens[slots])?;

    let cycles = tokens[slots + 1..].join(" ");
    let plugboard = Permutation::new(&cycles, machine.alphabet().clone())?;
    machine.set_plugboard(plugboard);
    Ok(())
}

/// Write `msg` in groups of five symbols separated by single spaces, with a
/// trailing newline. The last group may be shorter.
fn write_grouped<W: Write>(output: &mut W, msg: &str) -> io::Result<()> {
    let symbols: Vec<char> = msg.chars().collect();
    for (i, chunk) in symbols.chunks(GROUP).enumerate() {
        if i > 0 {
            write!(output, " ")?;
        }
        for c in chunk {
            write!(output, "{c}")?;
        }
    }
    writeln!(output)
}

/// Forwards per-keystroke engine state to the logging layer. Installed by
/// the CLI when `--verbose` is set; the engine itself never logs.
pub struct TracingObserver {
    alphabet: Arc<Alphabet>,
}

impl TracingObserver {
    pub fn new(alphabet: Arc<Alphabet>) -> Self {
        Self { alphabet }
    }

    fn symbol(&self, index: usize) -> char {
        self.alphabet.to_char(index).unwrap_or('?')
    }
}

impl StepObserver for TracingObserver {
    fn on_step(&mut self, event: &StepEvent) {
        let window: String = event.settings.iter().map(|&s| self.symbol(s)).collect();
        tracing::debug!(
            "[{window}] {} -> {} -> {}",
            self.symbol(event.input),
            self.symbol(event.plugged),
            self.symbol(event.output),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;
    use std::io::Cursor;

    const CONF: &str = "\
ABCDEFGHIJKLMNOPQRSTUVWXYZ
4 3
I    MQ  (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ) (S)
II   ME  (FIXVYOMW) (CDKLHUP) (ESZ) (BJ) (GR) (NT) (A) (Q)
III  MV  (ABDHPEJT) (CFLVMZOYQIRWUKXSG) (N)
B    R   (AE) (BN) (CK) (DQ) (FU) (GY) (HW) (IJ) (LO) (MP) (RX) (SZ) (TV)
";

    fn run(input: &str) -> Result<String> {
        let mut machine = config::parse(CONF).unwrap();
        let mut out = Vec::new();
        process(&mut machine, Cursor::new(input.as_bytes()), &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn round_trip_through_the_session_layer() {
        let cipher = run("* B I II III AAA\nHELLO WORLD\n").unwrap();
        let cipher_line = cipher.trim_end();
        // Ten symbols come back as two groups of five.
        assert_eq!(cipher_line.len(), 11);
        assert_eq!(cipher_line.as_bytes()[5], b' ');

        let back = run(&format!("* B I II III AAA\n{cipher_line}\n")).unwrap();
        assert_eq!(back, "HELLO WORLD\n");
    }

    #[test]
    fn blank_lines_pass_through() {
        let out = run("* B I II III AAA\nAAAAA\n\nAAAAA\n").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "");
        // State advanced across the blank line, so the two cipher lines differ.
        assert_ne!(lines[0], lines[2]);
    }

    #[test]
    fn setting_lines_reconfigure_mid_stream() {
        let out = run("* B I II III AAA\nAAAAA\n* B I II III AAA\nAAAAA\n").unwrap();
        let lines: Vec<&str> = out.lines().collect();
        // Same configuration re-applied: identical cipher text.
        assert_eq!(lines[0], lines[1]);
    }

    #[test]
    fn plugboard_cycles_on_the_setting_line() {
        let plain = run("* B I II III AAA\nABCDE\n").unwrap();
        let plugged = run("* B I II III AAA (AB)\nBACDE\n").unwrap();
        let swap = |c: char| match c {
            'A' => 'B',
            'B' => 'A',
            other => other,
        };
        let expected: String = plain.trim_end().chars().map(swap).collect();
        assert_eq!(plugged.trim_end(), expected);
    }

    #[test]
    fn first_line_must_be_a_setting() {
        let err = run("HELLO\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::MissingSettingLine)
        );
    }

    #[test]
    fn short_setting_lines_are_rejected() {
        let err = run("* B I II\n").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::BadSettingLine(_))
        ));
    }

    #[test]
    fn foreign_symbols_fail_the_run() {
        let err = run("* B I II III AAA\nHI!\n").unwrap_err();
        assert_eq!(
            err.downcast_ref::<Error>(),
            Some(&Error::SymbolNotInAlphabet('!'))
        );
    }

    #[test]
    fn grouping_splits_long_lines() {
        let mut out = Vec::new();
        write_grouped(&mut out, "ABCDEFGHIJKL").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ABCDE FGHIJ KL\n");
        let mut out = Vec::new();
        write_grouped(&mut out, "ABC").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "ABC\n");
    }
}
