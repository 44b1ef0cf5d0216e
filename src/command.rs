//! command.rs - Runs the short, blocking query commands the probes rely on.
//!
//! Every probe command is a read-only query (`powershell`, `wmic`, `where`).
//! Output is captured whole and returned as text; a spawn failure or a
//! non-zero exit becomes a [`ProbeError::Command`] carrying stderr.

use std::process::{Command, Stdio};

use crate::error::ProbeError;

/// Run `program args...` and return its stdout as text.
///
/// Windows tools may emit NULs (UTF-16 output piped through a codepage) and
/// CRLF line endings; both are stripped so parsers see plain `\n` lines.
pub fn run_query(program: &str, args: &[&str]) -> Result<String, ProbeError> {
    tracing::debug!("Running query command: {} {:?}", program, args);

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ProbeError::command(program, e.to_string()))
        .and_then(|output| {
            if output.status.success() {
                Ok(clean_output(&String::from_utf8_lossy(&output.stdout)))
            } else {
                Err(ProbeError::command(
                    program,
                    String::from_utf8_lossy(&output.stderr).trim().to_string(),
                ))
            }
        })
}

/// Returns true if `program` can be spawned at all.
pub fn program_available(program: &str, probe_args: &[&str]) -> bool {
    Command::new(program)
        .args(probe_args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

fn clean_output(raw: &str) -> String {
    raw.chars().filter(|c| *c != '\0' && *c != '\r').collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_output_strips_crlf_and_nul() {
        assert_eq!(clean_output("a\r\nb\0\r\n"), "a\nb\n");
    }

    #[test]
    fn test_missing_program_is_command_error() {
        let err = run_query("switcheroo-no-such-binary", &[]).unwrap_err();
        assert!(matches!(err, ProbeError::Command { .. }));
    }

    #[test]
    fn test_missing_program_not_available() {
        assert!(!program_available("switcheroo-no-such-binary", &[]));
    }
}
