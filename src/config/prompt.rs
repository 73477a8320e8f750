//! Interactive stdin prompts
//!
//! Operator-facing prompts used to fill configuration gaps when the
//! probe runs attended.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::io::{self, Write};

/// Prompt for a value, falling back to a default on blank input
pub fn prompt_with_default(label: &str, default: &str) -> Result<String> {
    let raw = read_prompt(&format!("{label} [{default}]: "))?;
    Ok(apply_default(&raw, default))
}

/// Prompt for a required value; blank input is an error
pub fn prompt_required(label: &str) -> Result<String> {
    let raw = read_prompt(&format!("{label}: "))?;
    let value = raw.trim();
    if value.is_empty() {
        anyhow::bail!("{label} is required");
    }
    Ok(value.to_string())
}

/// Block until the operator presses Enter
pub fn pause(message: &str) -> Result<()> {
    read_prompt(&format!("{message} (press Enter to continue) "))?;
    Ok(())
}

fn read_prompt(text: &str) -> Result<String> {
    print!("{text}");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line)
}

fn apply_default(raw: &str, default: &str) -> String {
    let value = raw.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_default_blank() {
        assert_eq!(apply_default("\n", "http://localhost:3000"), "http://localhost:3000");
        assert_eq!(apply_default("   ", "3"), "3");
    }

    #[test]
    fn test_apply_default_value() {
        assert_eq!(apply_default(" 5 \n", "3"), "5");
    }
}
