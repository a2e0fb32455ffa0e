//! Charm-style CLI prompts using cliclack

use anyhow::Result;

/// Ask a yes/no question, defaulting to "no"
pub fn confirm(prompt: &str) -> Result<bool> {
    let answer: bool = cliclack::confirm(prompt).initial_value(false).interact()?;
    Ok(answer)
}
