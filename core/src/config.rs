use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::vm::ArenaConfig;

/// Run-time knobs for a [`crate::vm::Vm`], usually read from a TOML file:
///
/// ```toml
/// trace = true
///
/// [arena]
/// capacity = 65536
/// limit = 1048576
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VmConfig {
    pub arena: ArenaConfig,
    /// Emit a `pyrite::vm::dispatch` trace event before every instruction.
    pub trace: bool,
}

impl VmConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).context("invalid VM config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config '{}'", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("Failed to load config '{}'", path.display()))
    }
}
