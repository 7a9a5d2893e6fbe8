use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::asm::{assemble, disassemble};
use super::bytecode::Instruction;

/// On-disk encodings of an instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramFormat {
    Json,
    Yaml,
    Toml,
    /// `dis`-style text listing.
    Listing,
}

impl ProgramFormat {
    /// Pick a format from the file extension; anything unrecognised is read as a listing.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => ProgramFormat::Json,
            Some("yaml" | "yml") => ProgramFormat::Yaml,
            Some("toml") => ProgramFormat::Toml,
            _ => ProgramFormat::Listing,
        }
    }
}

/// A compiled instruction stream plus optional provenance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    /// Source file the stream was compiled from, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self {
            source: None,
            instructions,
        }
    }

    pub fn parse(text: &str, format: ProgramFormat) -> Result<Self> {
        let program = match format {
            ProgramFormat::Json => serde_json::from_str(text).context("invalid JSON program")?,
            ProgramFormat::Yaml => serde_yaml::from_str(text).context("invalid YAML program")?,
            ProgramFormat::Toml => toml::from_str(text).context("invalid TOML program")?,
            ProgramFormat::Listing => Self::new(assemble(text).context("invalid instruction listing")?),
        };
        Ok(program)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read program '{}'", path.display()))?;
        let mut program = Self::parse(&text, ProgramFormat::from_path(path))
            .with_context(|| format!("Failed to load program '{}'", path.display()))?;
        if program.source.is_none() {
            program.source = Some(path.display().to_string());
        }
        Ok(program)
    }

    pub fn render(&self, format: ProgramFormat) -> Result<String> {
        let text = match format {
            ProgramFormat::Json => serde_json::to_string_pretty(self).context("failed to encode JSON program")?,
            ProgramFormat::Yaml => serde_yaml::to_string(self).context("failed to encode YAML program")?,
            ProgramFormat::Toml => toml::to_string(self).context("failed to encode TOML program")?,
            ProgramFormat::Listing => disassemble(&self.instructions),
        };
        Ok(text)
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
