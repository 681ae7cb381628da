//! Font introspection helpers for fontcol-core (made by FontLab https://www.fontlab.com/)

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{anyhow, bail, Context, Result};
use log::debug;

use crate::record::FIELD_SEPARATOR;

/// Environment variable naming the `fc-scan` binary to run.
pub const FC_SCAN_ENV: &str = "FONTCOL_FC_SCAN";

/// The three record shapes the engine needs from the introspection tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetadataQuery {
    Family,
    Style,
    PostscriptName,
}

impl MetadataQuery {
    pub const ALL: [MetadataQuery; 3] = [Self::Family, Self::Style, Self::PostscriptName];

    /// `fc-scan -f` format emitting one record per line for this query.
    pub fn fc_format(self) -> String {
        match self {
            Self::Family => lang_format("family", "familylang"),
            Self::Style => lang_format("style", "stylelang"),
            Self::PostscriptName => {
                let sep = FIELD_SEPARATOR;
                format!("%{{file}}{sep}%{{index}}{sep}%{{postscriptname}}\\n")
            }
        }
    }
}

impl fmt::Display for MetadataQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Family => "family",
            Self::Style => "style",
            Self::PostscriptName => "postscriptname",
        })
    }
}

fn lang_format(value: &str, lang: &str) -> String {
    let sep = FIELD_SEPARATOR;
    format!("%{{[]{value},{lang}{{%{{file}}{sep}%{{index}}{sep}%{{{value}}}{sep}%{{{lang}}}\\n}}}}")
}

/// Trait for running one metadata query against a font root (external tool, canned text, etc.).
pub trait FontIntrospector {
    fn query(&self, root: &Path, query: MetadataQuery) -> Result<String>;
}

/// Runs fontconfig's `fc-scan` and buffers its whole output.
#[derive(Debug, Clone)]
pub struct FcScan {
    program: PathBuf,
}

impl Default for FcScan {
    fn default() -> Self {
        Self::new("fc-scan")
    }
}

impl FcScan {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Honour [`FC_SCAN_ENV`] when set, otherwise look up `fc-scan` on `PATH`.
    pub fn from_env() -> Self {
        env::var_os(FC_SCAN_ENV)
            .filter(|raw| !raw.is_empty())
            .map(Self::new)
            .unwrap_or_default()
    }

    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl FontIntrospector for FcScan {
    fn query(&self, root: &Path, query: MetadataQuery) -> Result<String> {
        if !root.exists() {
            return Err(anyhow!("font root does not exist: {}", root.display()));
        }

        debug!("running {} for {query} records under {}", self.program.display(), root.display());
        let output = Command::new(&self.program)
            .arg("-f")
            .arg(query.fc_format())
            .arg(root)
            .output()
            .with_context(|| format!("running {}", self.program.display()))?;

        if !output.status.success() {
            bail!(
                "{} failed ({}) while reading {query} records: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        String::from_utf8(output.stdout).with_context(|| {
            format!(
                "{} printed non-UTF-8 {query} records",
                self.program.display()
            )
        })
    }
}
