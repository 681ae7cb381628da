//! Matching policy: which languages, styles and families take part in resolution
//! (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::expand::{FontVariant, VariantStyle};

/// Allow-lists and ignore-lists consulted by the expander and the resolver.
///
/// Every field has a default, so a JSON policy file only needs to name what it
/// changes:
///
/// ```json
/// { "ignored_families": ["微软雅黑", "Wingdings"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Policy {
    /// Style languages tried in order when a face declares styles in several languages.
    pub preferred_style_langs: Vec<String>,
    /// Only variants with one of these styles can satisfy a family. Weight and
    /// italic matching are not supported.
    pub preferred_styles: BTreeSet<String>,
    /// Families matched with any style (some never declare a "Regular").
    pub style_exempt_families: BTreeSet<String>,
    /// Families never collected, even when a subtitle names them.
    pub ignored_families: BTreeSet<String>,
    /// Let variants named after a PostScript name take part in resolution.
    pub allow_postscript_fallback: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            preferred_style_langs: vec!["en".to_string()],
            preferred_styles: strings(&["Regular", "Bold"]),
            style_exempt_families: strings(&["HYQiHei-35S", "汉仪旗黑-35S", "HYQiHei-65S", "汉仪旗黑-65S"]),
            ignored_families: strings(&["微软雅黑"]),
            allow_postscript_fallback: true,
        }
    }
}

impl Policy {
    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parsing policy JSON")
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading policy {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("loading policy {}", path.display()))
    }

    /// Whether a variant is visible to resolution at all.
    pub fn allows(&self, variant: &FontVariant) -> bool {
        if self.style_exempt_families.contains(&variant.family) {
            return true;
        }
        match &variant.style {
            VariantStyle::Named(style) => self.preferred_styles.contains(style),
            VariantStyle::Postscript => self.allow_postscript_fallback,
        }
    }

    pub fn is_ignored(&self, family: &str) -> bool {
        self.ignored_families.contains(family)
    }
}

fn strings(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|v| v.to_string()).collect()
}
