//! Variant expansion: from per-face inventories to nameable (family, style) units
//! (made by FontLab https://www.fontlab.com/)

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ScanError;
use crate::inventory::FaceInventory;
use crate::record::{FontLocation, LocalizedNames};

/// Style half of a variant.
///
/// Variants named after a PostScript name carry [`VariantStyle::Postscript`]
/// rather than a string, so they can never be mistaken for a declared style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum VariantStyle {
    Named(String),
    Postscript,
}

impl VariantStyle {
    pub fn named(style: impl Into<String>) -> Self {
        Self::Named(style.into())
    }

    pub fn as_named(&self) -> Option<&str> {
        match self {
            Self::Named(name) => Some(name),
            Self::Postscript => None,
        }
    }
}

impl fmt::Display for VariantStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::Postscript => f.write_str("<PostScript>"),
        }
    }
}

/// One (file, face, family, style) unit a required family can be matched against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontVariant {
    pub location: FontLocation,
    pub family: String,
    pub style: VariantStyle,
}

/// The localized names of a face cannot be paired position by position.
///
/// Recoverable: the caller retries with the face's PostScript names.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalStyle {
    /// The face has no style names in the chosen language. Faces from
    /// [`crate::inventory::build_inventory`] always carry style records, so
    /// this only arises for hand-built inventories passed to [`expand_face`].
    #[error("face declares no style names")]
    NoStyles,
    #[error("{families} family names in language {language:?} cannot pair with {styles} style names")]
    LengthMismatch {
        language: String,
        families: usize,
        styles: usize,
    },
}

/// Pick the language whose style names get paired with every family language.
///
/// A single style language always wins. Otherwise the first preferred tag the
/// face declares is used; `None` means the choice is ambiguous.
pub fn find_style_lang<'a>(styles: &'a LocalizedNames, preferred: &[String]) -> Option<&'a str> {
    if styles.len() == 1 {
        return styles.keys().next().map(String::as_str);
    }
    preferred
        .iter()
        .find_map(|lang| styles.get_key_value(lang.as_str()))
        .map(|(lang, _)| lang.as_str())
}

/// Zip each family-language sequence with the chosen style sequence.
pub fn expand_paired(
    face: &FaceInventory,
    style_lang: &str,
) -> Result<Vec<FontVariant>, IllegalStyle> {
    let styles = face.styles.get(style_lang).ok_or(IllegalStyle::NoStyles)?;

    let mut variants = Vec::new();
    for (language, families) in &face.families {
        if families.len() != styles.len() {
            return Err(IllegalStyle::LengthMismatch {
                language: language.clone(),
                families: families.len(),
                styles: styles.len(),
            });
        }
        variants.extend(families.iter().zip(styles).map(|(family, style)| FontVariant {
            location: face.location.clone(),
            family: family.clone(),
            style: VariantStyle::named(style.as_str()),
        }));
    }
    Ok(variants)
}

/// One variant per PostScript name, styled with the PostScript sentinel.
pub fn expand_postscript(face: &FaceInventory) -> Result<Vec<FontVariant>, ScanError> {
    if !face.has_postscript_fallback() {
        return Err(ScanError::MissingPostscriptFallback {
            location: face.location.clone(),
        });
    }
    Ok(face
        .postscript_names
        .iter()
        .map(|name| FontVariant {
            location: face.location.clone(),
            family: name.clone(),
            style: VariantStyle::Postscript,
        })
        .collect())
}

pub fn expand_face(face: &FaceInventory, preferred: &[String]) -> Result<Vec<FontVariant>, ScanError> {
    let paired = match find_style_lang(&face.styles, preferred) {
        Some(lang) => expand_paired(face, lang),
        None if face.styles.is_empty() => Err(IllegalStyle::NoStyles),
        None => {
            return Err(ScanError::AmbiguousStyleLanguage {
                location: face.location.clone(),
                preferred: preferred.to_vec(),
                available: face.styles.keys().cloned().collect(),
            })
        }
    };

    match paired {
        Ok(variants) => Ok(variants),
        Err(illegal) => {
            debug!("{}: {illegal}, falling back to PostScript names", face.location);
            expand_postscript(face)
        }
    }
}

/// Expand every face, in inventory order. Any fatal face aborts the whole expansion.
pub fn expand_fonts(
    faces: &[FaceInventory],
    preferred: &[String],
) -> Result<Vec<FontVariant>, ScanError> {
    let mut variants = Vec::new();
    for face in faces {
        variants.extend(expand_face(face, preferred)?);
    }
    Ok(variants)
}
