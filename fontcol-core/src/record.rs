//! Metadata record parsing (made by FontLab https://www.fontlab.com/)
//!
//! The introspection tool prints one record per line, fields joined by
//! [`FIELD_SEPARATOR`]. Values are never escaped, so a name that happens to
//! contain the separator shows up here as a record with too many fields.

use std::fmt;
use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Joins the fields of one record.
pub const FIELD_SEPARATOR: &str = "###___###";

/// One face inside one font file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FontLocation {
    pub path: PathBuf,
    pub index: u32,
}

impl FontLocation {
    pub fn new(path: impl Into<PathBuf>, index: u32) -> Self {
        Self {
            path: path.into(),
            index,
        }
    }
}

impl fmt::Display for FontLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.path.display(), self.index)
    }
}

/// Language tag -> names, both levels in emission order.
///
/// The position of a name inside its sequence pairs it with the name at the
/// same position in the sibling family/style set, so this must stay ordered.
pub type LocalizedNames = IndexMap<String, Vec<String>>;

/// Per-face localized names as read from one language-tagged query.
pub type LangMap = IndexMap<FontLocation, LocalizedNames>;

/// Per-face flat names (PostScript names) as read from one flat query.
pub type FlatMap = IndexMap<FontLocation, Vec<String>>;

/// `[file, index, value, language]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LangRecord {
    pub location: FontLocation,
    pub value: String,
    pub lang: String,
}

/// `[file, index, value]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatRecord {
    pub location: FontLocation,
    pub value: String,
}

pub fn parse_lang_record(line: &str, line_no: usize) -> Result<LangRecord, ScanError> {
    let fields = split_fields(line, 4, line_no)?;
    Ok(LangRecord {
        location: parse_location(fields[0], fields[1], line_no)?,
        value: fields[2].to_string(),
        lang: fields[3].to_string(),
    })
}

pub fn parse_flat_record(line: &str, line_no: usize) -> Result<FlatRecord, ScanError> {
    let fields = split_fields(line, 3, line_no)?;
    Ok(FlatRecord {
        location: parse_location(fields[0], fields[1], line_no)?,
        value: fields[2].to_string(),
    })
}

/// Group language-tagged records by face, then by language.
pub fn parse_lang_map(text: &str) -> Result<LangMap, ScanError> {
    let mut map = LangMap::new();
    for (line_no, line) in records(text) {
        let record = parse_lang_record(line, line_no)?;
        map.entry(record.location)
            .or_default()
            .entry(record.lang)
            .or_default()
            .push(record.value);
    }
    Ok(map)
}

/// Group flat records by face.
///
/// An empty value still registers the face, with no names attached, so that
/// key sets can be compared across queries.
pub fn parse_flat_map(text: &str) -> Result<FlatMap, ScanError> {
    let mut map = FlatMap::new();
    for (line_no, line) in records(text) {
        let record = parse_flat_record(line, line_no)?;
        let names = map.entry(record.location).or_default();
        if !record.value.is_empty() {
            names.push(record.value);
        }
    }
    Ok(map)
}

fn records(text: &str) -> impl Iterator<Item = (usize, &str)> + '_ {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| (idx + 1, line))
}

fn split_fields(line: &str, expected: usize, line_no: usize) -> Result<Vec<&str>, ScanError> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).collect();
    if fields.len() != expected {
        return Err(ScanError::MalformedRecord {
            line: line_no,
            expected,
            found: fields.len(),
            text: line.to_string(),
        });
    }
    Ok(fields)
}

fn parse_location(file: &str, index: &str, line_no: usize) -> Result<FontLocation, ScanError> {
    let index = index
        .parse::<u32>()
        .map_err(|_| ScanError::InvalidFaceIndex {
            line: line_no,
            value: index.to_string(),
        })?;
    Ok(FontLocation::new(file, index))
}
