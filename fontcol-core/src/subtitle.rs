//! Required-font extraction from ASS/SSA subtitles (made by FontLab https://www.fontlab.com/)
//!
//! Only what font collection needs is read: the `Fontname` of every style and
//! the `\fn` overrides inside event text. Italic overrides are rejected since
//! no italic face would ever be collected for them.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};
use regex::Regex;
use serde::Serialize;
use walkdir::WalkDir;

const DEFAULT_STYLE_FORMAT: &[&str] = &[
    "Name",
    "Fontname",
    "Fontsize",
    "PrimaryColour",
    "SecondaryColour",
    "OutlineColour",
    "BackColour",
    "Bold",
    "Italic",
    "Underline",
    "StrikeOut",
    "ScaleX",
    "ScaleY",
    "Spacing",
    "Angle",
    "BorderStyle",
    "Outline",
    "Shadow",
    "Alignment",
    "MarginL",
    "MarginR",
    "MarginV",
    "Encoding",
];

const DEFAULT_EVENT_FORMAT: &[&str] = &[
    "Layer", "Start", "End", "Style", "Name", "MarginL", "MarginR", "MarginV", "Effect", "Text",
];

/// Font families named by a set of subtitle documents.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct SubtitleFonts {
    pub families: BTreeSet<String>,
    /// Named in events that switch on `\b1`.
    pub requiring_bold: BTreeSet<String>,
    /// Named in events that ask for a numeric weight (`\b700` and friends).
    pub requiring_weight: BTreeSet<String>,
}

impl SubtitleFonts {
    /// Required families, one per line, sorted.
    pub fn write_families(&self, mut w: impl Write) -> Result<()> {
        for family in &self.families {
            writeln!(w, "{family}")?;
        }
        Ok(())
    }

    /// Human-readable notes about overrides that collection cannot honour.
    pub fn write_warnings(&self, mut w: impl Write) -> Result<()> {
        if !self.requiring_bold.is_empty() {
            writeln!(w, "Fonts may require bold:")?;
            for family in &self.requiring_bold {
                writeln!(w, "{family}")?;
            }
        }
        if !self.requiring_weight.is_empty() {
            writeln!(w, "Fonts may require custom weight:")?;
            for family in &self.requiring_weight {
                writeln!(w, "{family}")?;
            }
        }
        Ok(())
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Styles,
    Events,
    Other,
}

/// Extracts font names from subtitle text.
#[derive(Debug, Clone)]
pub struct SubtitleScanner {
    font_name: Regex,
    bold: Regex,
    italic: Regex,
    encoding: &'static Encoding,
}

impl SubtitleScanner {
    /// Scanner reading UTF-8 files.
    pub fn new() -> Result<Self> {
        Ok(Self {
            font_name: Regex::new(r"\\fn([^\\}]+)")?,
            bold: Regex::new(r"\\b([0-9]+)")?,
            italic: Regex::new(r"\\i[0-9]+")?,
            encoding: UTF_8,
        })
    }

    /// Read files in the encoding named by a WHATWG label (`utf-16`, `gbk`, `big5`, ...).
    ///
    /// A UTF-8 or UTF-16 byte order mark in a file still wins over the label.
    pub fn with_encoding(mut self, label: &str) -> Result<Self> {
        self.encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| anyhow!("unknown subtitle encoding: {label}"))?;
        Ok(self)
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Scan every `.ass` file below `root`, in file-name order.
    pub fn scan_dir(&self, root: &Path) -> Result<SubtitleFonts> {
        let mut fonts = SubtitleFonts::default();
        for path in subtitle_files(root)? {
            let text = self.read_subtitle(&path)?;
            self.scan_document(&text, &mut fonts)
                .with_context(|| format!("scanning {}", path.display()))?;
        }
        Ok(fonts)
    }

    /// Add the fonts one document needs to `fonts`.
    pub fn scan_document(&self, text: &str, fonts: &mut SubtitleFonts) -> Result<()> {
        let mut section = Section::Other;
        let mut format: Option<Vec<String>> = None;

        for raw in text.lines() {
            let line = raw.trim();
            if line.starts_with('[') && line.ends_with(']') {
                section = match line.to_ascii_lowercase().as_str() {
                    "[v4+ styles]" | "[v4 styles]" | "[v4 styles+]" => Section::Styles,
                    "[events]" => Section::Events,
                    _ => Section::Other,
                };
                format = None;
                continue;
            }

            if let Some(fields) = line.strip_prefix("Format:") {
                format = Some(fields.split(',').map(|f| f.trim().to_string()).collect());
                continue;
            }

            match section {
                Section::Styles => {
                    if let Some(data) = line.strip_prefix("Style:") {
                        let name = style_font(data, format.as_deref());
                        if !name.is_empty() {
                            fonts.families.insert(trim_font(name).to_string());
                        }
                    }
                }
                Section::Events => {
                    let data = line
                        .strip_prefix("Dialogue:")
                        .or_else(|| line.strip_prefix("Comment:"));
                    if let Some(data) = data {
                        self.scan_event(event_text(data, format.as_deref()), fonts)?;
                    }
                }
                Section::Other => {}
            }
        }
        Ok(())
    }

    fn read_subtitle(&self, path: &Path) -> Result<String> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let (text, used, had_errors) = self.encoding.decode(&bytes);
        if had_errors {
            bail!("{} is not valid {}", path.display(), used.name());
        }
        if used != self.encoding {
            warn!("{}: byte order mark selects {}", path.display(), used.name());
        }
        Ok(text.into_owned())
    }

    fn scan_event(&self, text: &str, fonts: &mut SubtitleFonts) -> Result<()> {
        if self.italic.is_match(text) {
            bail!("italic font is not supported: {text}");
        }

        let in_event: BTreeSet<String> = self
            .font_name
            .captures_iter(text)
            .map(|caps| trim_font(&caps[1]).to_string())
            .collect();

        for caps in self.bold.captures_iter(text) {
            match caps[1].parse::<u64>() {
                Ok(0) => {}
                Ok(1) => fonts.requiring_bold.extend(in_event.iter().cloned()),
                _ => fonts.requiring_weight.extend(in_event.iter().cloned()),
            }
        }

        fonts.families.extend(in_event);
        Ok(())
    }
}

fn style_font<'a>(data: &'a str, format: Option<&[String]>) -> &'a str {
    let parts: Vec<&str> = data.split(',').collect();
    let position = match format {
        Some(format) => format.iter().position(|f| f.eq_ignore_ascii_case("Fontname")),
        None => DEFAULT_STYLE_FORMAT
            .iter()
            .position(|f| f.eq_ignore_ascii_case("Fontname")),
    };
    position
        .and_then(|idx| parts.get(idx))
        .map_or("", |s| s.trim())
}

/// `Text` is the last field and the only one allowed to contain commas.
fn event_text<'a>(data: &'a str, format: Option<&[String]>) -> &'a str {
    let fields = format.map_or(DEFAULT_EVENT_FORMAT.len(), <[String]>::len).max(1);
    data.splitn(fields, ',').last().unwrap_or("")
}

fn trim_font(name: &str) -> &str {
    name.strip_prefix('@').unwrap_or(name)
}

fn subtitle_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.exists() {
        bail!("subtitle root does not exist: {}", root.display());
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_subtitle(entry.path()) {
            found.push(entry.path().to_path_buf());
        }
    }
    debug!("found {} subtitle files under {}", found.len(), root.display());
    Ok(found)
}

fn is_subtitle(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ass"))
}
