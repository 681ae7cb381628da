//! Streaming output helpers (made by FontLab https://www.fontlab.com/)

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::expand::FontVariant;
use crate::resolve::{FamilyChoice, FamilyOutcome, ResolveReport, ResolveStatus};

/// Write any serializable value as prettified JSON.
pub fn write_json_pretty<T: Serialize + ?Sized>(value: &T, mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    w.write_all(json.as_bytes())?;
    w.write_all(b"\n")?;
    Ok(())
}

/// Write items as newline-delimited JSON (NDJSON).
pub fn write_ndjson<T: Serialize>(items: &[T], mut w: impl Write) -> Result<()> {
    for item in items {
        let line = serde_json::to_string(item)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

/// One tab-separated `location, family, style` line per variant.
pub fn write_variants_plain(variants: &[FontVariant], mut w: impl Write) -> Result<()> {
    for variant in variants {
        writeln!(w, "{}\t{}\t{}", variant.location, variant.family, variant.style)?;
    }
    Ok(())
}

/// Per-family diagnostics followed by the verdict.
pub fn write_report_plain(report: &ResolveReport, mut w: impl Write) -> Result<()> {
    for outcome in &report.outcomes {
        match outcome {
            FamilyOutcome::Chosen(choice) => writeln!(w, "{}", describe_choice(choice))?,
            FamilyOutcome::Missing { family } => writeln!(w, "Missing: {family}")?,
            FamilyOutcome::Duplicated(dup) => {
                let paths: Vec<String> = dup.paths.iter().map(|p| p.display().to_string()).collect();
                writeln!(w, "Duplicated: {} provided by [{}]", dup.family, paths.join(", "))?;
            }
        }
    }

    match report.status {
        ResolveStatus::Resolved => {
            writeln!(w, "Selected font files:")?;
            for path in &report.files {
                writeln!(w, "{}", path.display())?;
            }
        }
        ResolveStatus::Missing => {
            writeln!(w, "Font collection is not generated because there are missing fonts")?;
        }
        ResolveStatus::Duplicated => {}
    }
    Ok(())
}

fn describe_choice(choice: &FamilyChoice) -> String {
    let provided: Vec<String> = choice
        .provided_by
        .iter()
        .map(|v| format!("{}, {}", v.family, v.style))
        .collect();
    format!(
        "Choosing {} for {} because it provides [{}]",
        choice.path.display(),
        choice.family,
        provided.join("; ")
    )
}
