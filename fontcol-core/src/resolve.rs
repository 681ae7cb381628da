//! Family resolution: one winning file per required family (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use serde::Serialize;
use thiserror::Error;

use crate::expand::FontVariant;
use crate::policy::Policy;

/// Family name -> variants allowed by the policy, in variant order.
#[derive(Debug, Default)]
pub struct FamilyIndex<'a> {
    by_family: IndexMap<&'a str, Vec<&'a FontVariant>>,
}

impl<'a> FamilyIndex<'a> {
    pub fn build(variants: &'a [FontVariant], policy: &Policy) -> Self {
        let mut by_family: IndexMap<&'a str, Vec<&'a FontVariant>> = IndexMap::new();
        for variant in variants.iter().filter(|v| policy.allows(v)) {
            by_family.entry(variant.family.as_str()).or_default().push(variant);
        }
        Self { by_family }
    }

    pub fn providers(&self, family: &str) -> &[&'a FontVariant] {
        self.by_family.get(family).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.by_family.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_family.is_empty()
    }
}

/// A family satisfied by exactly one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyChoice {
    pub family: String,
    pub path: PathBuf,
    /// The variants on `path` that justified the choice.
    pub provided_by: Vec<FontVariant>,
}

/// A family offered by more than one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Duplicate {
    pub family: String,
    pub paths: Vec<PathBuf>,
}

/// What happened to one required family, in the order families were checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FamilyOutcome {
    Chosen(FamilyChoice),
    Missing { family: String },
    Duplicated(Duplicate),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolveStatus {
    Resolved,
    Missing,
    Duplicated,
}

/// Run-level failure of resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("duplicated font family {family:?} provided by {}", display_paths(.paths))]
    Duplicated { family: String, paths: Vec<PathBuf> },
    #[error(
        "font collection is not generated because there are missing fonts: {}",
        .families.join(", ")
    )]
    Missing { families: Vec<String> },
}

/// Everything resolution decided, including the families handled before a failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolveReport {
    pub status: ResolveStatus,
    pub outcomes: Vec<FamilyOutcome>,
    /// Sorted, de-duplicated winning files.
    pub files: Vec<PathBuf>,
}

impl ResolveReport {
    pub fn chosen(&self) -> impl Iterator<Item = &FamilyChoice> {
        self.outcomes.iter().filter_map(|o| match o {
            FamilyOutcome::Chosen(choice) => Some(choice),
            _ => None,
        })
    }

    pub fn missing(&self) -> Vec<&str> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FamilyOutcome::Missing { family } => Some(family.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn duplicated(&self) -> Option<&Duplicate> {
        self.outcomes.iter().find_map(|o| match o {
            FamilyOutcome::Duplicated(dup) => Some(dup),
            _ => None,
        })
    }

    /// The files to collect, or why there are none.
    pub fn selected_files(&self) -> Result<&[PathBuf], ResolveError> {
        match self.status {
            ResolveStatus::Resolved => Ok(&self.files),
            ResolveStatus::Duplicated => {
                let dup = self.duplicated().cloned().unwrap_or_else(|| Duplicate {
                    family: String::new(),
                    paths: Vec::new(),
                });
                Err(ResolveError::Duplicated {
                    family: dup.family,
                    paths: dup.paths,
                })
            }
            ResolveStatus::Missing => Err(ResolveError::Missing {
                families: self.missing().into_iter().map(str::to_string).collect(),
            }),
        }
    }
}

/// Decide a unique file for every required family.
///
/// Families are visited once each, in first-seen order, skipping ignored ones.
/// Missing families are accumulated; the first duplicated family stops the scan.
pub fn resolve(variants: &[FontVariant], required: &[String], policy: &Policy) -> ResolveReport {
    let index = FamilyIndex::build(variants, policy);
    debug!(
        "{} of {} variants are visible across {} families",
        variants.iter().filter(|v| policy.allows(v)).count(),
        variants.len(),
        index.len()
    );

    let mut outcomes = Vec::new();
    let mut status = ResolveStatus::Resolved;

    for family in unique_families(required) {
        if policy.is_ignored(family) {
            debug!("skipping ignored family {family:?}");
            continue;
        }

        let providers = index.providers(family);
        let paths: BTreeSet<&Path> = providers
            .iter()
            .map(|v| v.location.path.as_path())
            .collect();

        match paths.len() {
            0 => {
                outcomes.push(FamilyOutcome::Missing {
                    family: family.to_string(),
                });
                status = ResolveStatus::Missing;
            }
            1 => {
                let path = paths.into_iter().next().map(Path::to_path_buf).unwrap_or_default();
                info!("{family:?} resolved to {}", path.display());
                outcomes.push(FamilyOutcome::Chosen(FamilyChoice {
                    family: family.to_string(),
                    path,
                    provided_by: providers.iter().map(|v| (*v).clone()).collect(),
                }));
            }
            _ => {
                outcomes.push(FamilyOutcome::Duplicated(Duplicate {
                    family: family.to_string(),
                    paths: paths.into_iter().map(Path::to_path_buf).collect(),
                }));
                status = ResolveStatus::Duplicated;
                break;
            }
        }
    }

    let files: BTreeSet<PathBuf> = outcomes
        .iter()
        .filter_map(|o| match o {
            FamilyOutcome::Chosen(choice) => Some(choice.path.clone()),
            _ => None,
        })
        .collect();

    ResolveReport {
        status,
        outcomes,
        files: files.into_iter().collect(),
    }
}

/// Split newline-separated family names, dropping blank lines.
pub fn parse_required_families(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn unique_families(required: &[String]) -> IndexSet<&str> {
    required.iter().map(String::as_str).collect()
}

fn display_paths(paths: &[PathBuf]) -> String {
    let rendered: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
    format!("[{}]", rendered.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_families_skip_blank_lines() {
        let parsed = parse_required_families("Arial\r\n\n  \nNoto Sans\n");
        assert_eq!(parsed, vec!["Arial".to_string(), "Noto Sans".to_string()]);
    }

    #[test]
    fn required_names_are_not_trimmed() {
        let parsed = parse_required_families(" Arial\nNoto Sans \n");
        assert_eq!(parsed, vec![" Arial".to_string(), "Noto Sans ".to_string()]);
    }

    #[test]
    fn unique_families_keep_first_seen_order() {
        let required: Vec<String> = ["B", "A", "B", "C", "A"].iter().map(|s| s.to_string()).collect();
        let unique: Vec<&str> = unique_families(&required).into_iter().collect();
        assert_eq!(unique, vec!["B", "A", "C"]);
    }

    #[test]
    fn errors_render_family_and_paths() {
        let dup = ResolveError::Duplicated {
            family: "Noto Sans".to_string(),
            paths: vec![PathBuf::from("/a.ttf"), PathBuf::from("/b.ttf")],
        };
        assert_eq!(
            dup.to_string(),
            "duplicated font family \"Noto Sans\" provided by [/a.ttf, /b.ttf]"
        );

        let missing = ResolveError::Missing {
            families: vec!["Wingdings".to_string(), "Comic Sans".to_string()],
        };
        assert!(missing.to_string().ends_with("missing fonts: Wingdings, Comic Sans"));
    }

    #[test]
    fn empty_request_resolves_to_nothing() {
        let report = resolve(&[], &[], &Policy::default());
        assert_eq!(report.status, ResolveStatus::Resolved);
        assert!(report.outcomes.is_empty());
        assert_eq!(report.selected_files().expect("resolved"), &[] as &[PathBuf]);
    }
}
