//! Per-face inventory assembly and validation (made by FontLab https://www.fontlab.com/)

use std::collections::BTreeSet;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::introspect::MetadataQuery;
use crate::record::{FlatMap, FontLocation, LangMap, LocalizedNames};

/// Everything the introspection tool told us about one face.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceInventory {
    pub location: FontLocation,
    pub families: LocalizedNames,
    pub styles: LocalizedNames,
    pub postscript_names: Vec<String>,
}

impl FaceInventory {
    /// Whether the face can still be named when its localized names don't pair up.
    pub fn has_postscript_fallback(&self) -> bool {
        !self.postscript_names.is_empty()
    }

    pub fn family_lengths(&self) -> Vec<usize> {
        self.families.values().map(Vec::len).collect()
    }

    pub fn style_lengths(&self) -> Vec<usize> {
        self.styles.values().map(Vec::len).collect()
    }
}

/// Merge the three per-query maps into one inventory entry per face.
///
/// Faces come out in the order the family query reported them. The three
/// queries must agree on which faces exist.
pub fn build_inventory(
    families: LangMap,
    mut styles: LangMap,
    mut postscript: FlatMap,
) -> Result<Vec<FaceInventory>, ScanError> {
    check_same_locations(&families, &styles, &postscript)?;

    let faces: Vec<FaceInventory> = families
        .into_iter()
        .map(|(location, families)| {
            let styles = styles.swap_remove(&location).unwrap_or_default();
            let postscript_names = postscript.swap_remove(&location).unwrap_or_default();
            FaceInventory {
                location,
                families,
                styles,
                postscript_names,
            }
        })
        .collect();

    verify_fonts(&faces)?;
    Ok(faces)
}

/// Reject faces whose family and style arrays disagree in length.
///
/// Lengths are pooled across every language of both sets and must collapse to
/// a single value. Faces carrying a PostScript name are let through; the
/// expander decides later whether they need the fallback.
pub fn verify_fonts(faces: &[FaceInventory]) -> Result<(), ScanError> {
    for face in faces {
        let families = face.family_lengths();
        let styles = face.style_lengths();
        let distinct: BTreeSet<usize> = families.iter().chain(&styles).copied().collect();

        if distinct.len() == 1 {
            continue;
        }

        if face.has_postscript_fallback() {
            debug!(
                "{}: family lengths {families:?} and style lengths {styles:?} disagree, keeping for PostScript fallback",
                face.location
            );
            continue;
        }

        return Err(ScanError::InconsistentFace {
            location: face.location.clone(),
            families,
            styles,
        });
    }
    Ok(())
}

fn check_same_locations(
    families: &LangMap,
    styles: &LangMap,
    postscript: &FlatMap,
) -> Result<(), ScanError> {
    let mismatch = |location: &FontLocation, present, missing| ScanError::LocationMismatch {
        location: location.clone(),
        present,
        missing,
    };

    for location in families.keys() {
        if !styles.contains_key(location) {
            return Err(mismatch(location, MetadataQuery::Family, MetadataQuery::Style));
        }
        if !postscript.contains_key(location) {
            return Err(mismatch(
                location,
                MetadataQuery::Family,
                MetadataQuery::PostscriptName,
            ));
        }
    }

    if let Some(location) = styles.keys().find(|l| !families.contains_key(*l)) {
        return Err(mismatch(location, MetadataQuery::Style, MetadataQuery::Family));
    }

    if let Some(location) = postscript.keys().find(|l| !families.contains_key(*l)) {
        return Err(mismatch(
            location,
            MetadataQuery::PostscriptName,
            MetadataQuery::Family,
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(entries: &[(&str, &[&str])]) -> LocalizedNames {
        entries
            .iter()
            .map(|(lang, values)| {
                (
                    lang.to_string(),
                    values.iter().map(|v| v.to_string()).collect(),
                )
            })
            .collect()
    }

    fn face(
        path: &str,
        families: LocalizedNames,
        styles: LocalizedNames,
        postscript: &[&str],
    ) -> FaceInventory {
        FaceInventory {
            location: FontLocation::new(path, 0),
            families,
            styles,
            postscript_names: postscript.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn merges_maps_in_family_order() {
        let a = FontLocation::new("/f/a.ttf", 0);
        let b = FontLocation::new("/f/b.ttf", 0);

        let mut families = LangMap::new();
        families.insert(b.clone(), names(&[("en", &["Beta"])]));
        families.insert(a.clone(), names(&[("en", &["Alpha"])]));

        let mut styles = LangMap::new();
        styles.insert(a.clone(), names(&[("en", &["Regular"])]));
        styles.insert(b.clone(), names(&[("en", &["Bold"])]));

        let mut postscript = FlatMap::new();
        postscript.insert(a.clone(), vec!["Alpha-Regular".to_string()]);
        postscript.insert(b.clone(), Vec::new());

        let faces = build_inventory(families, styles, postscript).expect("build");
        assert_eq!(faces.len(), 2);
        assert_eq!(faces[0].location, b);
        assert_eq!(faces[0].styles["en"], vec!["Bold"]);
        assert_eq!(faces[1].location, a);
        assert_eq!(faces[1].postscript_names, vec!["Alpha-Regular"]);
    }

    #[test]
    fn differing_key_sets_are_fatal() {
        let a = FontLocation::new("/f/a.ttf", 0);
        let mut families = LangMap::new();
        families.insert(a.clone(), names(&[("en", &["Alpha"])]));
        let mut postscript = FlatMap::new();
        postscript.insert(a.clone(), Vec::new());

        let err = build_inventory(families, LangMap::new(), postscript).unwrap_err();
        assert_eq!(
            err,
            ScanError::LocationMismatch {
                location: a,
                present: MetadataQuery::Family,
                missing: MetadataQuery::Style,
            }
        );
    }

    #[test]
    fn extra_postscript_face_is_fatal() {
        let extra = FontLocation::new("/f/extra.ttf", 1);
        let mut postscript = FlatMap::new();
        postscript.insert(extra.clone(), Vec::new());

        let err = build_inventory(LangMap::new(), LangMap::new(), postscript).unwrap_err();
        assert!(matches!(
            err,
            ScanError::LocationMismatch { location, present: MetadataQuery::PostscriptName, .. }
                if location == extra
        ));
    }

    #[test]
    fn pooled_lengths_must_agree_without_postscript() {
        let broken = face(
            "/f/a.ttf",
            names(&[("en", &["A", "A"]), ("zh", &["甲"])]),
            names(&[("en", &["Regular", "Bold"])]),
            &[],
        );

        let err = verify_fonts(&[broken]).unwrap_err();
        assert_eq!(
            err,
            ScanError::InconsistentFace {
                location: FontLocation::new("/f/a.ttf", 0),
                families: vec![2, 1],
                styles: vec![2],
            }
        );
    }

    #[test]
    fn postscript_name_tolerates_mismatch() {
        let tolerated = face(
            "/f/a.ttf",
            names(&[("en", &["A", "A"])]),
            names(&[("en", &["Regular"])]),
            &["A-Regular"],
        );
        assert!(verify_fonts(&[tolerated]).is_ok());
    }

    #[test]
    fn consistent_multilingual_face_passes() {
        let ok = face(
            "/f/a.ttf",
            names(&[("en", &["A", "A"]), ("ja", &["エー", "エー"])]),
            names(&[("en", &["Regular", "Bold"]), ("ja", &["標準", "太字"])]),
            &[],
        );
        assert!(verify_fonts(&[ok]).is_ok());
    }
}
