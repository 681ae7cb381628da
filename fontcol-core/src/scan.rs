//! Scan pipeline: introspection text -> inventory -> variants (made by FontLab https://www.fontlab.com/)

use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::expand::{expand_fonts, FontVariant};
use crate::introspect::{FontIntrospector, MetadataQuery};
use crate::inventory::{build_inventory, FaceInventory};
use crate::record::{parse_flat_map, parse_lang_map};

/// Run the three metadata queries against `root` and assemble one entry per face.
pub fn load_inventory<I>(introspector: &I, root: &Path) -> Result<Vec<FaceInventory>>
where
    I: FontIntrospector + ?Sized,
{
    let families = parse_lang_map(&introspector.query(root, MetadataQuery::Family)?)
        .context("parsing family records")?;
    let styles = parse_lang_map(&introspector.query(root, MetadataQuery::Style)?)
        .context("parsing style records")?;
    let postscript = parse_flat_map(&introspector.query(root, MetadataQuery::PostscriptName)?)
        .context("parsing postscriptname records")?;

    let faces = build_inventory(families, styles, postscript)?;
    info!("inventoried {} faces under {}", faces.len(), root.display());
    Ok(faces)
}

/// Inventory `root` and expand every face into its nameable variants.
pub fn scan_variants<I>(
    introspector: &I,
    root: &Path,
    preferred_style_langs: &[String],
) -> Result<Vec<FontVariant>>
where
    I: FontIntrospector + ?Sized,
{
    let faces = load_inventory(introspector, root)?;
    let variants = expand_fonts(&faces, preferred_style_langs)?;
    info!("expanded {} faces into {} variants", faces.len(), variants.len());
    Ok(variants)
}
