/// fontcol-core: the careful quartermaster of subtitle fonts
///
/// Subtitles name fonts; font folders hold files. This library settles the
/// argument between the two, making sure every family a subtitle asks for is
/// backed by exactly one file before anything gets copied. No guessing, no
/// "close enough" - a family is either found once, missing, or contested.
///
/// ## The Journey of a Font Name
///
/// **Records**: reading what the introspection tool had to say
/// - One line per name, fields joined by an unlikely separator
/// - Faces identified by file and face index, collections included
/// - Emission order kept exactly, since positions pair families with styles
///
/// **Inventory**: one biography per face
/// - Family, style and PostScript queries merged and cross-checked
/// - Faces whose localized names don't line up are flagged early
///
/// **Expansion**: every nameable (family, style) unit a face exposes
/// - Style language chosen by policy when a face speaks several
/// - PostScript names step in when localized names can't be paired
///
/// **Resolution**: one file per required family, or a clear reason why not
/// - Only Regular, Bold and PostScript-named variants count by default
/// - Missing families are gathered; the first contested family ends the run
///
/// ## A Sample Conversation
///
/// ```rust,no_run
/// use std::path::Path;
/// use fontcol_core::collect::collect_files;
/// use fontcol_core::introspect::FcScan;
/// use fontcol_core::policy::Policy;
/// use fontcol_core::resolve::resolve;
/// use fontcol_core::scan::scan_variants;
///
/// let policy = Policy::default();
/// let variants = scan_variants(
///     &FcScan::default(),
///     Path::new("/usr/share/fonts"),
///     &policy.preferred_style_langs,
/// )?;
///
/// let required = vec!["Noto Sans".to_string(), "Source Han Serif".to_string()];
/// let report = resolve(&variants, &required, &policy);
///
/// for choice in report.chosen() {
///     println!("{} -> {}", choice.family, choice.path.display());
/// }
///
/// collect_files(report.selected_files()?, Path::new("collected"))?;
/// #
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// ## The Cast of Characters
///
/// - [`record::FontLocation`]: where a face lives (file plus face index)
/// - [`inventory::FaceInventory`]: every name a face declares, by language
/// - [`expand::FontVariant`]: one matchable (file, face, family, style) unit
/// - [`policy::Policy`]: which styles, languages and families take part
/// - [`resolve::ResolveReport`]: the verdict, family by family
///
/// ---
///
/// Crafted with care at FontLab https://www.fontlab.com/

pub mod collect;
pub mod error;
pub mod expand;
pub mod introspect;
pub mod inventory;
pub mod output;
pub mod policy;
pub mod record;
pub mod resolve;
pub mod scan;
pub mod subtitle;
