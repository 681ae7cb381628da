//! fontcol CLI (made by FontLab https://www.fontlab.com/)

use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};
use log::{info, LevelFilter};

use fontcol_core::collect::collect_files;
use fontcol_core::introspect::FcScan;
use fontcol_core::output::{
    write_json_pretty, write_ndjson, write_report_plain, write_variants_plain,
};
use fontcol_core::policy::Policy;
use fontcol_core::resolve::{parse_required_families, resolve};
use fontcol_core::scan::scan_variants;
use fontcol_core::subtitle::SubtitleScanner;

/// CLI entrypoint for fontcol.
#[derive(Debug, Parser)]
#[command(
    name = "fontcol",
    about = "Collect exactly the font files your subtitles need (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the font families named by .ass subtitles under a directory
    Subtitles(SubtitlesArgs),
    /// List every (family, style) variant the installed fonts expose
    Variants(VariantsArgs),
    /// Pick one file per required family and copy the winners
    Resolve(ResolveArgs),
}

#[derive(Debug, Args)]
struct SubtitlesArgs {
    /// Directory searched recursively for .ass files
    #[arg(value_hint = ValueHint::DirPath)]
    root: PathBuf,

    /// Text encoding of the subtitle files (e.g. utf-16, gbk, big5); a BOM overrides it
    #[arg(long = "encoding", default_value = "utf-8")]
    encoding: String,

    /// Emit families and warnings as a JSON object
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Debug, Args)]
struct VariantsArgs {
    /// Directory of installed font files
    #[arg(value_hint = ValueHint::DirPath)]
    font_root: PathBuf,

    /// Preferred style languages, in order (default: en)
    #[arg(long = "style-lang", value_delimiter = ',')]
    style_langs: Vec<String>,

    /// fc-scan binary to run (default: $FONTCOL_FC_SCAN or fc-scan)
    #[arg(long = "fc-scan", value_hint = ValueHint::ExecutablePath)]
    fc_scan: Option<PathBuf>,

    /// Emit a single JSON array
    #[arg(long = "json", action = ArgAction::SetTrue, conflicts_with = "ndjson")]
    json: bool,

    /// Emit newline-delimited JSON
    #[arg(long = "ndjson", action = ArgAction::SetTrue)]
    ndjson: bool,
}

#[derive(Debug, Args)]
struct ResolveArgs {
    /// Directory of installed font files
    #[arg(value_hint = ValueHint::DirPath)]
    font_root: PathBuf,

    /// File of newline-separated required families ("-" or absent: STDIN)
    #[arg(long = "families", value_hint = ValueHint::FilePath)]
    families: Option<PathBuf>,

    /// Directory to create and fill with the selected files
    #[arg(short = 'o', long = "output", default_value = "collected", value_hint = ValueHint::DirPath)]
    output: PathBuf,

    /// Resolve and report without copying anything
    #[arg(long = "dry-run", action = ArgAction::SetTrue)]
    dry_run: bool,

    /// Emit the resolution report as JSON
    #[arg(long = "json", action = ArgAction::SetTrue)]
    json: bool,

    /// fc-scan binary to run (default: $FONTCOL_FC_SCAN or fc-scan)
    #[arg(long = "fc-scan", value_hint = ValueHint::ExecutablePath)]
    fc_scan: Option<PathBuf>,

    #[command(flatten)]
    policy: PolicyArgs,
}

#[derive(Debug, Default, Args)]
struct PolicyArgs {
    /// JSON policy file; flags below are applied on top of it
    #[arg(long = "policy", value_hint = ValueHint::FilePath)]
    policy_file: Option<PathBuf>,

    /// Replace the preferred style languages, in order
    #[arg(long = "style-lang", value_delimiter = ',')]
    style_langs: Vec<String>,

    /// Replace the accepted styles (default: Regular,Bold)
    #[arg(long = "style", value_delimiter = ',')]
    styles: Vec<String>,

    /// Also accept any style for this family (repeatable)
    #[arg(long = "style-exempt")]
    style_exempt: Vec<String>,

    /// Never collect this family (repeatable)
    #[arg(long = "ignore-family")]
    ignore_families: Vec<String>,

    /// Do not match families against PostScript names
    #[arg(long = "no-postscript-fallback", action = ArgAction::SetTrue)]
    no_postscript_fallback: bool,
}

impl PolicyArgs {
    fn build(&self) -> Result<Policy> {
        let mut policy = match &self.policy_file {
            Some(path) => Policy::from_json_file(path)?,
            None => Policy::default(),
        };

        if !self.style_langs.is_empty() {
            policy.preferred_style_langs = self.style_langs.clone();
        }
        if !self.styles.is_empty() {
            policy.preferred_styles = self.styles.iter().cloned().collect();
        }
        policy
            .style_exempt_families
            .extend(self.style_exempt.iter().cloned());
        policy
            .ignored_families
            .extend(self.ignore_families.iter().cloned());
        if self.no_postscript_fallback {
            policy.allow_postscript_fallback = false;
        }

        Ok(policy)
    }
}

/// Parse CLI args and execute the selected command.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Subtitles(args) => run_subtitles(args),
        Command::Variants(args) => run_variants(args),
        Command::Resolve(args) => run_resolve(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .try_init();
}

fn run_subtitles(args: SubtitlesArgs) -> Result<()> {
    let fonts = SubtitleScanner::new()?
        .with_encoding(&args.encoding)?
        .scan_dir(&args.root)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.json {
        write_json_pretty(&fonts, &mut handle)?;
    } else {
        fonts.write_warnings(io::stderr().lock())?;
        fonts.write_families(&mut handle)?;
    }
    Ok(())
}

fn run_variants(args: VariantsArgs) -> Result<()> {
    let style_langs = if args.style_langs.is_empty() {
        Policy::default().preferred_style_langs
    } else {
        args.style_langs
    };
    let variants = scan_variants(&introspector(args.fc_scan), &args.font_root, &style_langs)?;

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if args.ndjson {
        write_ndjson(&variants, &mut handle)?;
    } else if args.json {
        write_json_pretty(&variants, &mut handle)?;
    } else {
        write_variants_plain(&variants, &mut handle)?;
    }
    Ok(())
}

fn run_resolve(args: ResolveArgs) -> Result<()> {
    let policy = args.policy.build()?;
    if !args.dry_run && args.output.exists() {
        bail!("output directory already exists: {}", args.output.display());
    }

    let stdin = io::stdin();
    let required = read_required(args.families.as_deref(), stdin.lock())?;
    info!("{} required families", required.len());

    let variants = scan_variants(
        &introspector(args.fc_scan),
        &args.font_root,
        &policy.preferred_style_langs,
    )?;
    let report = resolve(&variants, &required, &policy);

    {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        if args.json {
            write_json_pretty(&report, &mut handle)?;
        } else {
            write_report_plain(&report, &mut handle)?;
        }
        handle.flush()?;
    }

    let files = report.selected_files()?;
    if args.dry_run {
        info!("dry run: {} files not copied", files.len());
        return Ok(());
    }

    let copied = collect_files(files, &args.output)?;
    info!("copied {} files into {}", copied.len(), args.output.display());
    Ok(())
}

fn introspector(program: Option<PathBuf>) -> FcScan {
    program.map(FcScan::new).unwrap_or_else(FcScan::from_env)
}

fn read_required(source: Option<&Path>, mut stdin: impl BufRead) -> Result<Vec<String>> {
    let mut text = String::new();
    match source {
        Some(path) if path != Path::new("-") => {
            text = fs::read_to_string(path)
                .with_context(|| format!("reading required families from {}", path.display()))?;
        }
        _ => {
            stdin
                .read_to_string(&mut text)
                .context("reading required families from STDIN")?;
        }
    }
    Ok(parse_required_families(&text))
}

#[cfg(test)]
mod tests;
