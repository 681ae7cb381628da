use super::*;
use clap::CommandFactory;
use std::io::Cursor;
use tempfile::tempdir;

fn resolve_args(cli: Cli) -> ResolveArgs {
    match cli.command {
        Command::Resolve(args) => args,
        other => panic!("expected resolve, got {other:?}"),
    }
}

#[test]
fn parses_resolve_args_with_defaults() {
    let cli = Cli::try_parse_from(["fontcol", "resolve", "/fonts"]).expect("parse cli");
    assert_eq!(cli.verbose, 0);

    let args = resolve_args(cli);
    assert_eq!(args.font_root, PathBuf::from("/fonts"));
    assert_eq!(args.output, PathBuf::from("collected"));
    assert!(args.families.is_none());
    assert!(!args.dry_run);
    assert!(!args.json);

    let policy = args.policy.build().expect("policy");
    assert_eq!(policy, Policy::default());
}

#[test]
fn policy_flags_layer_over_defaults() {
    let cli = Cli::try_parse_from([
        "fontcol",
        "-vv",
        "resolve",
        "--style-lang",
        "ja,en",
        "--style",
        "Regular,Book",
        "--style-exempt",
        "Fancy Display",
        "--ignore-family",
        "Wingdings",
        "--no-postscript-fallback",
        "/fonts",
    ])
    .expect("parse cli");
    assert_eq!(cli.verbose, 2);

    let policy = resolve_args(cli).policy.build().expect("policy");
    assert_eq!(policy.preferred_style_langs, vec!["ja".to_string(), "en".to_string()]);
    assert!(policy.preferred_styles.contains("Book"));
    assert!(!policy.preferred_styles.contains("Bold"));
    assert!(policy.style_exempt_families.contains("Fancy Display"));
    assert!(policy.style_exempt_families.contains("汉仪旗黑-35S"));
    assert!(policy.ignored_families.contains("Wingdings"));
    assert!(policy.ignored_families.contains("微软雅黑"));
    assert!(!policy.allow_postscript_fallback);
}

#[test]
fn policy_file_is_loaded_before_flags() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("policy.json");
    std::fs::write(&path, r#"{ "ignored_families": ["Arial"] }"#).expect("write");

    let args = PolicyArgs {
        policy_file: Some(path),
        ignore_families: vec!["Wingdings".to_string()],
        ..PolicyArgs::default()
    };
    let policy = args.build().expect("policy");

    assert!(policy.ignored_families.contains("Arial"));
    assert!(policy.ignored_families.contains("Wingdings"));
    assert!(!policy.ignored_families.contains("微软雅黑"));
}

#[test]
fn subtitles_encoding_defaults_to_utf8() {
    let cli = Cli::try_parse_from(["fontcol", "subtitles", "/subs"]).expect("parse cli");
    let Command::Subtitles(args) = cli.command else {
        panic!("expected subtitles");
    };
    assert_eq!(args.encoding, "utf-8");

    let cli = Cli::try_parse_from(["fontcol", "subtitles", "--encoding", "gbk", "/subs"])
        .expect("parse cli");
    let Command::Subtitles(args) = cli.command else {
        panic!("expected subtitles");
    };
    assert_eq!(args.encoding, "gbk");
}

#[test]
fn json_and_ndjson_conflict() {
    let parse = Cli::try_parse_from(["fontcol", "variants", "--json", "--ndjson", "/fonts"]);
    assert!(parse.is_err());
}

#[test]
fn resolve_requires_font_root() {
    assert!(Cli::try_parse_from(["fontcol", "resolve"]).is_err());
}

#[test]
fn required_families_come_from_stdin_by_default() {
    let stdin = Cursor::new("Arial\n\nNoto Sans\r\n".as_bytes().to_vec());
    let families = read_required(None, stdin).expect("read");
    assert_eq!(families, vec!["Arial".to_string(), "Noto Sans".to_string()]);

    let stdin = Cursor::new(b"Arial\n".to_vec());
    let families = read_required(Some(Path::new("-")), stdin).expect("read");
    assert_eq!(families, vec!["Arial".to_string()]);
}

#[test]
fn required_families_can_come_from_a_file() {
    let tmp = tempdir().expect("tempdir");
    let path = tmp.path().join("families.txt");
    std::fs::write(&path, "汉仪旗黑-35S\nArial\n").expect("write");

    let families = read_required(Some(path.as_path()), Cursor::new(Vec::new())).expect("read");
    assert_eq!(families, vec!["汉仪旗黑-35S".to_string(), "Arial".to_string()]);

    let missing = read_required(Some(tmp.path().join("nope.txt").as_path()), Cursor::new(Vec::new()));
    assert!(missing.is_err());
}

#[test]
fn explicit_fc_scan_wins() {
    let scan = introspector(Some(PathBuf::from("/opt/fontconfig/bin/fc-scan")));
    assert_eq!(scan.program(), Path::new("/opt/fontconfig/bin/fc-scan"));
}

#[test]
fn help_output_lists_subcommands_and_policy_flags() {
    let mut root = Cli::command();
    let help = root.render_long_help().to_string();
    assert!(help.contains("subtitles"));
    assert!(help.contains("variants"));
    assert!(help.contains("resolve"));

    let resolve = root
        .find_subcommand_mut("resolve")
        .expect("resolve command present");
    let help = resolve.render_long_help().to_string();
    assert!(help.contains("--ignore-family"));
    assert!(help.contains("--dry-run"));
}
