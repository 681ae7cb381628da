use std::fs;
use std::path::PathBuf;

use fontcol_core::collect::collect_files;
use tempfile::tempdir;

#[test]
fn copies_files_into_fresh_directory() {
    let tmp = tempdir().expect("tempdir");
    let fonts = tmp.path().join("fonts");
    fs::create_dir_all(fonts.join("nested")).expect("mkdir");
    let a = fonts.join("a.ttf");
    let b = fonts.join("nested").join("b.otc");
    fs::write(&a, b"font-a").expect("write a");
    fs::write(&b, b"font-b").expect("write b");

    let out = tmp.path().join("collected");
    let copied = collect_files(&[a.clone(), b.clone()], &out).expect("collect");

    assert_eq!(copied, vec![out.join("a.ttf"), out.join("b.otc")]);
    assert_eq!(fs::read(out.join("a.ttf")).expect("read"), b"font-a");
    assert_eq!(fs::read(out.join("b.otc")).expect("read"), b"font-b");
}

#[test]
fn existing_destination_is_refused() {
    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("a.ttf");
    fs::write(&src, b"font").expect("write");
    let out = tmp.path().join("collected");
    fs::create_dir(&out).expect("mkdir");

    let err = collect_files(&[src], &out).unwrap_err();
    assert!(err.to_string().contains("creating output directory"));
    assert_eq!(fs::read_dir(&out).expect("read dir").count(), 0);
}

#[test]
fn same_file_name_from_two_sources_fails() {
    let tmp = tempdir().expect("tempdir");
    let first = tmp.path().join("one").join("font.ttf");
    let second = tmp.path().join("two").join("font.ttf");
    for path in [&first, &second] {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, b"font").expect("write");
    }

    let out = tmp.path().join("collected");
    let result = collect_files(&[first, second], &out);

    assert!(result.is_err());
    assert!(out.join("font.ttf").exists());
}

#[test]
fn missing_source_is_an_error() {
    let tmp = tempdir().expect("tempdir");
    let out = tmp.path().join("collected");
    let result = collect_files(&[PathBuf::from("/nonexistent/fontcol/a.ttf")], &out);
    assert!(result.is_err());
}

#[test]
fn keeps_modification_time() {
    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("a.ttf");
    fs::write(&src, b"font").expect("write");
    let old = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(1_000_000_000);
    fs::File::options()
        .write(true)
        .open(&src)
        .expect("open")
        .set_modified(old)
        .expect("set mtime");

    let out = tmp.path().join("collected");
    collect_files(&[&src], &out).expect("collect");

    let copied = fs::metadata(out.join("a.ttf")).expect("metadata");
    assert_eq!(copied.modified().expect("mtime"), old);
}

#[cfg(unix)]
#[test]
fn keeps_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = tempdir().expect("tempdir");
    let src = tmp.path().join("a.ttf");
    fs::write(&src, b"font").expect("write");
    fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).expect("chmod");

    let out = tmp.path().join("collected");
    collect_files(&[&src], &out).expect("collect");

    let mode = fs::metadata(out.join("a.ttf")).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o640);
}
