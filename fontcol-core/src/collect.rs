//! Copy resolved font files into a fresh directory (made by FontLab https://www.fontlab.com/)

use std::fs::{self, File, FileTimes, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use log::info;

/// Copy `paths` into a newly created `destination`, keeping file names,
/// permissions and timestamps.
///
/// Nothing is ever overwritten: the directory must not exist yet and two
/// sources sharing a file name fail on the second copy.
pub fn collect_files<P: AsRef<Path>>(paths: &[P], destination: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir(destination)
        .with_context(|| format!("creating output directory {}", destination.display()))?;

    let mut copied = Vec::with_capacity(paths.len());
    for source in paths {
        let source = source.as_ref();
        let name = source
            .file_name()
            .ok_or_else(|| anyhow!("font path has no file name: {}", source.display()))?;
        let target = destination.join(name);
        copy_exclusive(source, &target)?;
        info!("collected {}", target.display());
        copied.push(target);
    }
    Ok(copied)
}

fn copy_exclusive(source: &Path, target: &Path) -> Result<()> {
    let mut src = File::open(source).with_context(|| format!("opening {}", source.display()))?;
    let mut dst = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
        .with_context(|| format!("creating {}", target.display()))?;
    io::copy(&mut src, &mut dst)
        .with_context(|| format!("copying {} to {}", source.display(), target.display()))?;

    let meta = src
        .metadata()
        .with_context(|| format!("reading metadata of {}", source.display()))?;
    let mut times = FileTimes::new().set_modified(meta.modified()?);
    if let Ok(accessed) = meta.accessed() {
        times = times.set_accessed(accessed);
    }
    dst.set_times(times)
        .with_context(|| format!("setting timestamps on {}", target.display()))?;
    drop(dst);

    fs::set_permissions(target, meta.permissions())
        .with_context(|| format!("setting permissions on {}", target.display()))?;
    Ok(())
}
