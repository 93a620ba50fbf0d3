use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

fn temp_path(path: &Path) -> io::Result<PathBuf> {
    let mut name: OsString = path.file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?
        .to_owned();
    name.push(".tmp");
    return Ok(path.with_file_name(name));
}

/// Replaces the file at `path` with `contents`: the new text goes to a
/// sibling temp file which is synced and then renamed over the original,
/// so a crash leaves either the old or the new document, never half of one.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp = temp_path(path)?;
    let file = File::create(&temp)?;
    write_synced(file, contents)
        .and_then(|_| fs::rename(&temp, path))
        .map_err(|err| {
            // no partial temp file outlives a failed write
            let _ = fs::remove_file(&temp);
            err
        })
}

fn write_synced(file: File, contents: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    writer.write_all(contents.as_bytes())?;
    writer.flush()?;
    return writer.get_ref().sync_all();
}
