use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use log::debug;

use super::{Child, ChildKind, MAX_HEADER_BYTES, MenuSource};

/// [`MenuSource`] backed by the real filesystem. Symlinks are followed.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiskSource;

impl MenuSource for DiskSource {
    fn list(&self, dir: &Path) -> io::Result<Vec<Child>> {
        let mut children = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().into_owned();
            // fs::metadata follows symlinks, so a dangling link lands here
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    debug!("Skipping {}: {e}", path.display());
                    continue;
                }
            };
            let kind = if metadata.is_dir() {
                ChildKind::Directory
            } else if metadata.is_file() && is_executable(&metadata) {
                ChildKind::Executable
            } else {
                ChildKind::Other
            };
            children.push(Child { name, path, kind });
        }
        Ok(children)
    }

    fn read_header(&self, file: &Path, max_lines: usize) -> io::Result<Vec<String>> {
        let mut reader = BufReader::new(File::open(file)?.take(MAX_HEADER_BYTES));
        let mut lines = Vec::new();
        let mut buf = Vec::new();
        while lines.len() < max_lines {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = String::from_utf8_lossy(&buf);
            lines.push(line.trim_end_matches(['\n', '\r']).to_string());
        }
        Ok(lines)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

#[cfg(unix)]
fn is_executable(metadata: &fs::Metadata) -> bool {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & 0o111 != 0
}

#[cfg(not(unix))]
fn is_executable(_metadata: &fs::Metadata) -> bool {
    true
}
