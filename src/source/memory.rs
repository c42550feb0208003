use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use super::{Child, ChildKind, MenuSource};

#[derive(Debug, Clone)]
enum Node {
    Dir { readable: bool },
    File { contents: Option<String>, executable: bool },
}

/// In-memory directory tree implementing [`MenuSource`]
///
/// Parents are created on demand, so `with_script("/m/a/b.sh", ..)` also creates `/m` and
/// `/m/a`. Nodes can be removed after construction to simulate a tree changing underneath
/// a running menu.
#[derive(Debug, Default)]
pub struct MemorySource {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
}

impl MemorySource {
    #[must_use]
    pub fn new(root: impl AsRef<Path>) -> Self {
        let source = Self::default();
        source.insert(root.as_ref(), Node::Dir { readable: true });
        source
    }

    #[must_use]
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::Dir { readable: true });
        self
    }

    /// A directory that exists but cannot be listed
    #[must_use]
    pub fn with_locked_dir(self, path: impl AsRef<Path>) -> Self {
        self.insert(path.as_ref(), Node::Dir { readable: false });
        self
    }

    /// An executable file with the given contents
    #[must_use]
    pub fn with_script(self, path: impl AsRef<Path>, contents: &str) -> Self {
        self.insert(
            path.as_ref(),
            Node::File {
                contents: Some(contents.to_string()),
                executable: true,
            },
        );
        self
    }

    /// An executable file whose contents cannot be read
    #[must_use]
    pub fn with_locked_script(self, path: impl AsRef<Path>) -> Self {
        self.insert(
            path.as_ref(),
            Node::File {
                contents: None,
                executable: true,
            },
        );
        self
    }

    /// A plain, non-executable file
    #[must_use]
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        self.insert(
            path.as_ref(),
            Node::File {
                contents: Some(contents.to_string()),
                executable: false,
            },
        );
        self
    }

    /// Remove `path` and everything below it
    pub fn remove(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.nodes.borrow_mut().retain(|p, _| !p.starts_with(path));
    }

    fn insert(&self, path: &Path, node: Node) {
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors().skip(1) {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            nodes
                .entry(ancestor.to_path_buf())
                .or_insert(Node::Dir { readable: true });
        }
        nodes.insert(path.to_path_buf(), node);
    }
}

impl MenuSource for MemorySource {
    fn list(&self, dir: &Path) -> io::Result<Vec<Child>> {
        let nodes = self.nodes.borrow();
        match nodes.get(dir) {
            None => return Err(io::Error::from(io::ErrorKind::NotFound)),
            Some(Node::File { .. }) => return Err(io::Error::from(io::ErrorKind::NotADirectory)),
            Some(Node::Dir { readable: false }) => {
                return Err(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            Some(Node::Dir { readable: true }) => {}
        }

        Ok(nodes
            .iter()
            .filter(|(path, _)| path.parent() == Some(dir))
            .map(|(path, node)| Child {
                name: path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: path.clone(),
                kind: match node {
                    Node::Dir { .. } => ChildKind::Directory,
                    Node::File {
                        executable: true, ..
                    } => ChildKind::Executable,
                    Node::File { .. } => ChildKind::Other,
                },
            })
            .collect())
    }

    fn read_header(&self, file: &Path, max_lines: usize) -> io::Result<Vec<String>> {
        match self.nodes.borrow().get(file) {
            Some(Node::File {
                contents: Some(contents),
                ..
            }) => Ok(contents
                .lines()
                .take(max_lines)
                .map(str::to_string)
                .collect()),
            Some(Node::File { contents: None, .. }) => {
                Err(io::Error::from(io::ErrorKind::PermissionDenied))
            }
            Some(Node::Dir { .. }) => Err(io::Error::from(io::ErrorKind::IsADirectory)),
            None => Err(io::Error::from(io::ErrorKind::NotFound)),
        }
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Dir { .. }))
    }
}
