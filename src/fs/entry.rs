use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};

/// Type of filesystem object, taken from the directory entry itself
/// (symlinks are not followed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    Symlink,
    Other,
}

impl EntryKind {
    /// Classify a `fs::FileType` without following symlinks.
    pub fn from_file_type(ft: fs::FileType) -> Self {
        if ft.is_symlink() {
            EntryKind::Symlink
        } else if ft.is_dir() {
            EntryKind::Dir
        } else if ft.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        }
    }
}

/// One row of the flattened view: a filesystem object plus the directory
/// path that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub name: OsString,
    pub kind: EntryKind,
    pub containing: PathBuf,
}

impl Entry {
    pub fn new(containing: impl Into<PathBuf>, name: impl Into<OsString>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            containing: containing.into(),
        }
    }

    /// `containing + "/" + name`, concatenated as raw OS strings.
    ///
    /// This is deliberately not `Path::join`: the stored string is what prefix
    /// matching and sorting operate on.
    pub fn full_path(&self) -> PathBuf {
        let mut s = OsString::with_capacity(
            self.containing.as_os_str().len() + 1 + self.name.len(),
        );
        s.push(self.containing.as_os_str());
        s.push("/");
        s.push(&self.name);
        PathBuf::from(s)
    }

    /// Key used to establish the prefix-ordering invariant.
    ///
    /// Raw bytes of the full path with `/` mapped below every other byte, so
    /// `dirA/x` always sorts before the sibling `dirA.txt`.
    pub fn sort_key(&self) -> Vec<u8> {
        self.full_path()
            .into_os_string()
            .into_encoded_bytes()
            .into_iter()
            .map(|b| if b == b'/' { 0 } else { b })
            .collect()
    }

    /// Whether this entry lives somewhere below `dir_prefix`, which must end
    /// with `/`. Raw byte prefix test.
    pub fn is_below(&self, dir_prefix: &OsStr) -> bool {
        self.full_path()
            .as_os_str()
            .as_encoded_bytes()
            .starts_with(dir_prefix.as_encoded_bytes())
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Dir
    }

    /// Name for display, lossily converted.
    pub fn name_lossy(&self) -> String {
        self.name.to_string_lossy().into_owned()
    }

    /// The text shown for this entry in the view.
    ///
    /// A leading `./` is dropped and entries listed directly from `.` show
    /// only their name.
    pub fn display(&self) -> String {
        let containing = self.containing.to_string_lossy();
        let containing = containing.strip_prefix("./").unwrap_or(containing.as_ref());
        if containing == "." {
            self.name_lossy()
        } else {
            format!("{}/{}", containing, self.name_lossy())
        }
    }
}

/// The `full_path + "/"` prefix every descendant of `dir` starts with.
pub fn subtree_prefix(dir: &Entry) -> OsString {
    let mut prefix = dir.full_path().into_os_string();
    prefix.push("/");
    prefix
}

/// List the immediate children of `dir`, tagging each with `dir` as its
/// containing path.
///
/// `.` is never produced. `..` is included as a directory, so the user can
/// step upward from any listing. Entries whose type cannot be read are
/// skipped.
pub fn list_children(dir: &Path) -> std::io::Result<Vec<Entry>> {
    let mut children = vec![Entry::new(dir, "..", EntryKind::Dir)];
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };
        let kind = match entry.file_type() {
            Ok(ft) => EntryKind::from_file_type(ft),
            Err(_) => continue,
        };
        children.push(Entry::new(dir, entry.file_name(), kind));
    }
    Ok(children)
}
