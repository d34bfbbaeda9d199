use crate::core::{Error, ProjectFile, Result};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Enumerates every file and directory under a project root.
///
/// Entries come back sorted by relative path, `/`-separated, without the
/// root itself. `.git` is never entered.
pub struct ProjectWalker {
    root: PathBuf,
    ignore_patterns: Vec<glob::Pattern>,
    respect_gitignore: bool,
}

impl ProjectWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ignore_patterns: Vec::new(),
            respect_gitignore: true,
        }
    }

    /// Glob patterns matched against the relative path; a match on a
    /// directory hides everything below it.
    pub fn with_ignore_patterns(mut self, patterns: &[String]) -> Result<Self> {
        self.ignore_patterns = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<_, _>>()?;
        Ok(self)
    }

    pub fn respect_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    pub fn walk(&self) -> Result<Vec<ProjectFile>> {
        if !self.root.is_dir() {
            return Err(Error::file_system(
                format!("project root is not a directory: {}", self.root.display()),
                self.root.clone(),
            ));
        }

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .ignore(self.respect_gitignore)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .build();

        let mut entries = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            if entry.depth() == 0 {
                continue;
            }
            let Some(relative_path) = relative_path(&self.root, entry.path()) else {
                continue;
            };
            if self.is_ignored(&relative_path) {
                continue;
            }

            let is_dir = entry.file_type().is_some_and(|ft| ft.is_dir());
            entries.push(if is_dir {
                ProjectFile::dir(relative_path)
            } else {
                ProjectFile::file(relative_path)
            });
        }

        entries.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
        Ok(entries)
    }

    fn is_ignored(&self, relative_path: &str) -> bool {
        self.ignore_patterns.iter().any(|pattern| {
            pattern.matches(relative_path)
                || ancestors(relative_path).any(|dir| pattern.matches(dir))
        })
    }
}

fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    (!parts.is_empty()).then(|| parts.join("/"))
}

/// `a/b/c.py` -> `a`, `a/b`
fn ancestors(relative_path: &str) -> impl Iterator<Item = &str> {
    relative_path
        .match_indices('/')
        .map(move |(i, _)| &relative_path[..i])
}

/// Sorted project entries under `root`, honouring `.gitignore`.
pub fn enumerate_project_files(root: &Path) -> Result<Vec<ProjectFile>> {
    ProjectWalker::new(root).walk()
}
