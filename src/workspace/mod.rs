//! The output folder agents work in.
//!
//! Every path a tool receives is relative to the workspace root. Absolute
//! paths and `..` components that climb above the root are rejected, and
//! existing paths are canonicalized so a symlink cannot lead outside.

use crate::error::{DevAgentsError, Result};
use crate::tools::ToolError;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Create the root directory if needed and open it.
    pub async fn create(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref();
        tokio::fs::create_dir_all(root).await.map_err(|e| {
            DevAgentsError::UserError(format!(
                "failed to create output folder '{}': {}",
                root.display(),
                e
            ))
        })?;
        let root = tokio::fs::canonicalize(root).await.map_err(|e| {
            DevAgentsError::UserError(format!(
                "failed to resolve output folder '{}': {}",
                root.display(),
                e
            ))
        })?;

        tracing::info!(root = %root.display(), "workspace ready");
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve an optional working directory. It must already exist.
    pub fn resolve_dir(&self, dir: Option<&str>) -> std::result::Result<PathBuf, ToolError> {
        let Some(dir) = dir.filter(|d| !d.trim().is_empty()) else {
            return Ok(self.root.clone());
        };

        let path = self.join(dir)?;
        if !path.is_dir() {
            return Err(ToolError::WorkingDirectoryNotFound(dir.to_string()));
        }
        self.check_inside(&path, dir)?;
        Ok(path)
    }

    /// Resolve a file path. The file itself need not exist.
    pub fn resolve_file(&self, file: &str) -> std::result::Result<PathBuf, ToolError> {
        if file.trim().is_empty() {
            return Err(ToolError::InvalidArguments("file must not be empty".to_string()));
        }

        let path = self.join(file)?;
        if path == self.root {
            return Err(ToolError::InvalidArguments(format!(
                "'{file}' is the workspace root, not a file"
            )));
        }
        self.check_inside(&path, file)?;
        Ok(path)
    }

    /// Lexically join `relative` onto the root.
    fn join(&self, relative: &str) -> std::result::Result<PathBuf, ToolError> {
        let mut path = self.root.clone();
        let mut depth = 0usize;

        for component in Path::new(relative).components() {
            match component {
                Component::CurDir => {}
                Component::Normal(part) => {
                    path.push(part);
                    depth += 1;
                }
                Component::ParentDir if depth > 0 => {
                    path.pop();
                    depth -= 1;
                }
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                    return Err(ToolError::PathEscapesRoot(relative.to_string()));
                }
            }
        }
        Ok(path)
    }

    /// Canonicalize the deepest existing ancestor and make sure it is still
    /// under the root.
    fn check_inside(&self, path: &Path, original: &str) -> std::result::Result<(), ToolError> {
        let mut probe = Some(path);
        while let Some(candidate) = probe {
            if let Ok(canonical) = std::fs::canonicalize(candidate) {
                if canonical.starts_with(&self.root) {
                    return Ok(());
                }
                tracing::warn!(path = %original, resolved = %canonical.display(), "path resolves outside workspace");
                return Err(ToolError::PathEscapesRoot(original.to_string()));
            }
            probe = candidate.parent();
        }
        Ok(())
    }
}
