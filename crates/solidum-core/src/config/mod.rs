//! Per-invocation configuration
//!
//! This module provides:
//! - Project detection (monorepo vs single package)
//! - The declarative build layer table used for parallel monorepo builds

pub mod layers;

pub use layers::{BuildLayers, LAYERS_FILE};

use std::path::{Path, PathBuf};

/// Marker file that identifies a pnpm workspace root
pub const WORKSPACE_FILE: &str = "pnpm-workspace.yaml";

/// Shape of the project a command runs in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectKind {
    Monorepo,
    Single,
}

impl ProjectKind {
    pub fn is_monorepo(&self) -> bool {
        matches!(self, ProjectKind::Monorepo)
    }
}

/// Everything a command needs to know about where it runs.
/// Built once per invocation and passed down explicitly.
#[derive(Debug, Clone)]
pub struct ProjectContext {
    pub root: PathBuf,
    pub kind: ProjectKind,
}

impl ProjectContext {
    /// Inspect `root` to decide the project kind
    pub fn detect(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let kind = if root.join(WORKSPACE_FILE).is_file() {
            ProjectKind::Monorepo
        } else {
            ProjectKind::Single
        };
        Self { root, kind }
    }

    pub fn is_monorepo(&self) -> bool {
        self.kind.is_monorepo()
    }

    pub fn path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }
}
