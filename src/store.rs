//! JSON persistence for the page tree.
//!
//! Two on-disk layouts are understood: the nested one (`children` arrays) and
//! a flat list linked through `parentId`. Either way the structural fields
//! are recomputed on load, so hand-edited `depth` values are harmless.

use crate::errors::TreeError;
use crate::model::{FlatNode, PageItem, PageNode};
use crate::tree::{self, OrphanPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid tree: {0}")]
    Tree(#[from] TreeError),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    #[default]
    Nested,
    Flat,
}

/// Loads and persists the committed tree.
pub trait TreeStore {
    fn load(&self) -> StoreResult<Vec<PageNode>>;
    fn save(&self, tree: &[PageNode]) -> StoreResult<()>;
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    format: DocumentFormat,
    orphans: OrphanPolicy,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>, format: DocumentFormat, orphans: OrphanPolicy) -> Self {
        Self {
            path: path.into(),
            format,
            orphans,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Parses a document held in memory. Used by `load` and by tests.
    pub fn parse(&self, content: &str) -> StoreResult<Vec<PageNode>> {
        let flat = match self.format {
            DocumentFormat::Nested => {
                let nested: Vec<PageNode> = serde_json::from_str(content)?;
                tree::flatten(&nested)
            }
            DocumentFormat::Flat => serde_json::from_str::<Vec<FlatNode<PageItem>>>(content)?,
        };

        let rebuilt = tree::rebuild_with(&flat, self.orphans)?;
        tree::validate(&rebuilt)?;
        Ok(rebuilt)
    }

    pub fn render(&self, tree: &[PageNode]) -> StoreResult<String> {
        let content = match self.format {
            DocumentFormat::Nested => serde_json::to_string_pretty(tree)?,
            DocumentFormat::Flat => serde_json::to_string_pretty(&tree::flatten(tree))?,
        };
        Ok(content)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        if source.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(self.path.clone())
        } else {
            StoreError::Io {
                path: self.path.clone(),
                source,
            }
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TreeStore for JsonFileStore {
    fn load(&self) -> StoreResult<Vec<PageNode>> {
        let content = fs::read_to_string(&self.path).map_err(|e| self.io_error(e))?;
        let tree = self.parse(&content)?;
        info!(
            path = %self.path.display(),
            nodes = tree::count_nodes(&tree),
            "loaded tree"
        );
        Ok(tree)
    }

    /// Writes to a sibling temp file first and renames it over the target,
    /// so a failed write never leaves a truncated document behind.
    fn save(&self, tree: &[PageNode]) -> StoreResult<()> {
        let content = self.render(tree)?;
        let temp = self.temp_path();
        fs::write(&temp, content).map_err(|e| self.io_error(e))?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            if let Err(cleanup) = fs::remove_file(&temp) {
                warn!(path = %temp.display(), error = %cleanup, "cannot remove temp file");
            }
            return Err(self.io_error(e));
        }
        debug!(path = %self.path.display(), format = ?self.format, "saved tree");
        Ok(())
    }
}
