//! 軌道清單（`<主檔名>.tracks.json`）
//!
//! 與檔名規則攜帶相同資訊，但以結構化資料保存，封裝階段優先讀取。

use crate::error::RemuxError;
use crate::model::ExtractedFile;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const MANIFEST_SUFFIX: &str = "tracks.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackManifest {
    pub source: PathBuf,
    pub files: Vec<ExtractedFile>,
}

impl TrackManifest {
    #[must_use]
    pub const fn new(source: PathBuf, files: Vec<ExtractedFile>) -> Self {
        Self { source, files }
    }

    #[must_use]
    pub fn path_for(output_dir: &Path, stem: &str) -> PathBuf {
        output_dir.join(format!("{stem}.{MANIFEST_SUFFIX}"))
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(io::Error::other)?;
        fs::write(path, content)
    }

    pub fn load(path: &Path) -> Result<Self, RemuxError> {
        let content = fs::read_to_string(path).map_err(|e| RemuxError::Manifest {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| RemuxError::Manifest {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })
    }
}
