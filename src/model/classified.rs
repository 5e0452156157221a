use super::role::RoleAssignment;
use super::track::{Track, TrackKind};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 分類後的軌道
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTrack {
    pub track: Track,
    pub role: RoleAssignment,
    /// 輸出使用的語言代碼（音訊缺語言時為預設語言，不會是空字串）
    pub language: String,
    /// 同語言音訊的區分後綴，例如次要版本的 `q`
    pub variant: Option<String>,
    /// 抽出檔案的副檔名
    pub extension: String,
}

impl ClassifiedTrack {
    #[must_use]
    pub const fn kind(&self) -> TrackKind {
        self.track.kind
    }
}

/// 抽出到磁碟上的單一軌道
///
/// 由 StreamExtractor 建立，交給 AudioNormalizer 或 RemuxPlanner 使用；
/// 刪除由外部清理負責。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFile {
    pub path: PathBuf,
    pub source_track: u32,
    pub kind: TrackKind,
    pub role: RoleAssignment,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
}

impl ExtractedFile {
    #[must_use]
    pub fn from_classified(classified: &ClassifiedTrack, path: PathBuf) -> Self {
        Self {
            path,
            source_track: classified.track.id,
            kind: classified.track.kind,
            role: classified.role,
            language: classified.language.clone(),
            variant: classified.variant.clone(),
        }
    }

    /// 以相同分類指向另一個檔案（例如重新編碼後的音訊）
    #[must_use]
    pub fn with_path(&self, path: PathBuf) -> Self {
        Self {
            path,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TrackRole;

    #[test]
    fn test_extracted_file_keeps_variant() {
        let classified = ClassifiedTrack {
            track: Track::new(1, TrackKind::Audio, "AC-3").with_language("fre"),
            role: RoleAssignment::Known(TrackRole::Main),
            language: "fre".to_string(),
            variant: Some("q".to_string()),
            extension: "ac3".to_string(),
        };
        let file = ExtractedFile::from_classified(
            &classified,
            PathBuf::from("/tmp/a.audio_1_fre_q_main.ac3"),
        );
        assert_eq!(file.language, "fre");
        assert_eq!(file.variant.as_deref(), Some("q"));
        assert_eq!(file.source_track, 1);
    }

    #[test]
    fn test_extracted_file_with_path_keeps_classification() {
        let file = ExtractedFile {
            path: PathBuf::from("/tmp/a.audio_1_fre_main.ac3"),
            source_track: 1,
            kind: TrackKind::Audio,
            role: RoleAssignment::Known(TrackRole::Main),
            language: "fre".to_string(),
            variant: None,
        };
        let encoded = file.with_path(PathBuf::from("/tmp/a.audio_1_fre_main.m4a"));
        assert_eq!(encoded.source_track, 1);
        assert_eq!(encoded.role, file.role);
        assert_eq!(encoded.path, PathBuf::from("/tmp/a.audio_1_fre_main.m4a"));
    }
}
