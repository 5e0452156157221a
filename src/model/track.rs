use serde::{Deserialize, Serialize};
use std::fmt;

/// 軌道種類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackKind {
    Video,
    Audio,
    Subtitle,
}

impl TrackKind {
    /// 檔名與 manifest 使用的識別字
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
            Self::Subtitle => "subtitle",
        }
    }

    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "subtitle" => Some(Self::Subtitle),
            _ => None,
        }
    }

    /// mkvmerge -J 的 `type` 欄位（subtitles 為複數）
    #[must_use]
    pub fn from_mkvmerge(kind: &str) -> Option<Self> {
        match kind {
            "video" => Some(Self::Video),
            "audio" => Some(Self::Audio),
            "subtitles" => Some(Self::Subtitle),
            _ => None,
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 容器中單一軌道的原始中繼資料
///
/// 缺少的欄位一律保留為 `None`，不以空字串或 `false` 代替，
/// 以免分類結果被默默改變。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: u32,
    pub kind: TrackKind,
    pub codec_family: String,
    pub language: Option<String>,
    pub display_name: Option<String>,
    pub forced: Option<bool>,
}

impl Track {
    #[must_use]
    pub fn new(id: u32, kind: TrackKind, codec_family: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            codec_family: codec_family.into(),
            language: None,
            display_name: None,
            forced: None,
        }
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = normalize_language(Some(&language.into()));
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.display_name = (!name.trim().is_empty()).then_some(name);
        self
    }

    #[must_use]
    pub const fn with_forced(mut self, forced: bool) -> Self {
        self.forced = Some(forced);
        self
    }

    #[must_use]
    pub fn is_forced(&self) -> bool {
        self.forced == Some(true)
    }
}

/// 語言代碼正規化：小寫、去空白，`und` 與空字串視為未知
#[must_use]
pub fn normalize_language(raw: Option<&str>) -> Option<String> {
    let code = raw?.trim().to_lowercase();
    if code.is_empty() || code == "und" {
        None
    } else {
        Some(code)
    }
}
