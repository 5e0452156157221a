use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

pub const MAX_RECENT_PATHS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileTypeTable {
    #[serde(rename = "VIDEO_FILE")]
    pub video_file: Vec<String>,
}

impl FileTypeTable {
    #[must_use]
    pub fn video_extensions_set(&self) -> HashSet<String> {
        self.video_file
            .iter()
            .map(|ext| ext.to_lowercase())
            .collect()
    }

    #[must_use]
    pub fn is_video_file(&self, path: &Path) -> bool {
        let video_extensions = self.video_extensions_set();
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| video_extensions.contains(&format!(".{}", ext.to_lowercase())))
    }
}

/// 介面語言
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "zh-TW")]
    ZhTw,
}

impl Language {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::EnUs => "en-US",
            Self::ZhTw => "zh-TW",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EnUs => write!(f, "English"),
            Self::ZhTw => write!(f, "繁體中文"),
        }
    }
}

/// 軌道篩選與分類規則
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionSettings {
    /// 目標語言族（前綴比對，例如 `fr` 同時涵蓋 `fre`、`fra`）
    pub target_languages: Vec<String>,
    /// 音訊缺語言時使用
    pub default_audio_language: String,
    pub descriptive_markers: Vec<String>,
    pub quality_markers: Vec<String>,
    pub quality_suffix: String,
    pub forced_markers: Vec<String>,
    pub full_markers: Vec<String>,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        Self {
            target_languages: vec!["fr".to_string()],
            default_audio_language: "eng".to_string(),
            descriptive_markers: vec![
                "descrip".to_string(),
                "audio desc".to_string(),
                "audiodesc".to_string(),
                "frh".to_string(),
            ],
            quality_markers: vec!["q".to_string()],
            quality_suffix: "q".to_string(),
            forced_markers: vec!["forced".to_string(), "forcé".to_string()],
            full_markers: vec!["full".to_string(), "complet".to_string()],
        }
    }
}

/// CRF 搜尋與 x265 編碼設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscodeSettings {
    pub min_crf: u8,
    pub max_crf: u8,
    pub start_crf: u8,
    pub low_kbps: u64,
    pub high_kbps: u64,
    pub max_trials: u32,
    pub sample_seconds: u64,
    /// 不超過此長度的來源從 0 秒開始取樣
    pub short_source_seconds: u64,
    pub preset: String,
    pub scale_filter: String,
    pub base_x265_params: String,
    pub noise_reduction_params: String,
    pub trial_timeout_secs: Option<u64>,
    pub final_timeout_secs: Option<u64>,
    /// 固定取樣起點的亂數種子；`None` 時每次隨機
    pub sample_seed: Option<u64>,
}

impl Default for TranscodeSettings {
    fn default() -> Self {
        Self {
            min_crf: 19,
            max_crf: 22,
            start_crf: 21,
            low_kbps: 1500,
            high_kbps: 2500,
            max_trials: 6,
            sample_seconds: 60,
            short_source_seconds: 120,
            preset: "medium".to_string(),
            scale_filter: "scale=1920:-8:flags=spline".to_string(),
            base_x265_params:
                "vbv-maxrate=6000:vbv-bufsize=6000:early-skip=0:b-intra=0:deblock=-3,-3"
                    .to_string(),
            noise_reduction_params: "nr-intra=200:nr-inter=200".to_string(),
            trial_timeout_secs: Some(1800),
            final_timeout_secs: None,
            sample_seed: None,
        }
    }
}

/// 音訊正規化設定
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioSettings {
    pub nominal_boost_db: f64,
    pub max_channels: u32,
    /// 影集（檔名含 SxxEyy）強制使用的聲道數
    pub episodic_channels: u32,
    /// 無法讀取聲道數時使用
    pub fallback_channels: u32,
    /// 無法讀取最大音量時假設的峰值
    pub assumed_peak_db: f64,
    pub codec: String,
    pub profile: String,
    pub parallel: bool,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            nominal_boost_db: 6.0,
            max_channels: 6,
            episodic_channels: 2,
            fallback_channels: 2,
            assumed_peak_db: -1.0,
            codec: "libfdk_aac".to_string(),
            profile: "aac_he_v2".to_string(),
            parallel: true,
        }
    }
}

/// 外部工具執行檔名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolPaths {
    pub mkvmerge: String,
    pub mkvextract: String,
    pub ffmpeg: String,
    pub ffprobe: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            mkvmerge: "mkvmerge".to_string(),
            mkvextract: "mkvextract".to_string(),
            ffmpeg: "ffmpeg".to_string(),
            ffprobe: "ffprobe".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    pub language: Language,
    pub recent_paths: Vec<String>,
    pub selection: SelectionSettings,
    pub transcode: TranscodeSettings,
    pub audio: AudioSettings,
    pub tools: ToolPaths,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub file_type_table: FileTypeTable,
    pub settings: UserSettings,
}
