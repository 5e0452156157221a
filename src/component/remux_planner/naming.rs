//! 輸出軌道的顯示名稱

use crate::model::{RoleAssignment, TrackRole};

pub const VIDEO_DISPLAY_NAME: &str = "Main Video";

const LANGUAGE_NAMES: [(&[&str], &str); 10] = [
    (&["fr", "fre", "fra"], "French"),
    (&["en", "eng"], "English"),
    (&["de", "ger", "deu"], "German"),
    (&["es", "spa"], "Spanish"),
    (&["it", "ita"], "Italian"),
    (&["pt", "por"], "Portuguese"),
    (&["nl", "dut", "nld"], "Dutch"),
    (&["ja", "jpn"], "Japanese"),
    (&["zh", "chi", "zho"], "Chinese"),
    (&["ko", "kor"], "Korean"),
];

/// 語言代碼轉成英文名稱；不認得的代碼以大寫顯示
#[must_use]
pub fn language_name(code: &str) -> String {
    let primary = code.split('-').next().unwrap_or(code).to_lowercase();
    LANGUAGE_NAMES
        .iter()
        .find(|(codes, _)| codes.contains(&primary.as_str()))
        .map_or_else(|| code.to_uppercase(), |(_, name)| (*name).to_string())
}

/// 音訊：`<語言> AAC <序號>`，有區分後綴時加在語言後面
#[must_use]
pub fn audio_display_name(language: &str, variant: Option<&str>, index: usize) -> String {
    let name = language_name(language);
    match variant {
        Some(variant) => format!("{name} ({variant}) AAC {index}"),
        None => format!("{name} AAC {index}"),
    }
}

/// 字幕：依用途使用固定名稱
#[must_use]
pub fn subtitle_display_name(language: &str, role: RoleAssignment) -> String {
    let name = language_name(language);
    match role {
        RoleAssignment::Known(TrackRole::Forced) => format!("{name} Forced"),
        RoleAssignment::Known(TrackRole::Full) => format!("{name} Full"),
        RoleAssignment::Known(TrackRole::AudioDescription) => format!("{name} Audio Description"),
        RoleAssignment::Known(TrackRole::Main) | RoleAssignment::Unknown => name,
    }
}
