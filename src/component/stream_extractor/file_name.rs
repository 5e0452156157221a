//! 抽出檔案的命名規則
//!
//! `<來源主檔名>.<kind>_<id>_<lang>[_<variant>]_<role>.<ext>`
//!
//! 後續階段（可能是另一個行程）只靠檔名就能還原分類結果，
//! `parse_extracted_file_name` 對 `extracted_file_name` 產生的名稱是完全的反函式。

use crate::model::{ClassifiedTrack, ExtractedFile, RoleAssignment, TrackKind};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static REGEX_EXTRACTED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(.+)\.(video|audio|subtitle)_(\d+)_([a-z0-9-]+)(?:_([a-z0-9]+))?_(main|forced|full|audiodesc|unknown)\.([A-Za-z0-9]+)$",
    )
    .expect("Invalid regex")
});

const UNDETERMINED_LANGUAGE: &str = "und";

/// 語言代碼轉成檔名安全的形式
#[must_use]
pub fn language_token(language: &str) -> String {
    let token: String = language
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect();

    if token.trim_matches('-').is_empty() {
        UNDETERMINED_LANGUAGE.to_string()
    } else {
        token
    }
}

/// 區分後綴轉成檔名安全的形式；清理後為空則視為沒有後綴
#[must_use]
pub fn variant_token(variant: &str) -> Option<String> {
    let token: String = variant
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect();
    (!token.is_empty()).then_some(token)
}

#[must_use]
pub fn extracted_file_name(stem: &str, classified: &ClassifiedTrack) -> String {
    let variant = classified
        .variant
        .as_deref()
        .and_then(variant_token)
        .map(|v| format!("_{v}"))
        .unwrap_or_default();

    format!(
        "{stem}.{}_{}_{}{variant}_{}.{}",
        classified.kind().as_str(),
        classified.track.id,
        language_token(&classified.language),
        classified.role.token(),
        classified.extension
    )
}

/// 由檔名還原分類；不符合命名規則時回傳 `None`
#[must_use]
pub fn parse_extracted_file_name(path: &Path) -> Option<ExtractedFile> {
    parse_with_stem(path).map(|(_, file)| file)
}

/// 同 `parse_extracted_file_name`，但只接受來源主檔名等於 `stem` 的檔案
#[must_use]
pub fn parse_extracted_file_name_for(path: &Path, stem: &str) -> Option<ExtractedFile> {
    parse_with_stem(path)
        .filter(|(source_stem, _)| source_stem == stem)
        .map(|(_, file)| file)
}

fn parse_with_stem(path: &Path) -> Option<(String, ExtractedFile)> {
    let file_name = path.file_name()?.to_str()?;
    let caps = REGEX_EXTRACTED_NAME.captures(file_name)?;

    let stem = caps.get(1)?.as_str().to_string();
    let kind = TrackKind::from_token(caps.get(2)?.as_str())?;
    let source_track = caps.get(3)?.as_str().parse::<u32>().ok()?;
    let language = caps.get(4)?.as_str().to_string();
    let variant = caps.get(5).map(|m| m.as_str().to_string());
    let role = RoleAssignment::from_token(caps.get(6)?.as_str())?;

    Some((
        stem,
        ExtractedFile {
            path: path.to_path_buf(),
            source_track,
            kind,
            role,
            language,
            variant,
        },
    ))
}
