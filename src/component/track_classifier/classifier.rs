use super::codec_extension::{audio_extension, subtitle_extension};
use crate::config::SelectionSettings;
use crate::model::{ClassifiedTrack, RoleAssignment, Track, TrackKind, TrackRole};
use log::debug;

/// 視訊軌不抽出，只保留容器副檔名作為紀錄
const VIDEO_EXTENSION: &str = "mkv";
const UNDETERMINED_LANGUAGE: &str = "und";

/// 將探測到的軌道分類為輸出要保留的軌道，保持原本順序
///
/// - 視訊：只保留第一條（單一視訊軌是明確的限制），其餘捨棄
/// - 音訊：捨棄口述影像音軌，其餘全部保留
/// - 字幕：只保留目標語言族
pub fn classify(tracks: &[Track], settings: &SelectionSettings) -> Vec<ClassifiedTrack> {
    let mut seen_video = false;

    tracks
        .iter()
        .filter_map(|track| match track.kind {
            TrackKind::Video => {
                if seen_video {
                    debug!("捨棄額外的視訊軌 {}", track.id);
                    return None;
                }
                seen_video = true;
                Some(classify_video(track))
            }
            TrackKind::Audio => classify_audio(track, settings),
            TrackKind::Subtitle => classify_subtitle(track, settings),
        })
        .collect()
}

/// 語言是否屬於目標語言族（不分大小寫的前綴比對）
#[must_use]
pub fn language_matches_target(language: &str, target_languages: &[String]) -> bool {
    target_family(language, target_languages).is_some()
}

/// 語言所屬的第一個目標語言族（小寫）；不屬於任何目標時回傳 `None`
#[must_use]
pub fn target_family(language: &str, target_languages: &[String]) -> Option<String> {
    let language = language.to_lowercase();
    target_languages
        .iter()
        .map(|target| target.trim().to_lowercase())
        .find(|target| !target.is_empty() && language.starts_with(target))
}

fn classify_video(track: &Track) -> ClassifiedTrack {
    ClassifiedTrack {
        track: track.clone(),
        role: RoleAssignment::Known(TrackRole::Main),
        language: track
            .language
            .clone()
            .unwrap_or_else(|| UNDETERMINED_LANGUAGE.to_string()),
        variant: None,
        extension: VIDEO_EXTENSION.to_string(),
    }
}

fn classify_audio(track: &Track, settings: &SelectionSettings) -> Option<ClassifiedTrack> {
    let name = track.display_name.as_deref().unwrap_or_default();
    if contains_marker(name, &settings.descriptive_markers) {
        debug!("捨棄口述影像音軌 {} ({name})", track.id);
        return None;
    }

    let language = track
        .language
        .clone()
        .unwrap_or_else(|| settings.default_audio_language.to_lowercase());

    let variant = (contains_marker(name, &settings.quality_markers)
        && language_matches_target(&language, &settings.target_languages))
    .then(|| settings.quality_suffix.to_lowercase());

    Some(ClassifiedTrack {
        track: track.clone(),
        role: RoleAssignment::Known(TrackRole::Main),
        language,
        variant,
        extension: audio_extension(&track.codec_family).to_string(),
    })
}

fn classify_subtitle(track: &Track, settings: &SelectionSettings) -> Option<ClassifiedTrack> {
    let language = track.language.clone()?;
    if !language_matches_target(&language, &settings.target_languages) {
        return None;
    }

    Some(ClassifiedTrack {
        track: track.clone(),
        role: subtitle_role(track, settings),
        language,
        variant: None,
        extension: subtitle_extension(&track.codec_family).to_string(),
    })
}

/// 字幕用途，依序第一個符合者為準
fn subtitle_role(track: &Track, settings: &SelectionSettings) -> RoleAssignment {
    let name = track.display_name.as_deref();

    if track.is_forced() || name.is_some_and(|n| contains_marker(n, &settings.forced_markers)) {
        return RoleAssignment::Known(TrackRole::Forced);
    }

    match name {
        Some(n) if contains_marker(n, &settings.descriptive_markers) => {
            RoleAssignment::Known(TrackRole::AudioDescription)
        }
        Some(n) if contains_marker(n, &settings.full_markers) => {
            RoleAssignment::Known(TrackRole::Full)
        }
        Some(_) => RoleAssignment::Known(TrackRole::Full),
        None => RoleAssignment::Unknown,
    }
}

fn contains_marker(text: &str, markers: &[String]) -> bool {
    let text = text.to_lowercase();
    markers
        .iter()
        .map(|marker| marker.to_lowercase())
        .any(|marker| !marker.is_empty() && text.contains(&marker))
}
