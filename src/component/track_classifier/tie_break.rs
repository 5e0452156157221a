use super::classifier::target_family;
use crate::model::{ExtractedFile, RoleAssignment, TrackKind, TrackRole};
use log::info;
use std::collections::BTreeMap;

/// 以檔案大小推測未知用途的字幕
///
/// 推測規則：同一語言族恰好有兩條 `Unknown` 字幕時，較小者為強制字幕
/// （只有外語對白，內容稀疏），較大者為完整字幕；大小相同時先抽出者為強制字幕。
/// 其他數量一律維持 `Unknown`，不做猜測。
///
/// 語言族以 `target_languages` 的前綴比對決定（`fre` 與 `fra` 同屬 `fr`）；
/// 不屬於任何目標語言族的字幕以原始語言代碼分組。
/// `sizes[i]` 是 `subtitles[i]` 的檔案大小。
pub fn resolve_ambiguous_subtitles(
    subtitles: &mut [ExtractedFile],
    sizes: &[u64],
    target_languages: &[String],
) {
    debug_assert_eq!(subtitles.len(), sizes.len());

    let mut unknown_by_language: BTreeMap<String, Vec<usize>> = BTreeMap::new();
    for (index, file) in subtitles.iter().enumerate() {
        if file.kind == TrackKind::Subtitle && file.role.is_unknown() {
            let family = target_family(&file.language, target_languages)
                .unwrap_or_else(|| file.language.to_lowercase());
            unknown_by_language
                .entry(family)
                .or_default()
                .push(index);
        }
    }

    for (language, indices) in unknown_by_language {
        let &[first, second] = indices.as_slice() else {
            continue;
        };

        let size_of = |index: usize| sizes.get(index).copied().unwrap_or(0);
        let (forced, full) = if size_of(first) <= size_of(second) {
            (first, second)
        } else {
            (second, first)
        };

        subtitles[forced].role = RoleAssignment::Known(TrackRole::Forced);
        subtitles[full].role = RoleAssignment::Known(TrackRole::Full);
        info!(
            "依檔案大小推測 {language} 字幕用途: {} 為強制字幕, {} 為完整字幕",
            subtitles[forced].path.display(),
            subtitles[full].path.display()
        );
    }
}
