use super::file_name::{extracted_file_name, language_token, variant_token};
use crate::error::ExtractionError;
use crate::model::{ClassifiedTrack, ExtractedFile, TrackKind};
use crate::tools::Demuxer;
use log::{error, info};
use std::path::Path;

/// 將分類後的軌道逐一抽出為獨立檔案
pub struct StreamExtractor<'a> {
    demuxer: &'a dyn Demuxer,
    output_dir: &'a Path,
}

impl<'a> StreamExtractor<'a> {
    #[must_use]
    pub const fn new(demuxer: &'a dyn Demuxer, output_dir: &'a Path) -> Self {
        Self {
            demuxer,
            output_dir,
        }
    }

    /// 抽出單一軌道，檔名依命名規則編碼分類結果
    pub fn extract(
        &self,
        container: &Path,
        classified: &ClassifiedTrack,
    ) -> Result<ExtractedFile, ExtractionError> {
        let stem = container
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let destination = self
            .output_dir
            .join(extracted_file_name(&stem, classified));

        self.demuxer
            .extract_track(container, classified.track.id, &destination)
            .map_err(|source| {
                error!("軌道 {} 抽出失敗: {source}", classified.track.id);
                ExtractionError {
                    track_id: classified.track.id,
                    source,
                }
            })?;

        Ok(ExtractedFile {
            language: language_token(&classified.language),
            variant: classified.variant.as_deref().and_then(variant_token),
            ..ExtractedFile::from_classified(classified, destination)
        })
    }

    /// 依序抽出所有音訊與字幕軌；視訊由編碼階段直接讀取來源，不在此抽出
    ///
    /// 任何一條失敗即中止，不會略過。
    pub fn extract_all(
        &self,
        container: &Path,
        tracks: &[ClassifiedTrack],
    ) -> Result<Vec<ExtractedFile>, ExtractionError> {
        let extracted = tracks
            .iter()
            .filter(|t| t.kind() != TrackKind::Video)
            .map(|t| self.extract(container, t))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "已抽出 {} 條軌道: {}",
            extracted.len(),
            container.display()
        );
        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::stream_extractor::parse_extracted_file_name;
    use crate::component::track_classifier::classify;
    use crate::config::SelectionSettings;
    use crate::model::{RoleAssignment, Track, TrackRole};
    use crate::tools::fake_tools::FakeTools;
    use tempfile::TempDir;

    fn sample_tracks() -> Vec<Track> {
        vec![
            Track::new(0, TrackKind::Video, "HEVC"),
            Track::new(1, TrackKind::Audio, "AC-3").with_language("fre"),
            Track::new(2, TrackKind::Subtitle, "SubRip/SRT")
                .with_language("fre")
                .with_forced(true),
            Track::new(3, TrackKind::Subtitle, "HDMV PGS")
                .with_language("fre")
                .with_display_name("Full"),
        ]
    }

    #[test]
    fn test_extract_all_skips_video_and_names_files() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::default();
        let classified = classify(&sample_tracks(), &SelectionSettings::default());

        let extractor = StreamExtractor::new(&tools, temp_dir.path());
        let files = extractor
            .extract_all(Path::new("/v/Movie.mkv"), &classified)
            .unwrap();

        let names: Vec<_> = files
            .iter()
            .map(|f| f.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "Movie.audio_1_fre_main.ac3",
                "Movie.subtitle_2_fre_forced.srt",
                "Movie.subtitle_3_fre_full.sup",
            ]
        );
        assert!(files.iter().all(|f| f.path.exists()));
        assert_eq!(tools.extracted.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_extracted_record_matches_file_name() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools::default();
        let classified = classify(&sample_tracks(), &SelectionSettings::default());

        let files = StreamExtractor::new(&tools, temp_dir.path())
            .extract_all(Path::new("/v/Movie.mkv"), &classified)
            .unwrap();

        for file in &files {
            let parsed = parse_extracted_file_name(&file.path).unwrap();
            assert_eq!(&parsed, file);
        }
        assert_eq!(files[1].role, RoleAssignment::Known(TrackRole::Forced));
    }

    #[test]
    fn test_extraction_failure_is_reported() {
        let temp_dir = TempDir::new().unwrap();
        let tools = FakeTools {
            fail_extract: Some(2),
            ..FakeTools::default()
        };
        let classified = classify(&sample_tracks(), &SelectionSettings::default());

        let err = StreamExtractor::new(&tools, temp_dir.path())
            .extract_all(Path::new("/v/Movie.mkv"), &classified)
            .unwrap_err();
        assert_eq!(err.track_id, 2);
        // 失敗後不再繼續抽出後面的軌道
        assert_eq!(tools.extracted.lock().unwrap().len(), 1);
    }
}
