use super::mux_command::{MuxCommand, MuxEntry};
use super::naming::{VIDEO_DISPLAY_NAME, audio_display_name, subtitle_display_name};
use crate::component::audio_normalizer::encoded_audio_path;
use crate::component::stream_extractor::{TrackManifest, parse_extracted_file_name};
use crate::component::track_classifier::resolve_ambiguous_subtitles;
use crate::error::RemuxError;
use crate::model::{ExtractedFile, RoleAssignment, TrackKind, TrackRole};
use crate::tools::{Inspector, Muxer};
use log::{debug, info};
use std::path::{Path, PathBuf};

/// 重建輸出軌道清單並交給 muxer
pub struct RemuxPlanner<'a> {
    inspector: &'a dyn Inspector,
    muxer: &'a dyn Muxer,
    target_languages: &'a [String],
}

impl<'a> RemuxPlanner<'a> {
    #[must_use]
    pub const fn new(inspector: &'a dyn Inspector, muxer: &'a dyn Muxer) -> Self {
        Self {
            inspector,
            muxer,
            target_languages: &[],
        }
    }

    /// 推測字幕用途時，以這些目標語言族分組
    #[must_use]
    pub fn with_target_languages(mut self, target_languages: &'a [String]) -> Self {
        self.target_languages = target_languages;
        self
    }

    /// 建立封裝計畫
    ///
    /// 順序固定為視訊、音訊（抽出順序）、字幕（抽出順序）。
    /// 字幕中同語言恰好兩條 `Unknown` 時以檔案大小推測用途。
    pub fn plan(
        &self,
        video: &Path,
        audio: &[ExtractedFile],
        subtitles: &[ExtractedFile],
        output: &Path,
    ) -> Result<MuxCommand, RemuxError> {
        ensure_exists(video)?;
        for file in audio.iter().chain(subtitles) {
            ensure_exists(&file.path)?;
        }

        let mut subtitles = subtitles.to_vec();
        let sizes = subtitles
            .iter()
            .map(|file| {
                self.inspector
                    .file_size(&file.path)
                    .map_err(|_| RemuxError::MissingInput(file.path.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        resolve_ambiguous_subtitles(&mut subtitles, &sizes, self.target_languages);

        let mut entries = Vec::with_capacity(1 + audio.len() + subtitles.len());
        entries.push(MuxEntry {
            path: video.to_path_buf(),
            kind: TrackKind::Video,
            language: None,
            display_name: VIDEO_DISPLAY_NAME.to_string(),
            forced: false,
        });

        entries.extend(audio.iter().enumerate().map(|(index, file)| MuxEntry {
            path: file.path.clone(),
            kind: TrackKind::Audio,
            language: Some(file.language.clone()),
            display_name: audio_display_name(
                &file.language,
                file.variant.as_deref(),
                index + 1,
            ),
            forced: false,
        }));

        entries.extend(subtitles.iter().map(|file| {
            if file.role.is_unknown() {
                debug!("字幕用途無法判定，以語言名稱封裝: {}", file.path.display());
            }
            MuxEntry {
                path: file.path.clone(),
                kind: TrackKind::Subtitle,
                language: Some(file.language.clone()),
                display_name: subtitle_display_name(&file.language, file.role),
                forced: file.role == RoleAssignment::Known(TrackRole::Forced),
            }
        }));

        Ok(MuxCommand {
            output: output.to_path_buf(),
            entries,
        })
    }

    /// 只靠檔名還原分類後建立計畫
    pub fn plan_from_paths(
        &self,
        video: &Path,
        audio_paths: &[PathBuf],
        subtitle_paths: &[PathBuf],
        output: &Path,
    ) -> Result<MuxCommand, RemuxError> {
        let audio = parse_all(audio_paths)?;
        let subtitles = parse_all(subtitle_paths)?;
        self.plan(video, &audio, &subtitles, output)
    }

    /// 由軌道清單建立計畫；音訊使用重新編碼後的檔案
    pub fn plan_from_manifest(
        &self,
        video: &Path,
        manifest: &TrackManifest,
        output: &Path,
    ) -> Result<MuxCommand, RemuxError> {
        let audio: Vec<ExtractedFile> = manifest
            .files
            .iter()
            .filter(|f| f.kind == TrackKind::Audio)
            .map(|f| f.with_path(encoded_audio_path(&f.path)))
            .collect();
        let subtitles: Vec<ExtractedFile> = manifest
            .files
            .iter()
            .filter(|f| f.kind == TrackKind::Subtitle)
            .cloned()
            .collect();
        self.plan(video, &audio, &subtitles, output)
    }

    /// 執行封裝；muxer 結束碼非零即失敗
    pub fn execute(&self, command: &MuxCommand) -> Result<(), RemuxError> {
        info!(
            "開始封裝 {} 條軌道 -> {}",
            command.entries.len(),
            command.output.display()
        );
        self.muxer.mux(command)?;
        info!("封裝完成: {}", command.output.display());
        Ok(())
    }
}

fn ensure_exists(path: &Path) -> Result<(), RemuxError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(RemuxError::MissingInput(path.to_path_buf()))
    }
}

fn parse_all(paths: &[PathBuf]) -> Result<Vec<ExtractedFile>, RemuxError> {
    paths
        .iter()
        .map(|path| {
            parse_extracted_file_name(path)
                .ok_or_else(|| RemuxError::UnrecognizedName(path.clone()))
        })
        .collect()
}
