use crate::component::adaptive_transcoder::{AdaptiveTranscoder, EncodeDecision};
use crate::component::audio_normalizer::AudioNormalizer;
use crate::component::metadata_probe::MetadataProbe;
use crate::component::remux_planner::RemuxPlanner;
use crate::component::stream_extractor::{
    StreamExtractor, TrackManifest, parse_extracted_file_name_for,
};
use crate::component::track_classifier::classify;
use crate::config::UserSettings;
use crate::error::{PipelineError, RemuxError};
use crate::model::{ExtractedFile, TrackKind};
use crate::tools::{HostResources, Toolchain};
use log::{info, warn};
use std::fs;
use std::path::{Path, PathBuf};

const VIDEO_OUTPUT_SUFFIX: &str = "_h265.mkv";
const FINAL_OUTPUT_SUFFIX: &str = "_final.mkv";
const ENCODED_AUDIO_EXTENSION: &str = "m4a";

/// 單一來源檔案的處理結果
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub source: PathBuf,
    pub video_output: PathBuf,
    pub final_output: PathBuf,
    pub decision: EncodeDecision,
    pub audio_files: Vec<ExtractedFile>,
    pub subtitle_files: Vec<ExtractedFile>,
}

/// 依序執行探測、分類、抽出、視訊轉碼、音訊正規化與封裝
pub struct MediaPipeline<'a> {
    toolchain: &'a Toolchain,
    settings: &'a UserSettings,
    host: HostResources,
    output_dir: Option<PathBuf>,
}

impl<'a> MediaPipeline<'a> {
    #[must_use]
    pub const fn new(
        toolchain: &'a Toolchain,
        settings: &'a UserSettings,
        host: HostResources,
    ) -> Self {
        Self {
            toolchain,
            settings,
            host,
            output_dir: None,
        }
    }

    /// 輸出到指定資料夾；未指定時放在來源檔旁邊
    #[must_use]
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    /// 處理一個來源檔案；任何階段失敗即中止此檔案
    pub fn process(&self, source: &Path) -> Result<PipelineOutcome, PipelineError> {
        let output_dir = self.prepare_output_dir(source)?;
        let stem = file_stem(source);
        info!("開始處理: {}", source.display());

        let tracks = MetadataProbe::new(&*self.toolchain.inspector).probe(source)?;
        let classified = classify(&tracks, &self.settings.selection);
        if !classified.iter().any(|c| c.kind() == TrackKind::Video) {
            return Err(PipelineError::NoVideoTrack(source.to_path_buf()));
        }

        let extracted = StreamExtractor::new(&*self.toolchain.demuxer, &output_dir)
            .extract_all(source, &classified)?;
        let manifest_path = TrackManifest::path_for(&output_dir, &stem);
        TrackManifest::new(source.to_path_buf(), extracted.clone())
            .save(&manifest_path)
            .map_err(|source| PipelineError::Manifest {
                path: manifest_path.clone(),
                source,
            })?;

        let (audio, subtitles): (Vec<_>, Vec<_>) = extracted
            .into_iter()
            .partition(|f| f.kind == TrackKind::Audio);
        info!("抽出 {} 條音訊, {} 條字幕", audio.len(), subtitles.len());

        let video_output = output_dir.join(format!("{stem}{VIDEO_OUTPUT_SUFFIX}"));
        let decision = AdaptiveTranscoder::new(
            &*self.toolchain.inspector,
            &*self.toolchain.video_encoder,
            &self.settings.transcode,
            self.host,
        )
        .transcode(source, &video_output)?;

        let audio_files = AudioNormalizer::new(
            &*self.toolchain.inspector,
            &*self.toolchain.audio_encoder,
            &self.settings.audio,
        )
        .normalize_all(source, &audio)?;

        let final_output = output_dir.join(format!("{stem}{FINAL_OUTPUT_SUFFIX}"));
        let planner = RemuxPlanner::new(&*self.toolchain.inspector, &*self.toolchain.muxer)
            .with_target_languages(&self.settings.selection.target_languages);
        let command = planner.plan(&video_output, &audio_files, &subtitles, &final_output)?;
        planner.execute(&command)?;

        info!("處理完成: {}", final_output.display());
        Ok(PipelineOutcome {
            source: source.to_path_buf(),
            video_output,
            final_output,
            decision,
            audio_files,
            subtitle_files: subtitles,
        })
    }

    /// 只重新封裝先前已產生的檔案
    ///
    /// 優先讀取軌道清單；沒有清單時掃描輸出資料夾，以檔名還原分類。
    pub fn remux_existing(&self, source: &Path) -> Result<PathBuf, PipelineError> {
        let output_dir = self.prepare_output_dir(source)?;
        let stem = file_stem(source);
        let video_output = output_dir.join(format!("{stem}{VIDEO_OUTPUT_SUFFIX}"));
        let final_output = output_dir.join(format!("{stem}{FINAL_OUTPUT_SUFFIX}"));
        let planner = RemuxPlanner::new(&*self.toolchain.inspector, &*self.toolchain.muxer)
            .with_target_languages(&self.settings.selection.target_languages);

        let manifest_path = TrackManifest::path_for(&output_dir, &stem);
        let command = if manifest_path.is_file() {
            let manifest = TrackManifest::load(&manifest_path)?;
            planner.plan_from_manifest(&video_output, &manifest, &final_output)?
        } else {
            warn!(
                "找不到軌道清單，改以檔名還原分類: {}",
                manifest_path.display()
            );
            let (audio, subtitles) = find_extracted_files(&output_dir, &stem)?;
            planner.plan_from_paths(&video_output, &audio, &subtitles, &final_output)?
        };

        planner.execute(&command)?;
        Ok(final_output)
    }

    fn prepare_output_dir(&self, source: &Path) -> Result<PathBuf, PipelineError> {
        let output_dir = self.output_dir.clone().unwrap_or_else(|| {
            source
                .parent()
                .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
        });
        fs::create_dir_all(&output_dir).map_err(|source| PipelineError::OutputDirectory {
            path: output_dir.clone(),
            source,
        })?;
        Ok(output_dir)
    }
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default()
}

/// 在資料夾中找出屬於 `stem` 的重新編碼音訊與字幕，依軌道 id 排序
fn find_extracted_files(
    dir: &Path,
    stem: &str,
) -> Result<(Vec<PathBuf>, Vec<PathBuf>), RemuxError> {
    let entries = fs::read_dir(dir).map_err(|_| RemuxError::MissingInput(dir.to_path_buf()))?;

    let mut parsed: Vec<ExtractedFile> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter_map(|path| parse_extracted_file_name_for(&path, stem))
        .collect();
    parsed.sort_by_key(|f| f.source_track);

    let audio = parsed
        .iter()
        .filter(|f| {
            f.kind == TrackKind::Audio
                && f.path
                    .extension()
                    .is_some_and(|ext| ext == ENCODED_AUDIO_EXTENSION)
        })
        .map(|f| f.path.clone())
        .collect();
    let subtitles = parsed
        .iter()
        .filter(|f| f.kind == TrackKind::Subtitle)
        .map(|f| f.path.clone())
        .collect();

    Ok((audio, subtitles))
}
