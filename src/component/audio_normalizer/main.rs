use super::policy::{gain_db, is_episodic, target_channels};
use crate::component::metadata_probe::MetadataProbe;
use crate::config::AudioSettings;
use crate::error::EncodeError;
use crate::model::ExtractedFile;
use crate::tools::{AudioEncodeJob, AudioEncoder, Inspector};
use log::info;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const ENCODED_EXTENSION: &str = "m4a";

/// 重新編碼後的音訊路徑：抽出檔換成 `.m4a`
#[must_use]
pub fn encoded_audio_path(extracted: &Path) -> PathBuf {
    extracted.with_extension(ENCODED_EXTENSION)
}

pub struct AudioNormalizer<'a> {
    inspector: &'a dyn Inspector,
    encoder: &'a dyn AudioEncoder,
    settings: &'a AudioSettings,
}

impl<'a> AudioNormalizer<'a> {
    #[must_use]
    pub const fn new(
        inspector: &'a dyn Inspector,
        encoder: &'a dyn AudioEncoder,
        settings: &'a AudioSettings,
    ) -> Self {
        Self {
            inspector,
            encoder,
            settings,
        }
    }

    /// 正規化單一音軌，回傳指向編碼後檔案的紀錄（分類不變）
    ///
    /// 聲道策略依來源容器的檔名判斷，而非抽出檔。
    pub fn normalize(
        &self,
        source_container: &Path,
        audio: &ExtractedFile,
    ) -> Result<ExtractedFile, EncodeError> {
        let probe = MetadataProbe::new(self.inspector);

        let source_channels =
            probe.channel_count_or(&audio.path, self.settings.fallback_channels)?;
        let episodic = source_container
            .file_name()
            .is_some_and(|name| is_episodic(&name.to_string_lossy()));
        let channels = target_channels(source_channels, episodic, self.settings);

        let max_volume = probe.max_volume_db_or(&audio.path, self.settings.assumed_peak_db)?;
        let gain = gain_db(max_volume, self.settings.nominal_boost_db);

        let destination = encoded_audio_path(&audio.path);
        let job = AudioEncodeJob {
            source: audio.path.clone(),
            destination: destination.clone(),
            channels,
            gain_db: gain,
            codec: self.settings.codec.clone(),
            profile: self.settings.profile.clone(),
        };
        self.encoder.encode_audio(&job)?;

        info!(
            "音訊編碼完成 {} ({source_channels} -> {channels} 聲道, 峰值 {max_volume:.1} dB, 增益 {gain:+.2} dB)",
            destination.display()
        );
        Ok(audio.with_path(destination))
    }

    /// 正規化所有音軌，回傳順序與輸入相同
    ///
    /// 每條音軌寫入各自的輸出檔，彼此獨立，可平行處理。
    pub fn normalize_all(
        &self,
        source_container: &Path,
        audio_files: &[ExtractedFile],
    ) -> Result<Vec<ExtractedFile>, EncodeError> {
        if self.settings.parallel {
            audio_files
                .par_iter()
                .map(|audio| self.normalize(source_container, audio))
                .collect()
        } else {
            audio_files
                .iter()
                .map(|audio| self.normalize(source_container, audio))
                .collect()
        }
    }
}
