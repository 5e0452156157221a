use super::sample_window::{choose_sample_window, sample_rng};
use super::search::SearchPolicy;
use super::x265_params::{EncodeDecision, trial_param_string};
use crate::component::metadata_probe::MetadataProbe;
use crate::config::TranscodeSettings;
use crate::error::EncodeError;
use crate::tools::{HostResources, Inspector, TimeWindow, VideoEncodeJob, VideoEncoder};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// 試編碼的暫存檔，離開作用域時刪除
struct ScratchFile {
    path: PathBuf,
}

impl ScratchFile {
    fn beside(destination: &Path) -> Self {
        let mut name = destination
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(format!(".trial-{}.mkv", Uuid::new_v4()));
        Self {
            path: destination.with_file_name(name),
        }
    }
}

impl Drop for ScratchFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!("無法刪除試編碼暫存檔 {}: {e}", self.path.display());
            } else {
                debug!("已刪除試編碼暫存檔 {}", self.path.display());
            }
        }
    }
}

/// 以有限次數的試編碼搜尋 CRF，再做一次完整長度編碼
pub struct AdaptiveTranscoder<'a> {
    inspector: &'a dyn Inspector,
    encoder: &'a dyn VideoEncoder,
    settings: &'a TranscodeSettings,
    host: HostResources,
}

impl<'a> AdaptiveTranscoder<'a> {
    #[must_use]
    pub const fn new(
        inspector: &'a dyn Inspector,
        encoder: &'a dyn VideoEncoder,
        settings: &'a TranscodeSettings,
        host: HostResources,
    ) -> Self {
        Self {
            inspector,
            encoder,
            settings,
            host,
        }
    }

    /// 搜尋後輸出只含視訊的完整編碼
    pub fn transcode(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<EncodeDecision, EncodeError> {
        let decision = self.search(source, destination)?;
        self.encode_final(source, destination, &decision)?;
        Ok(decision)
    }

    /// 執行試編碼迴圈，回傳凍結的編碼決定
    ///
    /// 暫存檔放在 `destination` 旁邊，名稱唯一；不論成功或失敗都會刪除。
    /// 任何一次試編碼失敗都視為此檔案處理失敗。
    pub fn search(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<EncodeDecision, EncodeError> {
        let policy = SearchPolicy::from_settings(self.settings)?;
        let probe = MetadataProbe::new(self.inspector);

        let duration = probe.duration(source)?;
        let window = choose_sample_window(
            duration,
            self.settings.sample_seconds,
            self.settings.short_source_seconds,
            &mut sample_rng(self.settings.sample_seed),
        );
        let trial_params = trial_param_string(
            &self.settings.base_x265_params,
            self.host.encoder_pool_size(),
        );
        info!(
            "開始 CRF 搜尋: {} (長度 {duration:.1}s, 取樣 {}s 起 {}s, 最多 {} 次)",
            source.display(),
            window.start_seconds,
            window.length_seconds,
            policy.max_trials
        );

        let scratch = ScratchFile::beside(destination);
        let outcome = policy.drive(|state| {
            let job = self.job(
                source,
                &scratch.path,
                Some(window),
                state.crf,
                &trial_params,
                self.trial_timeout(),
            );
            self.encoder.encode_video(&job)?;
            let measured_kbps = probe.bitrate_kbps(&scratch.path)?;
            info!(
                "試編碼 crf={} -> {measured_kbps} kbps (目標 {}-{} kbps)",
                state.crf, policy.low_kbps, policy.high_kbps
            );
            Ok::<_, EncodeError>(Some(measured_kbps))
        })?;
        drop(scratch);

        let decision = EncodeDecision::from_outcome(
            &outcome,
            &trial_params,
            &self.settings.noise_reduction_params,
        );
        info!(
            "CRF 搜尋結束: crf={} ({:?}, 共 {} 次試編碼{})",
            decision.crf,
            outcome.reason,
            outcome.trials_used,
            if decision.extra_noise_reduction {
                ", 加強降噪"
            } else {
                ""
            }
        );
        Ok(decision)
    }

    /// 以決定的參數完整編碼一次
    pub fn encode_final(
        &self,
        source: &Path,
        destination: &Path,
        decision: &EncodeDecision,
    ) -> Result<(), EncodeError> {
        let timeout = self.settings.final_timeout_secs.map(Duration::from_secs);
        let job = self.job(
            source,
            destination,
            None,
            decision.crf,
            &decision.param_string,
            timeout,
        );

        info!(
            "開始完整編碼 crf={}: {} -> {}",
            decision.crf,
            source.display(),
            destination.display()
        );
        self.encoder.encode_video(&job)?;
        info!("完整編碼完成: {}", destination.display());
        Ok(())
    }

    fn trial_timeout(&self) -> Option<Duration> {
        self.settings.trial_timeout_secs.map(Duration::from_secs)
    }

    fn job(
        &self,
        source: &Path,
        destination: &Path,
        window: Option<TimeWindow>,
        crf: u8,
        x265_params: &str,
        timeout: Option<Duration>,
    ) -> VideoEncodeJob {
        VideoEncodeJob {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            window,
            crf,
            x265_params: x265_params.to_string(),
            preset: self.settings.preset.clone(),
            scale_filter: self.settings.scale_filter.clone(),
            timeout,
        }
    }
}
