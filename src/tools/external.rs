//! 以 mkvtoolnix 與 ffmpeg 實作外部工具介面

use super::ffmpeg_command::{FfmpegCommand, parse_max_volume};
use super::ffprobe_info::{
    BITRATE_ARGS, CHANNELS_ARGS, DURATION_ARGS, parse_channels, parse_duration,
    parse_reported_bitrate,
};
use super::mkvtoolnix::parse_identify_output;
use super::process_runner::{ToolOutput, run_tool};
use super::toolchain::{
    AudioEncodeJob, AudioEncoder, Demuxer, Inspector, Muxer, VideoEncodeJob, VideoEncoder,
};
use crate::component::remux_planner::MuxCommand;
use crate::config::ToolPaths;
use crate::error::{ProbeError, ToolError};
use crate::model::Track;
use log::info;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

/// 中繼資料查詢的時限
const PROBE_TIMEOUT: Duration = Duration::from_secs(120);

/// 整條音訊的音量分析時限
const ANALYSIS_TIMEOUT: Duration = Duration::from_secs(3600);

pub struct ExternalTools {
    paths: ToolPaths,
    shutdown_signal: Arc<AtomicBool>,
}

impl ExternalTools {
    #[must_use]
    pub const fn new(paths: ToolPaths, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            paths,
            shutdown_signal,
        }
    }

    fn run(&self, command: Command, timeout: Option<Duration>) -> Result<ToolOutput, ToolError> {
        run_tool(command, timeout, &self.shutdown_signal)
    }

    fn ffprobe(&self, args: &[&str], path: &Path) -> Result<String, ProbeError> {
        let mut cmd = Command::new(&self.paths.ffprobe);
        cmd.args(args).arg(path);
        let output = self.run(cmd, Some(PROBE_TIMEOUT))?.require_success()?;
        Ok(output.stdout)
    }
}

impl Inspector for ExternalTools {
    fn identify(&self, path: &Path) -> Result<Vec<Track>, ProbeError> {
        let mut cmd = Command::new(&self.paths.mkvmerge);
        cmd.arg("-J").arg(path);
        let output = self.run(cmd, Some(PROBE_TIMEOUT))?.require_success()?;
        parse_identify_output(path, &output.stdout)
    }

    fn duration_seconds(&self, path: &Path) -> Result<f64, ProbeError> {
        let stdout = self.ffprobe(&DURATION_ARGS, path)?;
        parse_duration(path, &stdout)
    }

    fn reported_bitrate(&self, path: &Path) -> Result<Option<u64>, ProbeError> {
        let stdout = self.ffprobe(&BITRATE_ARGS, path)?;
        parse_reported_bitrate(path, &stdout)
    }

    fn channel_count(&self, path: &Path) -> Result<Option<u32>, ProbeError> {
        let stdout = self.ffprobe(&CHANNELS_ARGS, path)?;
        parse_channels(path, &stdout)
    }

    fn max_volume_db(&self, path: &Path) -> Result<Option<f64>, ProbeError> {
        let cmd = FfmpegCommand::new(&self.paths.ffmpeg).build_volume_detect_command(path);
        let output = self.run(cmd, Some(ANALYSIS_TIMEOUT))?.require_success()?;
        Ok(parse_max_volume(&output.stderr))
    }
}

impl Demuxer for ExternalTools {
    fn extract_track(
        &self,
        source: &Path,
        track_id: u32,
        destination: &Path,
    ) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.paths.mkvextract);
        cmd.arg(source)
            .arg("tracks")
            .arg(format!("{track_id}:{}", destination.display()));
        self.run(cmd, None)?.require_success()?;

        info!(
            "已抽出軌道 {track_id}: {} -> {}",
            source.display(),
            destination.display()
        );
        Ok(())
    }
}

impl VideoEncoder for ExternalTools {
    fn encode_video(&self, job: &VideoEncodeJob) -> Result<(), ToolError> {
        let cmd = FfmpegCommand::new(&self.paths.ffmpeg).build_video_command(job);
        self.run(cmd, job.timeout)?.require_success()?;
        Ok(())
    }
}

impl AudioEncoder for ExternalTools {
    fn encode_audio(&self, job: &AudioEncodeJob) -> Result<(), ToolError> {
        let cmd = FfmpegCommand::new(&self.paths.ffmpeg).build_audio_command(job);
        self.run(cmd, None)?.require_success()?;
        Ok(())
    }
}

impl Muxer for ExternalTools {
    fn mux(&self, command: &MuxCommand) -> Result<(), ToolError> {
        let mut cmd = Command::new(&self.paths.mkvmerge);
        cmd.args(command.to_args());
        self.run(cmd, None)?.require_success()?;
        Ok(())
    }
}
