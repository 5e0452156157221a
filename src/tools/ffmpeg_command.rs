use super::toolchain::{AudioEncodeJob, VideoEncodeJob};
use regex::Regex;
use std::path::Path;
use std::process::Command;
use std::sync::LazyLock;

static REGEX_MAX_VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"max_volume:\s*(-?[0-9]+(?:\.[0-9]+)?|-inf)\s*dB").expect("Invalid regex")
});

/// ffmpeg 命令建構器
pub struct FfmpegCommand<'a> {
    program: &'a str,
}

impl<'a> FfmpegCommand<'a> {
    #[must_use]
    pub const fn new(program: &'a str) -> Self {
        Self { program }
    }

    /// x265 10-bit 視訊編碼（只輸出視訊軌）
    ///
    /// 有取樣區間時 `-ss` 放在 `-i` 前快速跳轉，`-t` 限制長度。
    #[must_use]
    pub fn build_video_command(&self, job: &VideoEncodeJob) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error"]);

        if let Some(window) = job.window {
            cmd.arg("-ss").arg(window.start_seconds.to_string());
        }

        cmd.args(["-hwaccel", "auto", "-i"]).arg(&job.source);

        if let Some(window) = job.window {
            cmd.arg("-t").arg(window.length_seconds.to_string());
        }

        cmd.args([
            "-map", "0:v:0",
            "-c:v", "libx265",
            "-profile:v", "main10",
            "-pix_fmt", "yuv420p10le",
            "-x265-params", &job.x265_params,
            "-vf", &job.scale_filter,
            "-preset", &job.preset,
            "-crf", &job.crf.to_string(),
            "-an", "-sn",
            "-y",
        ]);
        cmd.arg(&job.destination);

        cmd
    }

    /// 音訊重新編碼：聲道數、增益與編碼設定
    #[must_use]
    pub fn build_audio_command(&self, job: &AudioEncodeJob) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(["-hide_banner", "-nostdin", "-loglevel", "error", "-i"])
            .arg(&job.source);
        cmd.args([
            "-ac", &job.channels.to_string(),
            "-c:a", &job.codec,
            "-profile:a", &job.profile,
            "-af", &format!("volume={:.2}dB", job.gain_db),
            "-y",
        ]);
        cmd.arg(&job.destination);

        cmd
    }

    /// volumedetect 分析，結果輸出在 stderr（需要 info 等級）
    #[must_use]
    pub fn build_volume_detect_command(&self, source: &Path) -> Command {
        let mut cmd = Command::new(self.program);
        cmd.args(["-hide_banner", "-nostdin", "-i"]).arg(source);
        cmd.args(["-af", "volumedetect", "-vn", "-sn", "-dn", "-f", "null", "-"]);
        cmd
    }
}

/// 從 volumedetect 的 stderr 取出 `max_volume`
///
/// 全靜音時 ffmpeg 回報 `-inf`，此時視為無法判斷。
#[must_use]
pub fn parse_max_volume(stderr: &str) -> Option<f64> {
    stderr
        .lines()
        .filter_map(|line| REGEX_MAX_VOLUME.captures(line))
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().parse::<f64>().ok())
        .find(|v| v.is_finite())
}
