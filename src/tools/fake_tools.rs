//! 單元測試用的假工具組：記錄每次呼叫，並在目的路徑寫出假檔案

use super::toolchain::{
    AudioEncodeJob, AudioEncoder, Demuxer, Inspector, Muxer, VideoEncodeJob, VideoEncoder,
};
use crate::component::remux_planner::MuxCommand;
use crate::error::{ProbeError, ToolError};
use crate::model::Track;
use std::collections::{HashMap, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeTools {
    pub tracks: Vec<Track>,
    pub duration: f64,
    /// 依序回傳給每次 `reported_bitrate` 呼叫（bit/s）
    pub bitrates: Mutex<VecDeque<Option<u64>>>,
    pub channels: Option<u32>,
    pub max_volume: Option<f64>,
    /// 抽出檔案的大小（依軌道 id），預設 16 bytes
    pub extract_sizes: HashMap<u32, usize>,
    pub fail_extract: Option<u32>,
    pub fail_video: bool,
    pub fail_mux: bool,
    pub extracted: Mutex<Vec<(u32, PathBuf)>>,
    pub video_jobs: Mutex<Vec<VideoEncodeJob>>,
    pub audio_jobs: Mutex<Vec<AudioEncodeJob>>,
    pub mux_commands: Mutex<Vec<MuxCommand>>,
}

impl FakeTools {
    pub fn with_bitrates_kbps(mut self, kbps: &[u64]) -> Self {
        self.bitrates = Mutex::new(kbps.iter().map(|k| Some(k * 1000)).collect());
        self
    }

    fn failure(tool: &str) -> ToolError {
        ToolError::NonZeroExit {
            tool: tool.to_string(),
            code: Some(1),
            stderr: "boom".to_string(),
        }
    }
}

fn write_placeholder(path: &Path, size: usize) -> Result<(), ToolError> {
    fs::write(path, vec![0u8; size]).map_err(|source| ToolError::Spawn {
        tool: "fake".to_string(),
        source,
    })
}

impl Inspector for FakeTools {
    fn identify(&self, _path: &Path) -> Result<Vec<Track>, ProbeError> {
        Ok(self.tracks.clone())
    }

    fn duration_seconds(&self, _path: &Path) -> Result<f64, ProbeError> {
        Ok(self.duration)
    }

    fn reported_bitrate(&self, _path: &Path) -> Result<Option<u64>, ProbeError> {
        Ok(self.bitrates.lock().unwrap().pop_front().flatten())
    }

    fn channel_count(&self, _path: &Path) -> Result<Option<u32>, ProbeError> {
        Ok(self.channels)
    }

    fn max_volume_db(&self, _path: &Path) -> Result<Option<f64>, ProbeError> {
        Ok(self.max_volume)
    }
}

impl Demuxer for FakeTools {
    fn extract_track(
        &self,
        _source: &Path,
        track_id: u32,
        destination: &Path,
    ) -> Result<(), ToolError> {
        if self.fail_extract == Some(track_id) {
            return Err(Self::failure("mkvextract"));
        }
        let size = self.extract_sizes.get(&track_id).copied().unwrap_or(16);
        write_placeholder(destination, size)?;
        self.extracted
            .lock()
            .unwrap()
            .push((track_id, destination.to_path_buf()));
        Ok(())
    }
}

impl VideoEncoder for FakeTools {
    fn encode_video(&self, job: &VideoEncodeJob) -> Result<(), ToolError> {
        self.video_jobs.lock().unwrap().push(job.clone());
        if self.fail_video {
            return Err(Self::failure("ffmpeg"));
        }
        write_placeholder(&job.destination, 64)
    }
}

impl AudioEncoder for FakeTools {
    fn encode_audio(&self, job: &AudioEncodeJob) -> Result<(), ToolError> {
        self.audio_jobs.lock().unwrap().push(job.clone());
        write_placeholder(&job.destination, 32)
    }
}

impl Muxer for FakeTools {
    fn mux(&self, command: &MuxCommand) -> Result<(), ToolError> {
        self.mux_commands.lock().unwrap().push(command.clone());
        if self.fail_mux {
            return Err(Self::failure("mkvmerge"));
        }
        write_placeholder(&command.output, 128)
    }
}
