//! 外部工具介面
//!
//! 核心流程只依賴這裡的 trait；實際的 mkvtoolnix / ffmpeg 實作在
//! `ExternalTools`，測試則使用記錄呼叫的假實作。

use crate::component::remux_planner::MuxCommand;
use crate::error::{ProbeError, ToolError};
use crate::model::Track;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// 中繼資料檢視服務
pub trait Inspector: Send + Sync {
    /// 列出容器中的所有軌道
    fn identify(&self, path: &Path) -> Result<Vec<Track>, ProbeError>;

    /// 總長度（秒）
    fn duration_seconds(&self, path: &Path) -> Result<f64, ProbeError>;

    /// 回報的位元率（bit/s）；工具回報 unknown 或缺值時為 `None`
    fn reported_bitrate(&self, path: &Path) -> Result<Option<u64>, ProbeError>;

    /// 第一條音訊的聲道數；無法讀取時為 `None`
    fn channel_count(&self, path: &Path) -> Result<Option<u32>, ProbeError>;

    /// 最大音量（dB）；分析輸出中找不到時為 `None`
    fn max_volume_db(&self, path: &Path) -> Result<Option<f64>, ProbeError>;

    fn file_size(&self, path: &Path) -> Result<u64, ProbeError> {
        fs::metadata(path)
            .map(|m| m.len())
            .map_err(|source| ProbeError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}

/// 軌道抽出服務
pub trait Demuxer: Send + Sync {
    fn extract_track(
        &self,
        source: &Path,
        track_id: u32,
        destination: &Path,
    ) -> Result<(), ToolError>;
}

/// 視訊編碼服務
pub trait VideoEncoder: Send + Sync {
    fn encode_video(&self, job: &VideoEncodeJob) -> Result<(), ToolError>;
}

/// 音訊編碼服務
pub trait AudioEncoder: Send + Sync {
    fn encode_audio(&self, job: &AudioEncodeJob) -> Result<(), ToolError>;
}

/// 封裝服務
pub trait Muxer: Send + Sync {
    fn mux(&self, command: &MuxCommand) -> Result<(), ToolError>;
}

/// 取樣區間（秒）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_seconds: u64,
    pub length_seconds: u64,
}

/// 單次視訊編碼工作
#[derive(Debug, Clone, PartialEq)]
pub struct VideoEncodeJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    /// `None` 表示完整長度編碼
    pub window: Option<TimeWindow>,
    pub crf: u8,
    pub x265_params: String,
    pub preset: String,
    pub scale_filter: String,
    pub timeout: Option<Duration>,
}

/// 單次音訊編碼工作
#[derive(Debug, Clone, PartialEq)]
pub struct AudioEncodeJob {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub channels: u32,
    pub gain_db: f64,
    pub codec: String,
    pub profile: String,
}

/// 一組外部工具
#[derive(Clone)]
pub struct Toolchain {
    pub inspector: Arc<dyn Inspector>,
    pub demuxer: Arc<dyn Demuxer>,
    pub video_encoder: Arc<dyn VideoEncoder>,
    pub audio_encoder: Arc<dyn AudioEncoder>,
    pub muxer: Arc<dyn Muxer>,
}

impl Toolchain {
    /// 所有角色都由同一個實作提供
    pub fn from_single<T>(tools: Arc<T>) -> Self
    where
        T: Inspector + Demuxer + VideoEncoder + AudioEncoder + Muxer + 'static,
    {
        Self {
            inspector: tools.clone(),
            demuxer: tools.clone(),
            video_encoder: tools.clone(),
            audio_encoder: tools.clone(),
            muxer: tools,
        }
    }
}
