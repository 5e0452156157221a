use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// 外部工具呼叫失敗
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("無法啟動 {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} 結束碼非零 ({code:?}): {stderr}")]
    NonZeroExit {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{tool} 執行逾時 ({}s)", after.as_secs())]
    TimedOut { tool: String, after: Duration },

    #[error("{tool} 已因中斷信號終止")]
    Cancelled { tool: String },
}

/// 中繼資料探測失敗
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("探測輸出格式錯誤 {}: {detail}", path.display())]
    Malformed { path: PathBuf, detail: String },

    #[error("探測輸出為空: {}", path.display())]
    Empty { path: PathBuf },

    #[error("無法讀取檔案資訊 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 軌道抽出失敗
#[derive(Error, Debug)]
#[error("軌道 {track_id} 抽出失敗: {source}")]
pub struct ExtractionError {
    pub track_id: u32,
    #[source]
    pub source: ToolError,
}

/// 影片或音訊編碼失敗
#[derive(Error, Debug)]
pub enum EncodeError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("編碼設定無效: {0}")]
    InvalidSettings(String),

    #[error("無法存取編碼檔案 {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 重新封裝失敗
#[derive(Error, Debug)]
pub enum RemuxError {
    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("找不到輸入檔案: {}", .0.display())]
    MissingInput(PathBuf),

    #[error("無法讀取軌道清單 {}: {detail}", path.display())]
    Manifest { path: PathBuf, detail: String },

    #[error("檔名不符合抽出命名規則: {}", .0.display())]
    UnrecognizedName(PathBuf),
}

/// 單一來源檔案處理失敗；批次處理時只中止該檔案
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Remux(#[from] RemuxError),

    #[error("來源檔案沒有視訊軌: {}", .0.display())]
    NoVideoTrack(PathBuf),

    #[error("無法建立輸出資料夾 {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("無法寫入軌道清單 {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ToolError {
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
