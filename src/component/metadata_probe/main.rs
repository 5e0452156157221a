use crate::error::ProbeError;
use crate::model::Track;
use crate::tools::Inspector;
use log::{debug, warn};
use std::path::Path;

pub struct MetadataProbe<'a> {
    inspector: &'a dyn Inspector,
}

impl<'a> MetadataProbe<'a> {
    #[must_use]
    pub const fn new(inspector: &'a dyn Inspector) -> Self {
        Self { inspector }
    }

    /// 列出容器中的軌道；沒有任何可用軌道視為探測失敗
    pub fn probe(&self, path: &Path) -> Result<Vec<Track>, ProbeError> {
        let tracks = self.inspector.identify(path)?;
        if tracks.is_empty() {
            return Err(ProbeError::Empty {
                path: path.to_path_buf(),
            });
        }
        debug!("探測完成 {}: {} 條軌道", path.display(), tracks.len());
        Ok(tracks)
    }

    pub fn duration(&self, path: &Path) -> Result<f64, ProbeError> {
        let seconds = self.inspector.duration_seconds(path)?;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(ProbeError::Malformed {
                path: path.to_path_buf(),
                detail: format!("長度無效: {seconds}"),
            });
        }
        Ok(seconds)
    }

    /// 位元率（kbps）
    ///
    /// 優先使用工具回報的值；缺值或 unknown 時以檔案大小與長度推算。
    pub fn bitrate_kbps(&self, path: &Path) -> Result<u64, ProbeError> {
        if let Some(bits_per_second) = self
            .inspector
            .reported_bitrate(path)?
            .filter(|&bps| bps > 0)
        {
            return Ok(bits_per_second / 1000);
        }

        debug!("{} 沒有回報位元率，改用檔案大小推算", path.display());
        let size_bytes = self.inspector.file_size(path)?;
        let duration = self.inspector.duration_seconds(path)?;
        fallback_bitrate_kbps(path, size_bytes, duration)
    }

    /// 第一條音訊的聲道數；讀不到時回傳 `fallback`
    pub fn channel_count_or(&self, path: &Path, fallback: u32) -> Result<u32, ProbeError> {
        match self.inspector.channel_count(path)? {
            Some(channels) if channels > 0 => Ok(channels),
            _ => {
                warn!(
                    "無法取得聲道數，使用預設 {fallback}: {}",
                    path.display()
                );
                Ok(fallback)
            }
        }
    }

    /// 最大音量（dB）；分析結果缺值時回傳 `assumed`
    pub fn max_volume_db_or(&self, path: &Path, assumed: f64) -> Result<f64, ProbeError> {
        match self.inspector.max_volume_db(path)? {
            Some(max_volume) => Ok(max_volume),
            None => {
                warn!(
                    "無法取得最大音量，假設為 {assumed} dB: {}",
                    path.display()
                );
                Ok(assumed)
            }
        }
    }
}

/// 以檔案大小推算位元率：`size * 8 / 1000` 先取整，再除以長度後截斷
pub fn fallback_bitrate_kbps(
    path: &Path,
    size_bytes: u64,
    duration_seconds: f64,
) -> Result<u64, ProbeError> {
    if !duration_seconds.is_finite() || duration_seconds <= 0.0 {
        return Err(ProbeError::Malformed {
            path: path.to_path_buf(),
            detail: format!("無法以長度 {duration_seconds} 推算位元率"),
        });
    }

    let kilobits = size_bytes.saturating_mul(8) / 1000;
    let kbps = (kilobits as f64 / duration_seconds) as u64;
    Ok(kbps)
}
