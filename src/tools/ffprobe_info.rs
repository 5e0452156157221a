use crate::error::ProbeError;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct FfprobeOutput {
    format: Option<FormatInfo>,
    streams: Option<Vec<StreamInfo>>,
}

#[derive(Deserialize)]
struct FormatInfo {
    duration: Option<String>,
    bit_rate: Option<String>,
}

#[derive(Deserialize)]
struct StreamInfo {
    bit_rate: Option<String>,
    channels: Option<u32>,
    duration: Option<String>,
}

/// ffprobe 參數：容器長度
pub const DURATION_ARGS: [&str; 6] = [
    "-v",
    "error",
    "-show_entries",
    "format=duration:stream=duration",
    "-of",
    "json",
];

/// ffprobe 參數：第一條視訊的位元率與容器位元率
pub const BITRATE_ARGS: [&str; 8] = [
    "-v",
    "error",
    "-select_streams",
    "v:0",
    "-show_entries",
    "stream=bit_rate:format=bit_rate",
    "-of",
    "json",
];

/// ffprobe 參數：第一條音訊的聲道數
pub const CHANNELS_ARGS: [&str; 8] = [
    "-v",
    "error",
    "-select_streams",
    "a:0",
    "-show_entries",
    "stream=channels",
    "-of",
    "json",
];

fn parse_output(path: &Path, stdout: &str) -> Result<FfprobeOutput, ProbeError> {
    if stdout.trim().is_empty() {
        return Err(ProbeError::Empty {
            path: path.to_path_buf(),
        });
    }
    serde_json::from_str(stdout).map_err(|e| ProbeError::Malformed {
        path: path.to_path_buf(),
        detail: format!("無法解析 ffprobe 輸出: {e}"),
    })
}

/// 數值欄位；`N/A`、`unknown` 等視為缺值
fn parse_numeric<T: std::str::FromStr>(raw: Option<&String>) -> Option<T> {
    raw.map(|s| s.trim())
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("n/a") && !s.eq_ignore_ascii_case("unknown"))
        .and_then(|s| s.parse::<T>().ok())
}

/// 取得長度（優先從 format，其次從 stream）
pub fn parse_duration(path: &Path, stdout: &str) -> Result<f64, ProbeError> {
    let probe = parse_output(path, stdout)?;

    let format_duration = probe
        .format
        .as_ref()
        .and_then(|f| parse_numeric::<f64>(f.duration.as_ref()));
    let stream_duration = probe
        .streams
        .iter()
        .flatten()
        .find_map(|s| parse_numeric::<f64>(s.duration.as_ref()));

    format_duration
        .or(stream_duration)
        .filter(|d| d.is_finite() && *d > 0.0)
        .ok_or_else(|| ProbeError::Malformed {
            path: path.to_path_buf(),
            detail: "無法取得長度".to_string(),
        })
}

/// 回報的位元率（bit/s）：先看視訊串流，其次容器；都沒有則為 `None`
pub fn parse_reported_bitrate(path: &Path, stdout: &str) -> Result<Option<u64>, ProbeError> {
    let probe = parse_output(path, stdout)?;

    let stream_rate = probe
        .streams
        .iter()
        .flatten()
        .find_map(|s| parse_numeric::<u64>(s.bit_rate.as_ref()));
    let format_rate = probe
        .format
        .as_ref()
        .and_then(|f| parse_numeric::<u64>(f.bit_rate.as_ref()));

    Ok(stream_rate.or(format_rate).filter(|rate| *rate > 0))
}

pub fn parse_channels(path: &Path, stdout: &str) -> Result<Option<u32>, ProbeError> {
    let probe = parse_output(path, stdout)?;
    Ok(probe
        .streams
        .iter()
        .flatten()
        .find_map(|s| s.channels)
        .filter(|c| *c > 0))
}
