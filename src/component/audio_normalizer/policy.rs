use crate::config::AudioSettings;
use regex::Regex;
use std::sync::LazyLock;

static REGEX_SEASON_EPISODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)s\d{1,2}e\d{1,2}").expect("Invalid regex"));

/// 檔名含 `S01E01` 之類的季集標記即視為影集
#[must_use]
pub fn is_episodic(file_name: &str) -> bool {
    REGEX_SEASON_EPISODE.is_match(file_name)
}

/// 輸出聲道數：影集一律雙聲道，其餘不超過上限
#[must_use]
pub fn target_channels(source_channels: u32, episodic: bool, settings: &AudioSettings) -> u32 {
    if episodic {
        settings.episodic_channels
    } else {
        source_channels.min(settings.max_channels)
    }
}

/// 增益：預設提升固定量，但峰值加上增益不得超過 0 dB
#[must_use]
pub fn gain_db(max_volume_db: f64, nominal_boost_db: f64) -> f64 {
    if max_volume_db + nominal_boost_db > 0.0 {
        -max_volume_db
    } else {
        nominal_boost_db
    }
}
