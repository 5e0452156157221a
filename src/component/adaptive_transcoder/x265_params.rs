use super::search::SearchOutcome;

/// x265 參數字串：基本參數加上執行緒池大小
#[must_use]
pub fn trial_param_string(base: &str, pool_size: usize) -> String {
    let base = base.trim_matches(':');
    if base.is_empty() {
        format!("pools={pool_size}")
    } else {
        format!("{base}:pools={pool_size}")
    }
}

/// 搜尋結束後凍結的編碼決定，只給完整編碼使用一次
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeDecision {
    pub crf: u8,
    pub extra_noise_reduction: bool,
    pub param_string: String,
}

impl EncodeDecision {
    #[must_use]
    pub fn from_outcome(
        outcome: &SearchOutcome,
        trial_params: &str,
        noise_reduction_params: &str,
    ) -> Self {
        let noise_reduction_params = noise_reduction_params.trim_matches(':');
        let param_string = if outcome.extra_noise_reduction && !noise_reduction_params.is_empty()
        {
            format!("{trial_params}:{noise_reduction_params}")
        } else {
            trial_params.to_string()
        };

        Self {
            crf: outcome.crf,
            extra_noise_reduction: outcome.extra_noise_reduction,
            param_string,
        }
    }
}
