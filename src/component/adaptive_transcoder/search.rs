//! CRF 搜尋狀態機
//!
//! 不涉及任何外部程序：每次試編碼量到的位元率餵給 `transition`，
//! 由回傳值決定繼續下一次試編碼或結束。

use crate::config::TranscodeSettings;
use crate::error::EncodeError;

/// 搜尋的邊界與目標區間
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchPolicy {
    pub min_crf: u8,
    pub max_crf: u8,
    pub start_crf: u8,
    pub low_kbps: u64,
    pub high_kbps: u64,
    pub max_trials: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchState {
    pub crf: u8,
    pub trials_remaining: u32,
    pub last_bitrate: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// 位元率落在區間內
    InBand,
    /// 超出區間但 CRF 已在該方向的邊界，且沒有更強的手段
    PinnedAtBound,
    /// 已在最大 CRF 仍超過上限，改加強降噪
    CeilingReached,
    /// 試編碼次數用完
    TrialsExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub crf: u8,
    pub extra_noise_reduction: bool,
    pub reason: StopReason,
    pub trials_used: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStep {
    Continue(SearchState),
    Finished(SearchOutcome),
}

impl SearchPolicy {
    pub fn from_settings(settings: &TranscodeSettings) -> Result<Self, EncodeError> {
        let policy = Self {
            min_crf: settings.min_crf,
            max_crf: settings.max_crf,
            start_crf: settings.start_crf,
            low_kbps: settings.low_kbps,
            high_kbps: settings.high_kbps,
            max_trials: settings.max_trials,
        };
        policy.validate()?;
        Ok(policy)
    }

    fn validate(&self) -> Result<(), EncodeError> {
        if self.min_crf > self.max_crf {
            return Err(EncodeError::InvalidSettings(format!(
                "min_crf {} 大於 max_crf {}",
                self.min_crf, self.max_crf
            )));
        }
        if !(self.min_crf..=self.max_crf).contains(&self.start_crf) {
            return Err(EncodeError::InvalidSettings(format!(
                "start_crf {} 不在 [{}, {}] 之間",
                self.start_crf, self.min_crf, self.max_crf
            )));
        }
        if self.low_kbps > self.high_kbps {
            return Err(EncodeError::InvalidSettings(format!(
                "low_kbps {} 大於 high_kbps {}",
                self.low_kbps, self.high_kbps
            )));
        }
        Ok(())
    }

    #[must_use]
    pub const fn initial_state(&self) -> SearchState {
        SearchState {
            crf: self.start_crf,
            trials_remaining: self.max_trials,
            last_bitrate: None,
        }
    }

    /// 尚未試編碼就沒有剩餘次數時的結果
    #[must_use]
    pub const fn exhausted(&self, state: SearchState) -> SearchOutcome {
        SearchOutcome {
            crf: state.crf,
            extra_noise_reduction: false,
            reason: StopReason::TrialsExhausted,
            trials_used: self.max_trials - state.trials_remaining,
        }
    }

    /// 以一次試編碼的結果推進狀態
    ///
    /// 每次只調整 ±1；次數用完時保留最後一次調整後的 CRF。
    #[must_use]
    pub fn transition(&self, state: SearchState, measured_kbps: u64) -> SearchStep {
        let trials_remaining = state.trials_remaining.saturating_sub(1);
        let trials_used = self.max_trials - trials_remaining;

        let finish = |crf: u8, extra_noise_reduction: bool, reason: StopReason| {
            SearchStep::Finished(SearchOutcome {
                crf,
                extra_noise_reduction,
                reason,
                trials_used,
            })
        };

        let next_crf = if measured_kbps > self.high_kbps {
            if state.crf >= self.max_crf {
                return finish(self.max_crf, true, StopReason::CeilingReached);
            }
            state.crf + 1
        } else if measured_kbps < self.low_kbps && state.crf > self.min_crf {
            state.crf - 1
        } else {
            let reason = if measured_kbps < self.low_kbps {
                StopReason::PinnedAtBound
            } else {
                StopReason::InBand
            };
            return finish(state.crf, false, reason);
        };

        if trials_remaining == 0 {
            return finish(next_crf, false, StopReason::TrialsExhausted);
        }

        SearchStep::Continue(SearchState {
            crf: next_crf,
            trials_remaining,
            last_bitrate: Some(measured_kbps),
        })
    }

    /// 反覆以目前狀態呼叫 `measure` 取得試編碼位元率，直到搜尋結束
    ///
    /// `measure` 回傳 `Ok(None)` 表示沒有更多量測值，視為次數用完；
    /// 回傳錯誤時立即中止並交回錯誤。
    pub fn drive<E>(
        &self,
        mut measure: impl FnMut(SearchState) -> Result<Option<u64>, E>,
    ) -> Result<SearchOutcome, E> {
        let mut state = self.initial_state();

        while state.trials_remaining > 0 {
            let Some(measured) = measure(state)? else {
                break;
            };
            match self.transition(state, measured) {
                SearchStep::Continue(next) => state = next,
                SearchStep::Finished(outcome) => return Ok(outcome),
            }
        }
        Ok(self.exhausted(state))
    }

    #[cfg(test)]
    fn run(&self, measurements: impl IntoIterator<Item = u64>) -> SearchOutcome {
        let mut measurements = measurements.into_iter();
        match self.drive(|_| Ok::<_, std::convert::Infallible>(measurements.next())) {
            Ok(outcome) => outcome,
            Err(never) => match never {},
        }
    }
}
