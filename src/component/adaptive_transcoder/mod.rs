//! 自適應視訊轉碼元件
//!
//! 以有限次數的 60 秒試編碼搜尋符合位元率區間的 CRF，再輸出完整的 x265 視訊

mod main;
mod sample_window;
mod search;
mod x265_params;

pub use main::AdaptiveTranscoder;
pub use sample_window::{choose_sample_window, sample_rng};
pub use search::{SearchOutcome, SearchPolicy, SearchState, SearchStep, StopReason};
pub use x265_params::{EncodeDecision, trial_param_string};
