use crate::tools::TimeWindow;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 取樣用的亂數產生器；有種子時結果可重現
#[must_use]
pub fn sample_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// 選出試編碼的取樣區間，整個搜尋過程共用同一區間
///
/// 短片從 0 秒開始；否則起點在 `[0, floor(duration) - sample - 1]` 之間均勻亂數。
pub fn choose_sample_window(
    duration_seconds: f64,
    sample_seconds: u64,
    short_source_seconds: u64,
    rng: &mut impl Rng,
) -> TimeWindow {
    let whole_seconds = duration_seconds.max(0.0).floor() as u64;

    let start_seconds = if duration_seconds <= short_source_seconds as f64 {
        0
    } else {
        let latest_start = whole_seconds.saturating_sub(sample_seconds + 1);
        rng.random_range(0..=latest_start)
    };

    TimeWindow {
        start_seconds,
        length_seconds: sample_seconds,
    }
}
