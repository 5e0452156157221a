//! 資料模型
//!
//! 探測得到的原始軌道、分類結果與抽出檔案記錄

mod classified;
mod role;
mod track;

pub use classified::{ClassifiedTrack, ExtractedFile};
pub use role::{RoleAssignment, TrackRole};
pub use track::{Track, TrackKind, normalize_language};
