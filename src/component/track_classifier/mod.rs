//! 軌道分類元件
//!
//! 純函式：由容器中繼資料推導每條軌道的語言與用途，不做任何 I/O

mod classifier;
mod codec_extension;
mod tie_break;

pub use classifier::{classify, language_matches_target, target_family};
pub use codec_extension::{audio_extension, subtitle_extension};
pub use tie_break::resolve_ambiguous_subtitles;
