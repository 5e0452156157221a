//! 重新封裝元件
//!
//! 由抽出檔重建輸出軌道的語言、名稱與強制旗標，產生 mkvmerge 封裝計畫

mod main;
mod mux_command;
mod naming;

pub use main::RemuxPlanner;
pub use mux_command::{MuxCommand, MuxEntry};
pub use naming::{audio_display_name, language_name, subtitle_display_name};
