//! 軌道抽出元件
//!
//! 呼叫外部 demuxer 將每條選取的軌道寫成獨立檔案，並留下軌道清單

mod file_name;
mod main;
mod manifest;

pub use file_name::{
    extracted_file_name, language_token, parse_extracted_file_name, parse_extracted_file_name_for,
};
pub use main::StreamExtractor;
pub use manifest::TrackManifest;
