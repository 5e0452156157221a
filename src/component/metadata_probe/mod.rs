//! 中繼資料探測元件
//!
//! 包裝 `Inspector`，提供軌道清單、長度與位元率查詢

mod main;

pub use main::{MetadataProbe, fallback_bitrate_kbps};
