//! 音訊正規化元件
//!
//! 決定每條音軌的聲道數與增益後重新編碼

mod main;
mod policy;

pub use main::{AudioNormalizer, encoded_audio_path};
pub use policy::{gain_db, is_episodic, target_channels};
