pub mod load;
pub mod save;
pub mod types;

pub use types::{
    AudioSettings, Config, FileTypeTable, Language, MAX_RECENT_PATHS, SelectionSettings,
    ToolPaths, TranscodeSettings, UserSettings,
};
