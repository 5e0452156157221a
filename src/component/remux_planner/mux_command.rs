use crate::model::TrackKind;
use std::ffi::OsString;
use std::path::PathBuf;

/// 輸出容器中的一條軌道（每個輸入檔只取第 0 軌）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxEntry {
    pub path: PathBuf,
    pub kind: TrackKind,
    /// `None` 時保留輸入檔原本的語言標記
    pub language: Option<String>,
    pub display_name: String,
    pub forced: bool,
}

/// 已排序的封裝計畫
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MuxCommand {
    pub output: PathBuf,
    pub entries: Vec<MuxEntry>,
}

impl MuxCommand {
    /// mkvmerge 參數：`-o <out>` 之後每個輸入檔前放它自己的軌道選項
    #[must_use]
    pub fn to_args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["-o".into(), self.output.clone().into()];

        for entry in &self.entries {
            if let Some(language) = &entry.language {
                args.push("--language".into());
                args.push(format!("0:{language}").into());
            }
            args.push("--track-name".into());
            args.push(format!("0:{}", entry.display_name).into());
            args.push("--forced-track".into());
            args.push(format!("0:{}", if entry.forced { "yes" } else { "no" }).into());
            args.push(entry.path.clone().into());
        }

        args
    }
}
