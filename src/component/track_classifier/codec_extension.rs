//! 編碼格式對應抽出檔副檔名
//!
//! 以 mkvmerge 的 codec 名稱做子字串比對（區分大小寫），依表格順序第一個符合者為準。

/// 字幕對應表；不在表中的格式一律為 `sub`
const SUBTITLE_EXTENSIONS: [(&str, &str); 6] = [
    ("SubRip", "srt"),
    ("ASS", "ass"),
    ("HDMV PGS", "sup"),
    ("VobSub", "sup"),
    ("PGS", "sup"),
    ("SUP", "sup"),
];

const DEFAULT_SUBTITLE_EXTENSION: &str = "sub";

/// 音訊對應表；`E-AC-3` 必須排在 `AC-3` 之前
const AUDIO_EXTENSIONS: [(&str, &str); 10] = [
    ("E-AC-3", "eac3"),
    ("AC-3", "ac3"),
    ("AAC", "aac"),
    ("TrueHD", "thd"),
    ("DTS", "dts"),
    ("FLAC", "flac"),
    ("Opus", "opus"),
    ("Vorbis", "ogg"),
    ("MP3", "mp3"),
    ("PCM", "wav"),
];

const DEFAULT_AUDIO_EXTENSION: &str = "bin";

#[must_use]
pub fn subtitle_extension(codec_family: &str) -> &'static str {
    lookup(&SUBTITLE_EXTENSIONS, codec_family).unwrap_or(DEFAULT_SUBTITLE_EXTENSION)
}

#[must_use]
pub fn audio_extension(codec_family: &str) -> &'static str {
    lookup(&AUDIO_EXTENSIONS, codec_family).unwrap_or(DEFAULT_AUDIO_EXTENSION)
}

fn lookup(table: &[(&str, &'static str)], codec_family: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(needle, _)| codec_family.contains(needle))
        .map(|(_, extension)| *extension)
}
