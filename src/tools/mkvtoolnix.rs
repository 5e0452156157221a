//! mkvmerge -J 輸出解析

use crate::error::ProbeError;
use crate::model::{Track, TrackKind, normalize_language};
use log::debug;
use serde::Deserialize;
use std::path::Path;

#[derive(Deserialize)]
struct IdentifyOutput {
    tracks: Option<Vec<IdentifiedTrack>>,
}

#[derive(Deserialize)]
struct IdentifiedTrack {
    id: Option<u32>,
    #[serde(rename = "type")]
    kind: Option<String>,
    codec: Option<String>,
    properties: Option<TrackProperties>,
}

#[derive(Deserialize)]
struct TrackProperties {
    language: Option<String>,
    language_ietf: Option<String>,
    track_name: Option<String>,
    forced_track: Option<bool>,
    codec_id: Option<String>,
}

/// 解析 `mkvmerge -J` 的 JSON，保留容器中的軌道順序
///
/// 沒有 id 或 type 無法辨識（例如 buttons）的軌道直接略過；
/// 其他缺漏欄位保留為 `None`。
pub fn parse_identify_output(path: &Path, stdout: &str) -> Result<Vec<Track>, ProbeError> {
    if stdout.trim().is_empty() {
        return Err(ProbeError::Empty {
            path: path.to_path_buf(),
        });
    }

    let output: IdentifyOutput =
        serde_json::from_str(stdout).map_err(|e| ProbeError::Malformed {
            path: path.to_path_buf(),
            detail: format!("mkvmerge JSON: {e}"),
        })?;

    let raw_tracks = output.tracks.ok_or_else(|| ProbeError::Malformed {
        path: path.to_path_buf(),
        detail: "缺少 tracks 欄位".to_string(),
    })?;

    let tracks: Vec<Track> = raw_tracks.into_iter().filter_map(convert_track).collect();

    if tracks.is_empty() {
        return Err(ProbeError::Empty {
            path: path.to_path_buf(),
        });
    }

    debug!("{} 共有 {} 條軌道", path.display(), tracks.len());
    Ok(tracks)
}

fn convert_track(raw: IdentifiedTrack) -> Option<Track> {
    let id = raw.id?;
    let kind = TrackKind::from_mkvmerge(raw.kind.as_deref()?)?;
    let properties = raw.properties;

    let codec_family = raw
        .codec
        .or_else(|| properties.as_ref().and_then(|p| p.codec_id.clone()))
        .unwrap_or_default();

    let language = properties.as_ref().and_then(|p| {
        normalize_language(p.language.as_deref())
            .or_else(|| normalize_language(p.language_ietf.as_deref()))
    });

    let display_name = properties
        .as_ref()
        .and_then(|p| p.track_name.clone())
        .filter(|name| !name.trim().is_empty());

    let forced = properties.as_ref().and_then(|p| p.forced_track);

    Some(Track {
        id,
        kind,
        codec_family,
        language,
        display_name,
        forced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
      "container": { "recognized": true, "supported": true, "type": "Matroska" },
      "tracks": [
        { "id": 0, "type": "video", "codec": "HEVC/H.265/MPEG-H",
          "properties": { "language": "und", "codec_id": "V_MPEGH/ISO/HEVC" } },
        { "id": 1, "type": "audio", "codec": "E-AC-3",
          "properties": { "language": "fre", "track_name": "VFQ" } },
        { "id": 2, "type": "audio", "codec": "AAC", "properties": {} },
        { "id": 3, "type": "subtitles", "codec": "SubRip/SRT",
          "properties": { "language": "fre", "track_name": "Forcés", "forced_track": true } },
        { "id": 4, "type": "subtitles", "codec": "HDMV PGS",
          "properties": { "language": "und", "language_ietf": "fr-CA", "track_name": "" } },
        { "id": 5, "type": "buttons", "codec": "HDMV IG" }
      ]
    }"#;

    #[test]
    fn test_parse_identify_output() {
        let tracks = parse_identify_output(Path::new("in.mkv"), SAMPLE).unwrap();
        assert_eq!(tracks.len(), 5);

        assert_eq!(tracks[0].kind, TrackKind::Video);
        assert_eq!(tracks[0].language, None);

        assert_eq!(tracks[1].language.as_deref(), Some("fre"));
        assert_eq!(tracks[1].display_name.as_deref(), Some("VFQ"));
        assert_eq!(tracks[1].forced, None);

        assert_eq!(tracks[2].language, None);
        assert_eq!(tracks[2].display_name, None);

        assert_eq!(tracks[3].kind, TrackKind::Subtitle);
        assert_eq!(tracks[3].forced, Some(true));

        assert_eq!(tracks[4].language.as_deref(), Some("fr-ca"));
        assert_eq!(tracks[4].display_name, None);
        assert_eq!(tracks[4].codec_family, "HDMV PGS");
    }

    #[test]
    fn test_empty_output_is_error() {
        let err = parse_identify_output(Path::new("in.mkv"), "  ").unwrap_err();
        assert!(matches!(err, ProbeError::Empty { .. }));
    }

    #[test]
    fn test_malformed_output_is_error() {
        let err = parse_identify_output(Path::new("in.mkv"), "Track ID 0: video").unwrap_err();
        assert!(matches!(err, ProbeError::Malformed { .. }));

        let err = parse_identify_output(Path::new("in.mkv"), r#"{"container":{}}"#).unwrap_err();
        assert!(matches!(err, ProbeError::Malformed { .. }));
    }

    #[test]
    fn test_no_usable_tracks_is_empty() {
        let err =
            parse_identify_output(Path::new("in.mkv"), r#"{"tracks":[{"type":"buttons"}]}"#)
                .unwrap_err();
        assert!(matches!(err, ProbeError::Empty { .. }));
    }
}
