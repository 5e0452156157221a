//! 流程整合測試 - 以記錄呼叫的假工具組驅動所有階段
//!
//! 不需要 mkvtoolnix 或 ffmpeg；假工具會在目的路徑寫出假檔案。

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use auto_video_remux::component::media_pipeline::{BatchRunner, MediaPipeline};
use auto_video_remux::component::remux_planner::MuxCommand;
use auto_video_remux::config::{FileTypeTable, UserSettings};
use auto_video_remux::error::{PipelineError, ProbeError, ToolError};
use auto_video_remux::model::{Track, TrackKind};
use auto_video_remux::tools::{
    AudioEncodeJob, AudioEncoder, Demuxer, HostResources, Inspector, Muxer, Toolchain,
    VideoEncodeJob, VideoEncoder,
};
use tempfile::TempDir;

#[derive(Default)]
struct RecordingTools {
    tracks: Vec<Track>,
    bitrate_bps: u64,
    /// 檔名包含此字串的來源在探測時失敗
    broken_marker: Option<String>,
    /// 完整編碼後設定中斷旗標，模擬處理中按下 Ctrl-C
    cancel_after_final_encode: Option<Arc<AtomicBool>>,
    extracted: Mutex<Vec<u32>>,
    video_jobs: Mutex<Vec<VideoEncodeJob>>,
    audio_jobs: Mutex<Vec<AudioEncodeJob>>,
    mux_commands: Mutex<Vec<MuxCommand>>,
}

fn write_placeholder(path: &Path, size: usize) -> Result<(), ToolError> {
    fs::write(path, vec![0u8; size]).map_err(|source| ToolError::Spawn {
        tool: "recording".to_string(),
        source,
    })
}

impl Inspector for RecordingTools {
    fn identify(&self, path: &Path) -> Result<Vec<Track>, ProbeError> {
        let name = path.file_name().unwrap().to_string_lossy();
        if let Some(marker) = &self.broken_marker {
            if name.contains(marker.as_str()) {
                return Err(ProbeError::Malformed {
                    path: path.to_path_buf(),
                    detail: "truncated header".to_string(),
                });
            }
        }
        Ok(self.tracks.clone())
    }

    fn duration_seconds(&self, _path: &Path) -> Result<f64, ProbeError> {
        Ok(3600.0)
    }

    fn reported_bitrate(&self, _path: &Path) -> Result<Option<u64>, ProbeError> {
        Ok(Some(self.bitrate_bps))
    }

    fn channel_count(&self, _path: &Path) -> Result<Option<u32>, ProbeError> {
        Ok(Some(6))
    }

    fn max_volume_db(&self, _path: &Path) -> Result<Option<f64>, ProbeError> {
        Ok(Some(-3.0))
    }
}

impl Demuxer for RecordingTools {
    fn extract_track(
        &self,
        _source: &Path,
        track_id: u32,
        destination: &Path,
    ) -> Result<(), ToolError> {
        // 字幕大小不同，讓大小推測有依據
        write_placeholder(destination, 100 * (track_id as usize + 1))?;
        self.extracted.lock().unwrap().push(track_id);
        Ok(())
    }
}

impl VideoEncoder for RecordingTools {
    fn encode_video(&self, job: &VideoEncodeJob) -> Result<(), ToolError> {
        self.video_jobs.lock().unwrap().push(job.clone());
        write_placeholder(&job.destination, 64)?;
        if let (None, Some(flag)) = (job.window, &self.cancel_after_final_encode) {
            flag.store(true, Ordering::SeqCst);
        }
        Ok(())
    }
}

impl AudioEncoder for RecordingTools {
    fn encode_audio(&self, job: &AudioEncodeJob) -> Result<(), ToolError> {
        self.audio_jobs.lock().unwrap().push(job.clone());
        write_placeholder(&job.destination, 32)
    }
}

impl Muxer for RecordingTools {
    fn mux(&self, command: &MuxCommand) -> Result<(), ToolError> {
        self.mux_commands.lock().unwrap().push(command.clone());
        write_placeholder(&command.output, 128)
    }
}

/// 一條視訊、法語音訊、法語強制字幕、法語完整字幕、英語音訊
fn movie_tracks() -> Vec<Track> {
    vec![
        Track::new(0, TrackKind::Video, "HEVC/H.265/MPEG-H").with_language("und"),
        Track::new(1, TrackKind::Audio, "AC-3").with_language("fre"),
        Track::new(2, TrackKind::Subtitle, "SubRip/SRT")
            .with_language("fre")
            .with_display_name("Forced")
            .with_forced(true),
        Track::new(3, TrackKind::Subtitle, "SubRip/SRT")
            .with_language("fre")
            .with_display_name("Full"),
        Track::new(4, TrackKind::Audio, "E-AC-3").with_language("eng"),
    ]
}

fn recording_tools() -> RecordingTools {
    RecordingTools {
        tracks: movie_tracks(),
        bitrate_bps: 2_000_000,
        ..RecordingTools::default()
    }
}

fn seeded_settings() -> UserSettings {
    let mut settings = UserSettings::default();
    settings.transcode.sample_seed = Some(42);
    settings.audio.parallel = false;
    settings
}

fn create_source(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"matroska").unwrap();
    path
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect()
}

#[test]
fn test_end_to_end_single_container() {
    let temp_dir = TempDir::new().unwrap();
    let source = create_source(temp_dir.path(), "movie.mkv");
    let tools = Arc::new(recording_tools());
    let toolchain = Toolchain::from_single(Arc::clone(&tools));
    let settings = seeded_settings();

    let outcome = MediaPipeline::new(&toolchain, &settings, HostResources::new(12))
        .process(&source)
        .unwrap();

    // 視訊不抽出，其餘四條依軌道順序抽出
    assert_eq!(*tools.extracted.lock().unwrap(), vec![1, 2, 3, 4]);
    assert_eq!(outcome.audio_files.len(), 2);
    assert_eq!(outcome.subtitle_files.len(), 2);
    assert_eq!(
        file_names(&outcome.audio_files.iter().map(|f| f.path.clone()).collect::<Vec<_>>()),
        vec!["movie.audio_1_fre_main.m4a", "movie.audio_4_eng_main.m4a"]
    );

    // 第一次試編碼就落在目標區間，完整編碼沿用該 crf
    assert_eq!(outcome.decision.crf, 21);
    assert!(!outcome.decision.extra_noise_reduction);
    let video_jobs = tools.video_jobs.lock().unwrap();
    assert_eq!(video_jobs.len(), 2);
    assert!(video_jobs[0].window.is_some());
    assert!(video_jobs[1].window.is_none());
    assert_eq!(video_jobs[1].crf, 21);
    assert!(video_jobs[1].x265_params.ends_with(":pools=4"));
    assert_eq!(video_jobs[1].destination, temp_dir.path().join("movie_h265.mkv"));

    let commands = tools.mux_commands.lock().unwrap();
    assert_eq!(commands.len(), 1);
    let command = &commands[0];
    assert_eq!(command.output, temp_dir.path().join("movie_final.mkv"));

    let kinds: Vec<TrackKind> = command.entries.iter().map(|e| e.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TrackKind::Video,
            TrackKind::Audio,
            TrackKind::Audio,
            TrackKind::Subtitle,
            TrackKind::Subtitle
        ]
    );
    let names: Vec<&str> = command
        .entries
        .iter()
        .map(|e| e.display_name.as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "Main Video",
            "French AAC 1",
            "English AAC 2",
            "French Forced",
            "French Full"
        ]
    );
    let forced: Vec<bool> = command.entries.iter().map(|e| e.forced).collect();
    assert_eq!(forced, vec![false, false, false, true, false]);

    let args: Vec<String> = command
        .to_args()
        .iter()
        .map(|a| a.to_string_lossy().to_string())
        .collect();
    let flags: Vec<&str> = args
        .windows(2)
        .filter(|w| w[0] == "--forced-track")
        .map(|w| w[1].as_str())
        .collect();
    assert_eq!(flags, vec!["0:no", "0:no", "0:no", "0:yes", "0:no"]);
}

#[test]
fn test_audio_policy_applied_per_track() {
    let temp_dir = TempDir::new().unwrap();
    let source = create_source(temp_dir.path(), "Show.S01E02.mkv");
    let tools = Arc::new(recording_tools());
    let toolchain = Toolchain::from_single(Arc::clone(&tools));
    let settings = seeded_settings();

    MediaPipeline::new(&toolchain, &settings, HostResources::new(4))
        .process(&source)
        .unwrap();

    let jobs = tools.audio_jobs.lock().unwrap();
    assert_eq!(jobs.len(), 2);
    for job in jobs.iter() {
        // 影集強制立體聲；峰值 -3 dB 只補到 0 dB
        assert_eq!(job.channels, 2);
        assert!((job.gain_db - 3.0).abs() < f64::EPSILON);
    }
}

#[test]
fn test_trial_scratch_files_are_removed() {
    let temp_dir = TempDir::new().unwrap();
    let source = create_source(temp_dir.path(), "movie.mkv");
    let tools = Arc::new(RecordingTools {
        // 每次都偏高，直到 crf 上限
        bitrate_bps: 9_000_000,
        ..recording_tools()
    });
    let toolchain = Toolchain::from_single(Arc::clone(&tools));
    let settings = seeded_settings();

    let outcome = MediaPipeline::new(&toolchain, &settings, HostResources::new(4))
        .process(&source)
        .unwrap();
    assert_eq!(outcome.decision.crf, 22);
    assert!(outcome.decision.extra_noise_reduction);

    let leftovers: Vec<String> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .filter(|name| name.contains(".trial-"))
        .collect();
    assert!(leftovers.is_empty(), "殘留暫存檔: {leftovers:?}");
}

#[test]
fn test_seeded_sample_window_is_reproducible() {
    let windows: Vec<_> = (0..2)
        .map(|_| {
            let temp_dir = TempDir::new().unwrap();
            let source = create_source(temp_dir.path(), "movie.mkv");
            let tools = Arc::new(recording_tools());
            let toolchain = Toolchain::from_single(Arc::clone(&tools));
            let settings = seeded_settings();
            MediaPipeline::new(&toolchain, &settings, HostResources::new(4))
                .process(&source)
                .unwrap();
            tools.video_jobs.lock().unwrap()[0].window
        })
        .collect();

    assert!(windows[0].is_some());
    assert_eq!(windows[0], windows[1]);
}

#[test]
fn test_remux_existing_reuses_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let source = create_source(temp_dir.path(), "movie.mkv");
    let tools = Arc::new(recording_tools());
    let toolchain = Toolchain::from_single(Arc::clone(&tools));
    let settings = seeded_settings();
    let pipeline = MediaPipeline::new(&toolchain, &settings, HostResources::new(4));

    pipeline.process(&source).unwrap();
    assert!(temp_dir.path().join("movie.tracks.json").is_file());

    let output = pipeline.remux_existing(&source).unwrap();
    assert_eq!(output, temp_dir.path().join("movie_final.mkv"));

    let commands = tools.mux_commands.lock().unwrap();
    assert_eq!(commands.len(), 2);
    assert_eq!(commands[0], commands[1]);
}

#[test]
fn test_batch_continues_after_failed_file() {
    let temp_dir = TempDir::new().unwrap();
    create_source(temp_dir.path(), "a_broken.mkv");
    create_source(temp_dir.path(), "b_good.mkv");
    fs::write(temp_dir.path().join("notes.txt"), b"not a video").unwrap();

    let tools = Arc::new(RecordingTools {
        broken_marker: Some("broken".to_string()),
        ..recording_tools()
    });
    let toolchain = Toolchain::from_single(Arc::clone(&tools));
    let settings = seeded_settings();
    let pipeline = MediaPipeline::new(&toolchain, &settings, HostResources::new(4));
    let table = FileTypeTable {
        video_file: vec![".mkv".to_string()],
    };

    let report = BatchRunner::new(pipeline, Arc::new(AtomicBool::new(false)))
        .run_directory(temp_dir.path(), &table)
        .unwrap();

    assert_eq!(report.success_count(), 1);
    assert_eq!(report.failure_count(), 1);
    assert!(report.failed[0].0.ends_with("a_broken.mkv"));
    assert!(report.succeeded[0].ends_with("b_good.mkv"));
    assert!(temp_dir.path().join("b_good_final.mkv").is_file());
}

#[test]
fn test_batch_stops_after_shutdown_signal() {
    let temp_dir = TempDir::new().unwrap();
    let files = vec![
        create_source(temp_dir.path(), "one.mkv"),
        create_source(temp_dir.path(), "two.mkv"),
        create_source(temp_dir.path(), "three.mkv"),
    ];

    let shutdown_signal = Arc::new(AtomicBool::new(false));
    let tools = Arc::new(RecordingTools {
        cancel_after_final_encode: Some(Arc::clone(&shutdown_signal)),
        ..recording_tools()
    });
    let toolchain = Toolchain::from_single(Arc::clone(&tools));
    let settings = seeded_settings();
    let pipeline = MediaPipeline::new(&toolchain, &settings, HostResources::new(4));

    let report = BatchRunner::new(pipeline, shutdown_signal).run_files(&files);

    // 進行中的檔案會完成，之後的檔案不再開始
    assert!(report.cancelled);
    assert_eq!(report.success_count(), 1);
    assert_eq!(report.skipped, 2);
    assert!(!temp_dir.path().join("two_final.mkv").exists());
}

#[test]
fn test_missing_video_track_fails_only_that_file() {
    let temp_dir = TempDir::new().unwrap();
    let source = create_source(temp_dir.path(), "radio.mka");
    let tools = Arc::new(RecordingTools {
        tracks: vec![Track::new(0, TrackKind::Audio, "FLAC").with_language("fre")],
        ..recording_tools()
    });
    let toolchain = Toolchain::from_single(Arc::clone(&tools));
    let settings = seeded_settings();

    let err = MediaPipeline::new(&toolchain, &settings, HostResources::new(4))
        .process(&source)
        .unwrap_err();
    assert!(matches!(err, PipelineError::NoVideoTrack(_)));
    assert!(tools.extracted.lock().unwrap().is_empty());
}
