//! 資料夾批次處理
//!
//! 逐一處理每個來源檔案；單一檔案失敗只記錄下來，繼續處理下一個。
//! 收到中斷信號後不再開始新的檔案。

use super::main::MediaPipeline;
use crate::config::FileTypeTable;
use crate::tools::scan_video_files;
use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 批次處理結果統計
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
    /// 因中斷信號而未處理的檔案數
    pub skipped: usize,
    pub cancelled: bool,
}

impl BatchReport {
    #[must_use]
    pub fn success_count(&self) -> usize {
        self.succeeded.len()
    }

    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.failed.len()
    }

    /// 沒有任何檔案被排入處理
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.succeeded.is_empty() && self.failed.is_empty() && self.skipped == 0
    }
}

pub struct BatchRunner<'a> {
    pipeline: MediaPipeline<'a>,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a> BatchRunner<'a> {
    #[must_use]
    pub const fn new(pipeline: MediaPipeline<'a>, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            pipeline,
            shutdown_signal,
        }
    }

    /// 掃描資料夾中的影片後批次處理
    pub fn run_directory(&self, directory: &Path, table: &FileTypeTable) -> Result<BatchReport> {
        let videos = scan_video_files(directory, table)
            .with_context(|| format!("無法掃描資料夾: {}", directory.display()))?;
        info!("找到 {} 個影片檔案: {}", videos.len(), directory.display());

        let files: Vec<PathBuf> = videos.into_iter().map(|v| v.path).collect();
        Ok(self.run_files(&files))
    }

    pub fn run_files(&self, files: &[PathBuf]) -> BatchReport {
        let mut report = BatchReport::default();

        let progress_bar = ProgressBar::new(files.len() as u64);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );

        for (index, file) in files.iter().enumerate() {
            if self.shutdown_signal.load(Ordering::SeqCst) {
                progress_bar.abandon_with_message("操作已中斷");
                report.cancelled = true;
                report.skipped = files.len() - index;
                break;
            }

            let name = file.file_name().unwrap_or_default().to_string_lossy();
            progress_bar.set_message(name.to_string());

            match self.pipeline.process(file) {
                Ok(outcome) => {
                    info!(
                        "完成 {} -> {} (crf {})",
                        file.display(),
                        outcome.final_output.display(),
                        outcome.decision.crf
                    );
                    report.succeeded.push(file.clone());
                }
                Err(e) => {
                    error!("處理失敗 {}: {e}", file.display());
                    report.failed.push((file.clone(), e.to_string()));
                }
            }

            progress_bar.inc(1);
        }

        if !report.cancelled {
            progress_bar.finish_with_message("完成");
        }

        report
    }
}

/// 在終端機印出批次結果
pub fn print_summary(report: &BatchReport) {
    println!();
    println!("{}", style("=== 處理結果 ===").cyan().bold());
    println!("  成功: {} 個", style(report.success_count()).green());
    if report.failure_count() > 0 {
        println!("  失敗: {} 個", style(report.failure_count()).red());
        for (path, reason) in &report.failed {
            println!("    {} {}", style(path.display()).dim(), reason);
        }
    }
    if report.cancelled {
        println!(
            "  {}",
            style(format!("已中斷，{} 個檔案未處理", report.skipped)).yellow()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UserSettings;
    use crate::model::{Track, TrackKind};
    use crate::tools::fake_tools::FakeTools;
    use crate::tools::{HostResources, Toolchain};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_failed_file_does_not_stop_batch() {
        let temp_dir = TempDir::new().unwrap();
        let files: Vec<PathBuf> = ["a.mkv", "b.mkv"]
            .iter()
            .map(|name| {
                let path = temp_dir.path().join(name);
                fs::write(&path, b"x").unwrap();
                path
            })
            .collect();

        // 沒有視訊軌，兩個檔案都會失敗
        let tools = Arc::new(FakeTools {
            tracks: vec![Track::new(1, TrackKind::Audio, "AAC").with_language("fre")],
            ..FakeTools::default()
        });
        let toolchain = Toolchain::from_single(tools);
        let settings = UserSettings::default();
        let pipeline = MediaPipeline::new(&toolchain, &settings, HostResources::new(3));

        let report =
            BatchRunner::new(pipeline, Arc::new(AtomicBool::new(false))).run_files(&files);
        assert_eq!(report.success_count(), 0);
        assert_eq!(report.failure_count(), 2);
        assert!(!report.cancelled);
    }

    #[test]
    fn test_shutdown_signal_stops_scheduling() {
        let tools = Arc::new(FakeTools::default());
        let toolchain = Toolchain::from_single(tools);
        let settings = UserSettings::default();
        let pipeline = MediaPipeline::new(&toolchain, &settings, HostResources::new(3));

        let files = vec![PathBuf::from("/v/a.mkv"), PathBuf::from("/v/b.mkv")];
        let report = BatchRunner::new(pipeline, Arc::new(AtomicBool::new(true))).run_files(&files);

        assert!(report.cancelled);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.success_count() + report.failure_count(), 0);
    }
}
