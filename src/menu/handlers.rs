use crate::component::media_pipeline::{BatchRunner, MediaPipeline, print_summary};
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::pause;
use crate::tools::{
    ExternalTools, HostResources, Toolchain, validate_directory_exists, validate_file_exists,
};
use anyhow::{Result, bail};
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Input, Select};
use log::warn;
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

fn build_toolchain(config: &Config, shutdown_signal: &Arc<AtomicBool>) -> Toolchain {
    Toolchain::from_single(Arc::new(ExternalTools::new(
        config.settings.tools.clone(),
        Arc::clone(shutdown_signal),
    )))
}

/// 命令列模式：資料夾批次處理，檔案單獨處理
pub fn run_path(path: &Path, config: &Config, shutdown_signal: &Arc<AtomicBool>) -> Result<()> {
    let toolchain = build_toolchain(config, shutdown_signal);
    let pipeline = MediaPipeline::new(&toolchain, &config.settings, HostResources::detect());

    if path.is_dir() {
        let report = BatchRunner::new(pipeline, Arc::clone(shutdown_signal))
            .run_directory(path, &config.file_type_table)?;
        print_summary(&report);
        if report.failure_count() > 0 {
            bail!("{} 個檔案處理失敗", report.failure_count());
        }
        return Ok(());
    }

    validate_file_exists(path)?;
    let outcome = pipeline.process(path)?;
    println!(
        "{} {}",
        style(t!("convert.done")).green(),
        outcome.final_output.display()
    );
    Ok(())
}

pub fn run_single_file(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    println!("{}", style(t!("convert.file_title")).cyan().bold());

    let Some(input_path) = prompt_path(config, &t!("convert.file_prompt"))? else {
        return Ok(());
    };
    let path = PathBuf::from(&input_path);

    if let Err(e) = validate_file_exists(&path) {
        eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
        pause(term)?;
        return Ok(());
    }
    remember_path(config, &input_path);

    let toolchain = build_toolchain(config, shutdown_signal);
    let pipeline = MediaPipeline::new(&toolchain, &config.settings, HostResources::detect());
    match pipeline.process(&path) {
        Ok(outcome) => {
            println!(
                "\n{} {}",
                style(t!("convert.done")).green(),
                outcome.final_output.display()
            );
            println!(
                "  crf {} {}",
                outcome.decision.crf,
                if outcome.decision.extra_noise_reduction {
                    "+nr"
                } else {
                    ""
                }
            );
        }
        Err(e) => eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e),
    }

    pause(term)?;
    Ok(())
}

pub fn run_folder(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    println!("{}", style(t!("convert.folder_title")).cyan().bold());

    let Some(input_path) = prompt_path(config, &t!("convert.folder_prompt"))? else {
        return Ok(());
    };
    let directory = PathBuf::from(&input_path);

    if let Err(e) = validate_directory_exists(&directory) {
        eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e);
        pause(term)?;
        return Ok(());
    }
    remember_path(config, &input_path);

    println!("{}", style(t!("convert.scanning")).dim());
    let toolchain = build_toolchain(config, shutdown_signal);
    let pipeline = MediaPipeline::new(&toolchain, &config.settings, HostResources::detect());
    match BatchRunner::new(pipeline, Arc::clone(shutdown_signal))
        .run_directory(&directory, &config.file_type_table)
    {
        Ok(report) if report.is_empty() => {
            println!("{}", style(t!("convert.no_videos")).yellow());
        }
        Ok(report) => print_summary(&report),
        Err(e) => eprintln!("{} {:#}", style(t!("common.error_prefix")).red().bold(), e),
    }

    pause(term)?;
    Ok(())
}

/// 只重新封裝先前已抽出與編碼的檔案
pub fn run_remux_existing(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    println!("{}", style(t!("remux.title")).cyan().bold());

    let Some(input_path) = prompt_path(config, &t!("convert.file_prompt"))? else {
        return Ok(());
    };
    let path = PathBuf::from(&input_path);
    remember_path(config, &input_path);

    let toolchain = build_toolchain(config, shutdown_signal);
    let pipeline = MediaPipeline::new(&toolchain, &config.settings, HostResources::detect());
    match pipeline.remux_existing(&path) {
        Ok(output) => println!(
            "\n{} {}",
            style(t!("convert.done")).green(),
            output.display()
        ),
        Err(e) => eprintln!("{} {}", style(t!("common.error_prefix")).red().bold(), e),
    }

    pause(term)?;
    Ok(())
}

/// 從最近使用的路徑中選擇，或輸入新路徑；ESC 回傳 `None`
fn prompt_path(config: &Config, prompt: &str) -> Result<Option<String>> {
    let recent_paths = &config.settings.recent_paths;

    if recent_paths.is_empty() {
        let path: String = Input::new().with_prompt(prompt).interact_text()?;
        return Ok(Some(path.trim().to_string()));
    }

    let mut options: Vec<String> = recent_paths
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let indicator = if Path::new(p).exists() { "✓" } else { "✗" };
            format!("{} [{}] {}", i + 1, indicator, p)
        })
        .collect();
    options.push(t!("common.new_path").to_string());

    println!("{}", style(t!("common.esc_hint")).dim());

    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(t!("common.choose_path"))
        .items(&options)
        .default(0)
        .interact_opt()?;

    match selection {
        None => Ok(None),
        Some(idx) if idx < recent_paths.len() => Ok(Some(recent_paths[idx].clone())),
        Some(_) => {
            let path: String = Input::new().with_prompt(prompt).interact_text()?;
            Ok(Some(path.trim().to_string()))
        }
    }
}

fn remember_path(config: &mut Config, path: &str) {
    add_recent_path(&mut config.settings, path);
    if let Err(e) = save_settings(&config.settings) {
        warn!("無法儲存路徑歷史: {e}");
    }
}
