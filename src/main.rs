use anyhow::Result;
use auto_video_remux::config::Config;
use auto_video_remux::init;
use auto_video_remux::menu::{run_menu_loop, run_path};
use auto_video_remux::signal::setup_shutdown_signal;
use console::Term;
use log::info;
use std::path::PathBuf;

fn main() -> Result<()> {
    init::init();
    let shutdown_signal = setup_shutdown_signal()?;

    let mut config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());

    // 帶路徑參數時直接處理，不進入選單
    if let Some(path) = std::env::args_os().nth(1) {
        info!("以命令列模式執行");
        return run_path(&PathBuf::from(path), &config, &shutdown_signal);
    }

    let term = Term::stdout();
    run_menu_loop(&term, &shutdown_signal, &mut config)
}
