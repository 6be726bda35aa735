use anyhow::Result;
use console::{Term, style};
use gif_clipper::config::Config;
use gif_clipper::init;
use gif_clipper::menu::show_main_menu;
use gif_clipper::signal::setup_shutdown_signal;
use log::{error, info};
use rust_i18n::t;
use std::sync::atomic::Ordering;

#[macro_use]
extern crate rust_i18n;

i18n!("locales", fallback = "en-US");

fn main() -> Result<()> {
    init::init();

    let config = Config::new()?;
    rust_i18n::set_locale(config.settings.language.as_str());
    info!("語言: {}", config.settings.language.as_str());

    run(config)
}

/// 主選單迴圈：選單回傳 `false` 或收到 Ctrl-C 時結束
fn run(mut config: Config) -> Result<()> {
    let term = Term::stdout();
    let shutdown_signal = setup_shutdown_signal();

    loop {
        if shutdown_signal.load(Ordering::SeqCst) {
            info!("收到中斷信號，結束程式");
            return Ok(());
        }

        match show_main_menu(&term, &shutdown_signal, &mut config) {
            Ok(true) => continue,
            Ok(false) => break,
            Err(e) => {
                error!("主選單錯誤: {e:#}");
                eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold());
                return Err(e);
            }
        }
    }

    term.clear_screen()?;
    println!("\n{}", style(t!("main_menu.goodbye")).green().bold());
    info!("程式正常結束");
    Ok(())
}
