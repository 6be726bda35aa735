use crate::component::GifMaker;
use crate::config::Config;
use crate::pause;
use anyhow::Result;
use console::{Term, style};
use rust_i18n::t;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_gif_maker(
    term: &Term,
    shutdown_signal: &Arc<AtomicBool>,
    config: &mut Config,
) -> Result<()> {
    let mut maker = GifMaker::new(config, Arc::clone(shutdown_signal));

    if let Err(e) = maker.run(term) {
        eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold());
    }

    pause(term)?;
    Ok(())
}
