use super::range_bar::RangeBar;
use super::workbench::{SelectionObserver, Workbench};
use crate::component::gif_encoder::{EncodingPipeline, default_output_name};
use crate::component::preview::PreviewImages;
use crate::config::Config;
use crate::config::save::{add_recent_path, save_settings};
use crate::error::{PipelineError, ProbeError};
use crate::session::Session;
use crate::tools::{FfmpegFrameSource, SystemProcessRunner, validate_file_exists};
use anyhow::{Result, bail};
use console::{Term, style};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};
use log::{error, info};
use rust_i18n::t;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// 每個終端機字元欄位換算成的像素寬度
const COLUMN_WIDTH_PX: u32 = 8;

/// 以終端機欄數估算縮圖條可用的寬度
fn viewport_px(term: &Term) -> u32 {
    let (_, columns) = term.size();
    u32::from(columns) * COLUMN_WIDTH_PX
}

/// 預覽 / 縮圖條結果直接印在終端機
struct ConsoleObserver;

impl SelectionObserver for ConsoleObserver {
    fn on_preview_ready(&mut self, images: &PreviewImages) {
        let show = |path: &Option<PathBuf>| {
            path.as_ref()
                .map_or_else(|| "-".to_string(), |p| p.display().to_string())
        };
        println!(
            "{} {} | {}",
            style(t!("gif_maker.preview_ready")).dim(),
            show(&images.start),
            show(&images.end)
        );
    }

    fn on_strip_ready(&mut self, frames: &[PathBuf]) {
        println!(
            "{}",
            style(t!("gif_maker.strip_ready", count = frames.len())).dim()
        );
    }

    fn on_probe_failed(&mut self, error: &ProbeError) {
        eprintln!("{} {error}", style(t!("gif_maker.probe_failed")).red());
    }
}

/// 互動式 GIF 擷取工具
pub struct GifMaker<'a> {
    config: &'a mut Config,
    shutdown_signal: Arc<AtomicBool>,
}

impl<'a> GifMaker<'a> {
    pub const fn new(config: &'a mut Config, shutdown_signal: Arc<AtomicBool>) -> Self {
        Self {
            config,
            shutdown_signal,
        }
    }

    pub fn run(&mut self, term: &Term) -> Result<()> {
        println!("{}", style(t!("gif_maker.title")).cyan().bold());

        let settings = &self.config.settings;
        let mut session = Session::new(Path::new(&settings.tool_dir), Path::new(&settings.cache_dir));
        if !session.tools().is_ready() {
            self.prepare_tools(&mut session)?;
        }

        let source = FfmpegFrameSource::new(session.tools(), session.cache_dir())?;
        let mut bench = Workbench::new(session, Box::new(source), viewport_px(term));
        bench.add_observer(Box::new(ConsoleObserver));

        if !self.load_video(&mut bench)? {
            return Ok(());
        }

        while !self.shutdown_signal.load(Ordering::SeqCst) {
            bench.set_viewport_width(viewport_px(term));
            bench.settle();
            self.print_status(&bench);

            let options = vec![
                t!("gif_maker.opt_drag"),
                t!("gif_maker.opt_edit_times"),
                t!("gif_maker.opt_clip"),
                t!("gif_maker.opt_generate"),
                t!("gif_maker.opt_load"),
                t!("gif_maker.opt_back"),
            ];

            let selection = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(t!("gif_maker.prompt"))
                .items(&options)
                .default(0)
                .interact_on_opt(term)?;

            match selection {
                Some(0) => RangeBar::for_term(term).run(term, &mut bench)?,
                Some(1) => self.edit_times(&mut bench)?,
                Some(2) => match bench.export_range_clip(&SystemProcessRunner) {
                    Ok(path) => println!(
                        "{} {}",
                        style(t!("gif_maker.clip_done")).green(),
                        path.display()
                    ),
                    Err(e) => eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold()),
                },
                Some(3) => self.generate(&mut bench)?,
                Some(4) => {
                    bench.unload_media();
                    if !self.load_video(&mut bench)? {
                        break;
                    }
                }
                Some(5) | None => break,
                _ => unreachable!(),
            }
        }

        bench.unload_media();
        Ok(())
    }

    /// 找不到 ffmpeg / ffprobe 時提示放入工具資料夾後重新尋找
    fn prepare_tools(&self, session: &mut Session) -> Result<()> {
        loop {
            println!(
                "{}",
                style(t!(
                    "gif_maker.tools_missing",
                    dir = session.tool_dir().display().to_string()
                ))
                .yellow()
            );

            let retry = Confirm::new()
                .with_prompt(t!("gif_maker.tools_retry"))
                .default(true)
                .interact()?;
            if !retry {
                bail!(t!("gif_maker.tools_unavailable").to_string());
            }

            if session.reprepare().is_ready() {
                return Ok(());
            }
        }
    }

    /// 回傳 `false` 代表使用者放棄
    fn load_video(&mut self, bench: &mut Workbench) -> Result<bool> {
        loop {
            let mut input = Input::<String>::new()
                .with_prompt(t!("gif_maker.input_path"))
                .allow_empty(true);
            if let Some(recent) = self.config.settings.recent_paths.first() {
                input = input.default(recent.clone());
            }

            let raw: String = input.interact_text()?;
            let raw = raw.trim().trim_matches('"');
            if raw.is_empty() {
                return Ok(false);
            }

            let path = PathBuf::from(raw);
            if let Err(e) = validate_file_exists(&path) {
                eprintln!("{} {e}", style(t!("common.error_prefix")).red().bold());
                continue;
            }

            if !self.config.file_type_table.is_video_file(&path) {
                let proceed = Confirm::new()
                    .with_prompt(t!("gif_maker.unknown_extension"))
                    .default(false)
                    .interact()?;
                if !proceed {
                    continue;
                }
            }

            match bench.load_media(&path) {
                Ok(duration) => {
                    println!(
                        "{}",
                        style(t!("gif_maker.loaded", duration = format!("{duration:.3}"))).green()
                    );
                    add_recent_path(&mut self.config.settings, raw);
                    save_settings(&self.config.settings)?;
                    return Ok(true);
                }
                Err(e) => eprintln!("{} {e:#}", style(t!("common.error_prefix")).red().bold()),
            }
        }
    }

    fn edit_times(&self, bench: &mut Workbench) -> Result<()> {
        let start: String = Input::new()
            .with_prompt(t!("gif_maker.input_start"))
            .default(bench.fields().start_text().to_string())
            .interact_text()?;
        let end: String = Input::new()
            .with_prompt(t!("gif_maker.input_end"))
            .default(bench.fields().end_text().to_string())
            .interact_text()?;

        bench.commit_time_fields(&start, &end);
        Ok(())
    }

    fn generate(&self, bench: &mut Workbench) -> Result<()> {
        let Some(media) = bench.session().media() else {
            return Ok(());
        };

        let output_dir = self
            .config
            .settings
            .output_dir
            .as_ref()
            .map(PathBuf::from)
            .or_else(|| media.path.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let default_name = default_output_name(
            &media.path,
            bench.range().lower_sec(),
            bench.range().upper_sec(),
        );

        let name: String = Input::new()
            .with_prompt(t!("gif_maker.input_output"))
            .default(output_dir.join(default_name).display().to_string())
            .interact_text()?;

        let options = self.config.settings.encode;
        println!("{} {options}", style(t!("gif_maker.options")).dim());

        let pipeline = EncodingPipeline::new(bench.session().tools().clone()).with_progress(true);
        match bench.generate(&pipeline, options, Path::new(name.trim())) {
            Ok(outcome) => {
                info!("GIF 已輸出: {}", outcome.output_path.display());
                println!(
                    "{} {} ({:.1} KB, {:.2}s)",
                    style(t!("gif_maker.generate_done")).green().bold(),
                    outcome.output_path.display(),
                    outcome.output_bytes as f64 / 1024.0,
                    outcome.elapsed.as_secs_f64()
                );
            }
            Err(e @ PipelineError::SilentFailure { .. }) => {
                error!("{e}");
                eprintln!("{} {e}", style(t!("gif_maker.silent_failure")).red().bold());
            }
            Err(e) => {
                error!("{e}");
                let prefix = e.failed_pass().map_or_else(
                    || t!("common.error_prefix").to_string(),
                    |pass| t!("gif_maker.pass_failed", pass = pass).to_string(),
                );
                eprintln!("{} {e}", style(prefix).red().bold());
            }
        }

        Ok(())
    }

    fn print_status(&self, bench: &Workbench) {
        let range = bench.range();
        println!();
        println!(
            "{} {} → {}  [{}]",
            style(t!("gif_maker.selection")).cyan(),
            bench.fields().start_text(),
            bench.fields().end_text(),
            bench.badge()
        );
        println!(
            "{}",
            style(t!(
                "gif_maker.summary",
                total = format!("{:.3}", range.total_duration_sec()),
                frames = bench.strip_frames().len()
            ))
            .dim()
        );
        if let Some(media) = bench.session().media()
            && let (Some(width), Some(height)) = (media.info.width, media.info.height)
        {
            let fps = media
                .info
                .frame_rate
                .map_or_else(|| "?".to_string(), |fps| format!("{fps:.2}"));
            println!(
                "{}",
                style(t!(
                    "gif_maker.source_format",
                    size = format!("{width}x{height}"),
                    fps = fps
                ))
                .dim()
            );
        }
    }
}
