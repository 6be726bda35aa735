use super::encode_job::EncodeJob;
use super::gif_command::build_auto_commands;
use crate::error::PipelineError;
use crate::tools::{ProcessRunner, SystemProcessRunner, ToolPaths, is_non_empty_file};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// 成功產生的 GIF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutcome {
    pub output_path: PathBuf,
    pub output_bytes: u64,
    pub elapsed: Duration,
}

/// 兩階段 GIF 編碼：palettegen → paletteuse
///
/// 兩個 pass 嚴格依序執行；第一個失敗的 pass 會中止整個工作，
/// 已產生的調色盤保留在工作資料夾供檢查。
pub struct EncodingPipeline<R: ProcessRunner = SystemProcessRunner> {
    runner: R,
    tools: ToolPaths,
    show_progress: bool,
}

impl EncodingPipeline<SystemProcessRunner> {
    #[must_use]
    pub fn new(tools: ToolPaths) -> Self {
        Self::with_runner(SystemProcessRunner, tools)
    }
}

impl<R: ProcessRunner> EncodingPipeline<R> {
    #[must_use]
    pub const fn with_runner(runner: R, tools: ToolPaths) -> Self {
        Self {
            runner,
            tools,
            show_progress: false,
        }
    }

    /// 在終端機顯示每個 pass 的進度
    #[must_use]
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    #[must_use]
    pub const fn runner(&self) -> &R {
        &self.runner
    }

    #[must_use]
    pub const fn tools(&self) -> &ToolPaths {
        &self.tools
    }

    pub fn execute(&self, job: &EncodeJob) -> Result<EncodeOutcome, PipelineError> {
        // 兩個工具都要在任何程序啟動前確認存在
        self.tools.ensure_ready()?;
        let ffmpeg = self.tools.ffmpeg()?;

        ensure_parent_dir(job.palette_path())?;
        ensure_parent_dir(job.output_path())?;
        remove_stale_output(job.output_path())?;

        let started = Instant::now();
        let commands = build_auto_commands(ffmpeg, job);
        let progress = self.progress_bar(commands.len() as u64);

        let id = job.id();
        info!(
            "開始產生 GIF [{id}]: {} [{:.3}s - {:.3}s] -> {}",
            job.source_path().display(),
            job.start_sec(),
            job.end_sec(),
            job.output_path().display()
        );

        for (pass, command) in (1u8..).zip(commands.iter()) {
            progress.set_message(format!("Pass {pass}/2"));
            debug!("Pass {pass}: {command}");

            let output = self.runner.run(command).map_err(|source| {
                progress.abandon();
                error!("[{id}] 無法啟動 ffmpeg (pass {pass}): {source}");
                PipelineError::Spawn { pass, source }
            })?;

            if !output.success() {
                progress.abandon();
                let diagnostics = output.diagnostics();
                error!(
                    "[{id}] ffmpeg pass {pass} 失敗 (exit {:?}): {diagnostics}",
                    output.exit_code
                );
                return Err(PipelineError::PassFailed {
                    pass,
                    exit_code: output.exit_code,
                    diagnostics,
                });
            }

            progress.inc(1);
        }

        if !is_non_empty_file(job.output_path()) {
            progress.abandon();
            error!("[{id}] ffmpeg 回報成功但沒有輸出: {}", job.output_path().display());
            return Err(PipelineError::SilentFailure {
                output: job.output_path().to_path_buf(),
            });
        }

        progress.finish_and_clear();

        if let Err(e) = fs::remove_file(job.palette_path()) {
            warn!("無法刪除調色盤暫存檔 {}: {e}", job.palette_path().display());
        }

        let output_bytes = fs::metadata(job.output_path()).map_or(0, |m| m.len());
        let elapsed = started.elapsed();
        info!(
            "GIF 完成 [{id}]: {} ({} bytes, {:.2}s)",
            job.output_path().display(),
            output_bytes,
            elapsed.as_secs_f64()
        );

        Ok(EncodeOutcome {
            output_path: job.output_path().to_path_buf(),
            output_bytes,
            elapsed,
        })
    }

    fn progress_bar(&self, passes: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(passes);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:20.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("#>-"),
        );
        progress.enable_steady_tick(Duration::from_millis(120));
        progress
    }
}

fn ensure_parent_dir(path: &Path) -> Result<(), PipelineError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// 同名的舊 GIF 會讓「ffmpeg 成功卻沒寫檔」看起來像成功，先刪掉
fn remove_stale_output(path: &Path) -> Result<(), PipelineError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("刪除舊的輸出檔: {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::gif_encoder::encode_options::EncodeOptions;
    use crate::component::range_selector::DurationWindow;
    use crate::error::PreconditionError;
    use crate::tools::{ProcessOutput, ToolCommand};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// 依序回傳預設結果的假 runner；`write_output` 為真時模擬 ffmpeg 寫出檔案
    struct ScriptedRunner {
        exit_codes: Vec<i32>,
        write_output: bool,
        calls: RefCell<Vec<ToolCommand>>,
    }

    impl ScriptedRunner {
        fn new(exit_codes: Vec<i32>, write_output: bool) -> Self {
            Self {
                exit_codes,
                write_output,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ProcessRunner for ScriptedRunner {
        fn run(&self, command: &ToolCommand) -> io::Result<ProcessOutput> {
            let index = self.calls.borrow().len();
            self.calls.borrow_mut().push(command.clone());
            let exit_code = self.exit_codes[index];

            if exit_code == 0 && self.write_output
                && let Some(output) = command.output_arg()
            {
                fs::write(output, b"GIF89a")?;
            }

            Ok(ProcessOutput {
                exit_code: Some(exit_code),
                stdout: String::new(),
                stderr: if exit_code == 0 {
                    String::new()
                } else {
                    "Invalid argument".to_string()
                },
            })
        }
    }

    fn fake_tools(temp_dir: &TempDir) -> ToolPaths {
        let bin = temp_dir.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        for name in ["ffmpeg", "ffprobe"] {
            fs::write(bin.join(name), b"").unwrap();
        }
        ToolPaths {
            ffmpeg: Some(bin.join("ffmpeg")),
            ffprobe: Some(bin.join("ffprobe")),
        }
    }

    fn job(temp_dir: &TempDir) -> EncodeJob {
        let source = temp_dir.path().join("in.mp4");
        fs::write(&source, b"video").unwrap();
        EncodeJob::new(
            &source,
            1.0,
            4.0,
            EncodeOptions::default(),
            &temp_dir.path().join("gifs").join("out.gif"),
            &temp_dir.path().join("cache"),
            DurationWindow::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_success_runs_both_passes_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir);
        let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 0], true), fake_tools(&temp_dir));

        let outcome = pipeline.execute(&job).unwrap();

        let calls = pipeline.runner().calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].args.iter().any(|a| a.contains("palettegen")));
        assert!(calls[1].args.iter().any(|a| a.contains("paletteuse")));
        assert_eq!(outcome.output_path, job.output_path());
        assert_eq!(outcome.output_bytes, 6);
        assert!(!job.palette_path().exists(), "成功後刪除調色盤");
    }

    #[test]
    fn test_pass1_failure_skips_pass2() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir);
        let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![1, 0], true), fake_tools(&temp_dir));

        let err = pipeline.execute(&job).unwrap_err();

        assert_eq!(err.failed_pass(), Some(1));
        assert!(matches!(
            &err,
            PipelineError::PassFailed { exit_code: Some(1), diagnostics, .. } if diagnostics.contains("Invalid argument")
        ));
        assert_eq!(pipeline.runner().calls.borrow().len(), 1, "pass 2 不應被執行");
    }

    #[test]
    fn test_pass2_failure_keeps_palette() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir);
        let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 2], true), fake_tools(&temp_dir));

        let err = pipeline.execute(&job).unwrap_err();

        assert_eq!(err.failed_pass(), Some(2));
        assert!(job.palette_path().exists(), "失敗時保留調色盤");
    }

    #[test]
    fn test_missing_output_is_silent_failure() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir);
        let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 0], false), fake_tools(&temp_dir));

        let err = pipeline.execute(&job).unwrap_err();

        assert!(matches!(err, PipelineError::SilentFailure { ref output } if output == job.output_path()));
        assert_eq!(pipeline.runner().calls.borrow().len(), 2);
    }

    #[test]
    fn test_stale_output_does_not_count_as_success() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir);
        fs::create_dir_all(job.output_path().parent().unwrap()).unwrap();
        fs::write(job.output_path(), b"GIF89a from an earlier run").unwrap();
        let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 0], false), fake_tools(&temp_dir));

        let err = pipeline.execute(&job).unwrap_err();

        assert!(matches!(err, PipelineError::SilentFailure { .. }), "舊檔不能當成這次的輸出");
        assert!(!job.output_path().exists());
    }

    #[test]
    fn test_output_path_that_is_a_directory_is_io_error() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir);
        fs::create_dir_all(job.output_path()).unwrap();
        let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 0], true), fake_tools(&temp_dir));

        let err = pipeline.execute(&job).unwrap_err();

        assert!(matches!(err, PipelineError::Io(_)));
        assert!(pipeline.runner().calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_tool_spawns_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir);
        let mut tools = fake_tools(&temp_dir);
        tools.ffprobe = None;
        let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 0], true), tools);

        let err = pipeline.execute(&job).unwrap_err();

        assert!(matches!(
            err,
            PipelineError::Precondition(PreconditionError::ToolMissing { tool: "ffprobe" })
        ));
        assert!(pipeline.runner().calls.borrow().is_empty());
    }
}
