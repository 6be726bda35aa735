//! 整合測試 - 透過公開 API 驗證區間選取、欄位同步與兩階段編碼流程
//!
//! 外部程序以假的 runner 取代，不需要安裝 ffmpeg

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, Instant};

use gif_clipper::component::gif_encoder::{EncodeJob, EncodeOptions, EncodingPipeline};
use gif_clipper::component::gif_maker::{SelectionObserver, Workbench};
use gif_clipper::component::preview::PreviewImages;
use gif_clipper::component::range_selector::{
    BoundedRange, DurationWindow, FieldCommit, MIN_SEC, RangeDragController, TimeFieldSync,
    TrackGeometry,
};
use gif_clipper::error::{ExtractError, PipelineError, PreconditionError, ProbeError};
use gif_clipper::session::Session;
use gif_clipper::tools::{FrameSource, ProcessOutput, ProcessRunner, ToolCommand, ToolPaths};
use tempfile::TempDir;

const TOLERANCE: f64 = 1e-6;

/// 依序回傳預先設定的結束碼；`write_output` 為真時模擬 ffmpeg 寫出檔案
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

    fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl ProcessRunner for ScriptedRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<ProcessOutput> {
        let index = self.calls.borrow().len();
        self.calls.borrow_mut().push(command.clone());

        let exit_code = self.exit_codes.get(index).copied().unwrap_or(0);
        if exit_code == 0
            && self.write_output
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
                "Invalid data found when processing input".to_string()
            },
        })
    }
}

/// 在暫存資料夾放兩個空檔案充當 ffmpeg / ffprobe
fn fake_tools(temp_dir: &TempDir) -> ToolPaths {
    let ffmpeg = temp_dir.path().join("ffmpeg");
    let ffprobe = temp_dir.path().join("ffprobe");
    fs::write(&ffmpeg, b"").unwrap();
    fs::write(&ffprobe, b"").unwrap();
    ToolPaths {
        ffmpeg: Some(ffmpeg),
        ffprobe: Some(ffprobe),
    }
}

fn fake_media(temp_dir: &TempDir) -> PathBuf {
    let media = temp_dir.path().join("movie.mp4");
    fs::write(&media, b"not really a video").unwrap();
    media
}

fn job(temp_dir: &TempDir, media: &Path) -> EncodeJob {
    EncodeJob::new(
        media,
        1.0,
        4.0,
        EncodeOptions::default(),
        &temp_dir.path().join("out").join("clip.gif"),
        &temp_dir.path().join("cache"),
        DurationWindow::default(),
    )
    .unwrap()
}

/// 測試 A: 10 秒影片，下限把手拖到 9 秒處 → 平移後貼齊終點 [4, 10]
#[test]
fn test_drag_lower_handle_pans_against_end() {
    let total = 10.0;
    let mut range = BoundedRange::for_duration(total, DurationWindow::default());
    assert!(range.lower_sec().abs() < TOLERANCE);
    assert!((range.upper_sec() - 6.0).abs() < TOLERANCE);

    let geometry = TrackGeometry::for_widget_width(1020.0);
    let mut drag = RangeDragController::new(geometry);

    drag.press(&mut range, geometry.x_of(0.0));
    drag.drag_to(&mut range, geometry.x_of(9.0 / total));
    drag.release();

    assert!((range.lower_sec() - 4.0).abs() < TOLERANCE);
    assert!((range.upper_sec() - 10.0).abs() < TOLERANCE);
    assert!(range.is_legal());
}

/// 測試 B: 終點早於起點 → [1, 1 + MIN_SEC]
#[test]
fn test_time_fields_end_before_start() {
    let mut range = BoundedRange::for_duration(10.0, DurationWindow::default());
    let mut fields = TimeFieldSync::new();
    fields.on_range_changed(&range);

    let result = fields.on_field_committed(&mut range, "00:01.000", "00:00.500");

    assert_eq!(result, FieldCommit::Applied);
    assert!((range.lower_sec() - 1.0).abs() < TOLERANCE);
    assert!((range.upper_sec() - (1.0 + MIN_SEC)).abs() < TOLERANCE);
    assert_eq!(fields.start_text(), "00:01.000");
    assert_eq!(fields.end_text(), "00:02.000");
}

/// 測試 C: pass 1 失敗 → 回報 pass 1，pass 2 不會被執行
#[test]
fn test_pass_one_failure_stops_pipeline() {
    let temp_dir = TempDir::new().unwrap();
    let media = fake_media(&temp_dir);
    let job = job(&temp_dir, &media);

    let pipeline = EncodingPipeline::with_runner(
        ScriptedRunner::new(vec![1], true),
        fake_tools(&temp_dir),
    );
    let err = pipeline.execute(&job).unwrap_err();

    assert_eq!(err.failed_pass(), Some(1));
    match err {
        PipelineError::PassFailed {
            exit_code,
            diagnostics,
            ..
        } => {
            assert_eq!(exit_code, Some(1));
            assert!(diagnostics.contains("Invalid data"));
        }
        other => panic!("預期 PassFailed，實際為 {other:?}"),
    }
    assert_eq!(pipeline.runner().call_count(), 1);
    assert!(!job.output_path().exists());
}

/// 測試 D: 兩個 pass 都成功但沒有輸出 → SilentFailure
#[test]
fn test_missing_output_is_silent_failure() {
    let temp_dir = TempDir::new().unwrap();
    let media = fake_media(&temp_dir);
    let job = job(&temp_dir, &media);

    let pipeline = EncodingPipeline::with_runner(
        ScriptedRunner::new(vec![0, 0], false),
        fake_tools(&temp_dir),
    );
    let err = pipeline.execute(&job).unwrap_err();

    assert!(matches!(err, PipelineError::SilentFailure { ref output } if output == job.output_path()));
    assert_eq!(pipeline.runner().call_count(), 2);
}

/// 兩個 pass 都成功且有輸出 → 回傳輸出大小
#[test]
fn test_successful_pipeline_reports_output() {
    let temp_dir = TempDir::new().unwrap();
    let media = fake_media(&temp_dir);
    let job = job(&temp_dir, &media);

    let pipeline = EncodingPipeline::with_runner(
        ScriptedRunner::new(vec![0, 0], true),
        fake_tools(&temp_dir),
    );
    let outcome = pipeline.execute(&job).unwrap();

    assert_eq!(outcome.output_path, job.output_path());
    assert!(outcome.output_bytes > 0);
    assert!(job.output_path().parent().unwrap().is_dir());
}

/// 缺少工具時在啟動任何程序前就失敗
#[test]
fn test_missing_tool_spawns_nothing() {
    let temp_dir = TempDir::new().unwrap();
    let media = fake_media(&temp_dir);
    let job = job(&temp_dir, &media);

    let mut tools = fake_tools(&temp_dir);
    tools.ffprobe = None;
    let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 0], true), tools);

    let err = pipeline.execute(&job).unwrap_err();
    assert!(matches!(
        err,
        PipelineError::Precondition(PreconditionError::ToolMissing { tool: "ffprobe" })
    ));
    assert_eq!(pipeline.runner().call_count(), 0);
}

/// 建立工作時重新驗證長度
#[test]
fn test_job_rejects_out_of_window_duration() {
    let temp_dir = TempDir::new().unwrap();
    let media = fake_media(&temp_dir);

    let err = EncodeJob::new(
        &media,
        0.0,
        20.0,
        EncodeOptions::default(),
        &temp_dir.path().join("out.gif"),
        temp_dir.path(),
        DurationWindow::default(),
    )
    .unwrap_err();
    assert!(matches!(err, PipelineError::Validation(_)));
}

/// 測試 E: 0.5 秒影片 → 長度退化為整部影片，不會超過終點
#[test]
fn test_short_media_relaxes_to_full_duration() {
    let mut range = BoundedRange::for_duration(0.5, DurationWindow::default());
    assert!(range.lower_sec().abs() < TOLERANCE);
    assert!((range.upper_sec() - 0.5).abs() < TOLERANCE);
    assert!(range.is_legal());

    let mut fields = TimeFieldSync::new();
    let result = fields.on_field_committed(&mut range, "0.2", "0.3");
    assert_eq!(result, FieldCommit::Applied);
    assert!(range.lower_sec().abs() < TOLERANCE);
    assert!((range.upper_sec() - 0.5).abs() < TOLERANCE);
}

struct StubSource;

impl FrameSource for StubSource {
    fn probe_duration(&self, _media: &Path) -> Result<f64, ProbeError> {
        Ok(10.0)
    }

    fn extract_frame(&self, _media: &Path, timestamp_sec: f64) -> Result<PathBuf, ExtractError> {
        Ok(PathBuf::from(format!("frame_{timestamp_sec:.3}.png")))
    }

    fn extract_strip(
        &self,
        _media: &Path,
        _fps_sample: f64,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, ExtractError> {
        Ok((1..=8)
            .map(|i| output_dir.join(format!("thumb_{i:05}.png")))
            .collect())
    }
}

#[derive(Default)]
struct Seen {
    ranges: Vec<(f64, f64)>,
    previews: Vec<PreviewImages>,
    strip_len: usize,
}

struct Collector(Rc<RefCell<Seen>>);

impl SelectionObserver for Collector {
    fn on_range_changed(&mut self, range: &BoundedRange, _fields: &TimeFieldSync) {
        self.0
            .borrow_mut()
            .ranges
            .push((range.lower_sec(), range.upper_sec()));
    }

    fn on_preview_ready(&mut self, images: &PreviewImages) {
        self.0.borrow_mut().previews.push(images.clone());
    }

    fn on_strip_ready(&mut self, frames: &[PathBuf]) {
        self.0.borrow_mut().strip_len = frames.len();
    }
}

/// 工作台：載入 → 輸入時間 → 防抖後只預覽一次 → 產生 GIF
#[test]
fn test_workbench_end_to_end_with_fakes() {
    let temp_dir = TempDir::new().unwrap();
    let media = fake_media(&temp_dir);
    let tools = fake_tools(&temp_dir);

    let session = Session::with_tools(temp_dir.path(), &temp_dir.path().join("cache"), tools.clone());
    let mut bench = Workbench::new(session, Box::new(StubSource), 1020);
    let seen = Rc::new(RefCell::new(Seen::default()));
    bench.add_observer(Box::new(Collector(Rc::clone(&seen))));

    let duration = bench.load_media(&media).unwrap();
    assert!((duration - 10.0).abs() < TOLERANCE);
    assert_eq!(seen.borrow().strip_len, 8);

    assert_eq!(bench.commit_time_fields("2", "5.5"), FieldCommit::Applied);
    assert_eq!(bench.commit_time_fields("2", "6"), FieldCommit::Applied);
    assert_eq!(seen.borrow().ranges.last().copied(), Some((2.0, 6.0)));

    let now = Instant::now();
    bench.tick_at(now + Duration::from_secs(1));
    bench.tick_at(now + Duration::from_secs(2));
    assert_eq!(seen.borrow().previews.len(), 1);
    assert_eq!(
        bench.preview_images().end,
        Some(PathBuf::from("frame_6.000.png"))
    );

    let pipeline = EncodingPipeline::with_runner(ScriptedRunner::new(vec![0, 0], true), tools);
    let output = temp_dir.path().join("result");
    let outcome = bench
        .generate(&pipeline, EncodeOptions::default(), &output)
        .unwrap();
    assert_eq!(outcome.output_path, temp_dir.path().join("result.gif"));
}

/// 探測失敗時不改變狀態並回傳錯誤
#[test]
fn test_workbench_missing_source_file() {
    let temp_dir = TempDir::new().unwrap();
    let session = Session::with_tools(temp_dir.path(), temp_dir.path(), ToolPaths::default());
    let mut bench = Workbench::new(session, Box::new(StubSource), 1020);

    let err = bench
        .load_media(&temp_dir.path().join("missing.mp4"))
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<PreconditionError>(),
        Some(PreconditionError::SourceMissing(_))
    ));
    assert!(!bench.range().is_loaded());
    assert!(bench.session().media().is_none());
}
