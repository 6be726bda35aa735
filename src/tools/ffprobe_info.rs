use crate::error::ProbeError;
use crate::tools::process_runner::{ProcessRunner, ToolCommand};
use log::debug;
use serde::Deserialize;
use std::path::Path;

/// ffprobe 探測結果；只有長度是必要的
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub duration_seconds: f64,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub frame_rate: Option<f64>,
}

impl VideoInfo {
    /// 只知道長度時（例如測試用的假來源）
    #[must_use]
    pub const fn from_duration(duration_seconds: f64) -> Self {
        Self {
            duration_seconds,
            width: None,
            height: None,
            frame_rate: None,
        }
    }
}

impl std::fmt::Display for VideoInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}s", self.duration_seconds)?;
        if let (Some(width), Some(height)) = (self.width, self.height) {
            write!(f, ", {width}x{height}")?;
        }
        if let Some(fps) = self.frame_rate {
            write!(f, " @ {fps:.2} fps")?;
        }
        Ok(())
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProbeReport {
    format: ProbeFormat,
    streams: Vec<ProbeStream>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProbeFormat {
    duration: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ProbeStream {
    width: Option<u32>,
    height: Option<u32>,
    avg_frame_rate: Option<String>,
    duration: Option<String>,
}

/// 只要求第一個視訊串流與容器長度
fn probe_args(path: &Path) -> Vec<String> {
    [
        "-v",
        "error",
        "-select_streams",
        "v:0",
        "-show_entries",
        "format=duration:stream=width,height,avg_frame_rate,duration",
        "-of",
        "json",
    ]
    .into_iter()
    .map(str::to_string)
    .chain(std::iter::once(path.to_string_lossy().into_owned()))
    .collect()
}

pub fn get_video_info(
    runner: &dyn ProcessRunner,
    ffprobe: &Path,
    path: &Path,
) -> Result<VideoInfo, ProbeError> {
    let command = ToolCommand::new(ffprobe, probe_args(path));

    let output = runner.run(&command).map_err(|source| ProbeError::Spawn {
        path: path.to_path_buf(),
        source,
    })?;

    if !output.success() {
        return Err(ProbeError::Failed {
            exit_code: output.exit_code,
            stderr: output.stderr.trim().to_string(),
        });
    }

    let info = parse_probe_output(&output.stdout)?;
    debug!(
        "探測 {}: {:.3}s, {:?}x{:?} @ {:?}",
        path.display(),
        info.duration_seconds,
        info.width,
        info.height,
        info.frame_rate
    );
    Ok(info)
}

fn parse_seconds(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|sec| sec.is_finite() && *sec >= 0.0)
}

fn parse_probe_output(stdout: &str) -> Result<VideoInfo, ProbeError> {
    let unparseable = || ProbeError::Unparseable(stdout.trim().to_string());
    let report: ProbeReport = serde_json::from_str(stdout).map_err(|_| unparseable())?;
    let stream = report.streams.first();

    // 容器長度優先；部分格式（例如裸 h264）只有串流長度
    let duration_seconds = report
        .format
        .duration
        .as_deref()
        .and_then(parse_seconds)
        .or_else(|| {
            stream
                .and_then(|s| s.duration.as_deref())
                .and_then(parse_seconds)
        })
        .ok_or_else(unparseable)?;

    Ok(VideoInfo {
        duration_seconds,
        width: stream.and_then(|s| s.width),
        height: stream.and_then(|s| s.height),
        frame_rate: stream
            .and_then(|s| s.avg_frame_rate.as_deref())
            .and_then(parse_rational),
    })
}

/// `"30000/1001"` 或 `"25"`；分母為 0 時（ffprobe 的 `"0/0"`）視為未知
fn parse_rational(text: &str) -> Option<f64> {
    let value = match text.split_once('/') {
        Some((num, den)) => {
            let den: f64 = den.trim().parse().ok()?;
            (den != 0.0).then_some(num.trim().parse::<f64>().ok()? / den)?
        }
        None => text.trim().parse().ok()?,
    };
    value.is_finite().then_some(value)
}
