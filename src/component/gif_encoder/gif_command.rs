use super::encode_job::EncodeJob;
use super::filter_chain::build_filters;
use crate::tools::ToolCommand;
use std::path::Path;

/// 兩個 pass 共用的前段參數：輸入與時間範圍
fn input_args(job: &EncodeJob) -> Vec<String> {
    vec![
        "-hide_banner".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{:.3}", job.start_sec()),
        "-t".to_string(),
        format!("{:.3}", job.duration_sec()),
        "-i".to_string(),
        job.source_path().to_string_lossy().to_string(),
    ]
}

/// Pass 1：以完整統計產生調色盤
#[must_use]
pub fn build_palette_command(ffmpeg: &Path, job: &EncodeJob) -> ToolCommand {
    let filters = build_filters(job.options());

    let mut args = input_args(job);
    args.extend([
        "-vf".to_string(),
        format!("{filters},palettegen=stats_mode=full"),
        "-y".to_string(),
        job.palette_path().to_string_lossy().to_string(),
    ]);

    ToolCommand::new(ffmpeg, args)
}

/// Pass 2：套用調色盤與 dither 產生無限循環的 GIF
#[must_use]
pub fn build_encode_command(ffmpeg: &Path, job: &EncodeJob) -> ToolCommand {
    let options = job.options();
    let filters = build_filters(options);

    let mut args = input_args(job);
    args.extend([
        "-i".to_string(),
        job.palette_path().to_string_lossy().to_string(),
        "-lavfi".to_string(),
        format!(
            "{filters}[x];[x][1:v]paletteuse=dither={}",
            options.dither_mode.ffmpeg_key()
        ),
        "-loop".to_string(),
        "0".to_string(),
        "-y".to_string(),
        job.output_path().to_string_lossy().to_string(),
    ]);

    ToolCommand::new(ffmpeg, args)
}

/// 依序回傳 pass 1 與 pass 2 的指令
#[must_use]
pub fn build_auto_commands(ffmpeg: &Path, job: &EncodeJob) -> [ToolCommand; 2] {
    [
        build_palette_command(ffmpeg, job),
        build_encode_command(ffmpeg, job),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::gif_encoder::encode_options::{
        DitherMode, EncodeOptions, FrameSelection, ScaleMode,
    };
    use crate::component::range_selector::DurationWindow;
    use std::fs;
    use tempfile::TempDir;

    fn job(temp_dir: &TempDir, options: EncodeOptions) -> EncodeJob {
        let source = temp_dir.path().join("in.mp4");
        fs::write(&source, b"video").unwrap();
        EncodeJob::new(
            &source,
            2.5,
            5.0,
            options,
            &temp_dir.path().join("out.gif"),
            temp_dir.path(),
            DurationWindow::default(),
        )
        .unwrap()
    }

    fn value_after<'a>(command: &'a ToolCommand, flag: &str) -> &'a str {
        let index = command.args.iter().position(|a| a == flag).unwrap();
        &command.args[index + 1]
    }

    #[test]
    fn test_both_passes_share_time_window() {
        let temp_dir = TempDir::new().unwrap();
        let job = job(&temp_dir, EncodeOptions::default());
        let [pass1, pass2] = build_auto_commands(Path::new("ffmpeg"), &job);

        for command in [&pass1, &pass2] {
            assert_eq!(value_after(command, "-ss"), "2.500");
            assert_eq!(value_after(command, "-t"), "2.500");
            assert_eq!(value_after(command, "-i"), job.source_path().to_string_lossy());
        }
    }

    #[test]
    fn test_passes_use_identical_filter_chain() {
        let temp_dir = TempDir::new().unwrap();
        for scale_mode in ScaleMode::ALL {
            for frame_selection in FrameSelection::ALL {
                let options = EncodeOptions {
                    scale_mode,
                    frame_selection,
                    ..EncodeOptions::default()
                };
                let job = job(&temp_dir, options);
                let [pass1, pass2] = build_auto_commands(Path::new("ffmpeg"), &job);

                let palette_filters = value_after(&pass1, "-vf")
                    .strip_suffix(",palettegen=stats_mode=full")
                    .unwrap();
                let encode_filters = value_after(&pass2, "-lavfi").split("[x];").next().unwrap();

                assert_eq!(palette_filters, encode_filters, "兩個 pass 的濾鏡必須一致");
            }
        }
    }

    #[test]
    fn test_pass2_reads_palette_and_loops_forever() {
        let temp_dir = TempDir::new().unwrap();
        let options = EncodeOptions {
            dither_mode: DitherMode::Bayer,
            ..EncodeOptions::default()
        };
        let job = job(&temp_dir, options);
        let [pass1, pass2] = build_auto_commands(Path::new("ffmpeg"), &job);

        let palette = job.palette_path().to_string_lossy().to_string();
        assert_eq!(pass1.output_arg(), Some(palette.as_str()));
        assert!(pass2.args.contains(&palette));
        assert!(value_after(&pass2, "-lavfi").ends_with("paletteuse=dither=bayer"));
        assert_eq!(value_after(&pass2, "-loop"), "0");
        let output = job.output_path().to_string_lossy().to_string();
        assert_eq!(pass2.output_arg(), Some(output.as_str()));
    }
}
