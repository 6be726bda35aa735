use log::debug;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 外部程序的執行結果（stdout / stderr 已完整讀取）
#[derive(Debug, Clone, Default)]
pub struct ProcessOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    #[must_use]
    pub const fn success(&self) -> bool {
        matches!(self.exit_code, Some(0))
    }

    /// 合併 stdout 與 stderr，作為失敗時的診斷訊息
    #[must_use]
    pub fn diagnostics(&self) -> String {
        [self.stdout.trim(), self.stderr.trim()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// 一次外部程序呼叫：執行檔 + 參數列
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: &Path, args: Vec<String>) -> Self {
        Self {
            program: program.to_path_buf(),
            args,
        }
    }

    /// 最後一個參數（ffmpeg 指令慣例上為輸出路徑）
    #[must_use]
    pub fn output_arg(&self) -> Option<&str> {
        self.args.last().map(String::as_str)
    }

    #[must_use]
    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);

        // Windows 上不要跳出主控台視窗
        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }

        cmd
    }
}

impl std::fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.program.display(), self.args.join(" "))
    }
}

/// 同步執行外部程序的介面
///
/// 呼叫會阻塞直到程序結束；沒有逾時也沒有中途取消
pub trait ProcessRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<ProcessOutput>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, command: &ToolCommand) -> io::Result<ProcessOutput> {
        debug!("執行: {command}");

        let output = command.to_command().output()?;

        Ok(ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
