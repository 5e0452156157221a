use crate::error::ToolError;
use log::{debug, error, info, warn};
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// 檢查子程序狀態的間隔
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 外部工具執行結果
#[derive(Debug)]
pub struct ToolOutput {
    pub tool: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// 結束碼非零時轉為 `ToolError::NonZeroExit`
    pub fn require_success(self) -> Result<Self, ToolError> {
        if self.status.success() {
            Ok(self)
        } else {
            Err(ToolError::NonZeroExit {
                tool: self.tool,
                code: self.status.code(),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// 執行外部工具並等待結束
///
/// 等待期間持續檢查中斷信號與逾時；任一條件成立即終止子程序。
/// stdout/stderr 由背景執行緒讀取，避免管線緩衝區塞滿造成死結。
pub fn run_tool(
    mut command: Command,
    timeout: Option<Duration>,
    shutdown_signal: &Arc<AtomicBool>,
) -> Result<ToolOutput, ToolError> {
    let tool = command.get_program().to_string_lossy().to_string();
    debug!("執行: {}", describe_command(&command));

    if shutdown_signal.load(Ordering::SeqCst) {
        return Err(ToolError::Cancelled { tool });
    }

    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| ToolError::Spawn {
        tool: tool.clone(),
        source,
    })?;

    let stdout_reader = spawn_pipe_reader(child.stdout.take());
    let stderr_reader = spawn_pipe_reader(child.stderr.take());

    let started = Instant::now();
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) => {}
            Err(e) => {
                warn!("無法檢查程序狀態 [{}]: {e}", child.id());
                terminate(&mut child);
                return Err(ToolError::Spawn { tool, source: e });
            }
        }

        if shutdown_signal.load(Ordering::SeqCst) {
            warn!("收到中斷信號，終止 {tool} [{}]", child.id());
            terminate(&mut child);
            return Err(ToolError::Cancelled { tool });
        }

        if let Some(limit) = timeout
            && started.elapsed() >= limit
        {
            warn!("{tool} [{}] 超過時限 {}s，終止程序", child.id(), limit.as_secs());
            terminate(&mut child);
            return Err(ToolError::TimedOut { tool, after: limit });
        }

        thread::sleep(POLL_INTERVAL);
    };

    let stdout = join_pipe_reader(stdout_reader);
    let stderr = join_pipe_reader(stderr_reader);

    let elapsed = started.elapsed().as_secs_f64();
    if status.success() {
        info!("{tool} 完成，耗時 {elapsed:.1}s");
    } else {
        error!("{tool} 失敗 ({:?})，耗時 {elapsed:.1}s", status.code());
    }

    Ok(ToolOutput {
        tool,
        status,
        stdout,
        stderr,
    })
}

fn spawn_pipe_reader<R>(pipe: Option<R>) -> Option<JoinHandle<String>>
where
    R: Read + Send + 'static,
{
    let mut pipe = pipe?;
    Some(thread::spawn(move || {
        let mut buffer = Vec::new();
        let _ = pipe.read_to_end(&mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }))
}

fn join_pipe_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

fn terminate(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

/// 將命令轉成可記錄的字串
#[must_use]
pub fn describe_command(command: &Command) -> String {
    let mut parts = vec![command.get_program().to_string_lossy().to_string()];
    parts.extend(
        command
            .get_args()
            .map(|arg| arg.to_string_lossy().to_string()),
    );
    parts.join(" ")
}
