//! 日志输出目标

use super::config::{AppenderSpec, AppenderTarget};
use super::error::ConfigError;
use super::layout::{LayoutEvent, PatternLayout};
use crate::core::diagnostics::SystemChannel;
use log::LevelFilter;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

enum Output {
    /// 每条日志写完立即落盘，进程被杀也不会丢
    File { path: PathBuf, file: Mutex<File> },
    Logcat(SystemChannel),
}

/// 已打开的 appender
pub struct Appender {
    output: Output,
    layout: PatternLayout,
    threshold: LevelFilter,
}

impl Appender {
    pub fn open(spec: AppenderSpec) -> Result<Self, ConfigError> {
        let output = match spec.target {
            AppenderTarget::File { path, append } => {
                let file = open_log_file(&path, append)?;
                Output::File {
                    path,
                    file: Mutex::new(file),
                }
            }
            AppenderTarget::Logcat { tag } => Output::Logcat(SystemChannel::new(&tag)),
        };
        Ok(Self {
            output,
            layout: spec.layout,
            threshold: spec.threshold,
        })
    }

    pub fn describe(&self) -> String {
        match &self.output {
            Output::File { path, .. } => format!("file({})", path.display()),
            Output::Logcat(channel) => format!("logcat({})", channel.tag()),
        }
    }

    /// 输出一条日志；写文件失败时返回错误信息，由上层记录到状态列表
    pub fn append(&self, event: &LayoutEvent<'_>) -> Result<(), String> {
        if event.level > self.threshold {
            return Ok(());
        }
        let line = self.layout.render(event);
        match &self.output {
            Output::File { path, file } => {
                let mut file = file
                    .lock()
                    .map_err(|e| format!("{} 锁已中毒: {}", path.display(), e))?;
                file.write_all(line.as_bytes())
                    .map_err(|e| format!("写入 {} 失败: {}", path.display(), e))
            }
            Output::Logcat(channel) => {
                channel.write(event.level, &line);
                Ok(())
            }
        }
    }

    pub fn flush(&self) {
        match &self.output {
            Output::File { file, .. } => {
                if let Ok(mut file) = file.lock() {
                    let _ = file.flush();
                }
            }
            Output::Logcat(channel) => channel.flush(),
        }
    }
}

impl Drop for Appender {
    fn drop(&mut self) {
        self.flush();
    }
}

fn open_log_file(path: &Path, append: bool) -> Result<File, ConfigError> {
    let open_error = |source| ConfigError::OpenAppender {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(open_error)?;
    }

    let mut options = OpenOptions::new();
    options.create(true);
    if append {
        options.append(true);
    } else {
        options.write(true).truncate(true);
    }
    options.open(path).map_err(open_error)
}
