//! logback 风格的日志上下文

use super::appender::Appender;
use super::config::parse_document;
use super::error::ConfigError;
use super::layout::LayoutEvent;
use super::status::{Status, MAX_STATUS_COUNT};
use super::LoggingBackend;
use log::{Level, LevelFilter};
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, RwLock};

struct ActiveConfig {
    level: LevelFilter,
    appenders: Vec<Appender>,
}

/// 进程内共享的日志上下文
///
/// 未配置（或 reset 后）时所有输出都被丢弃。配置整体替换，不做合并。
pub struct LoggerContext {
    logger_name: String,
    base_dir: PathBuf,
    active: RwLock<Option<ActiveConfig>>,
    statuses: Mutex<Vec<Status>>,
}

impl LoggerContext {
    /// `base_dir` 用于解析配置中的相对路径，一般是应用的 files 目录
    pub fn new(logger_name: &str, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            logger_name: logger_name.to_string(),
            base_dir: base_dir.into(),
            active: RwLock::new(None),
            statuses: Mutex::new(Vec::new()),
        }
    }

    pub fn logger_name(&self) -> &str {
        &self.logger_name
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    pub fn is_configured(&self) -> bool {
        self.active.read().map(|a| a.is_some()).unwrap_or(false)
    }

    /// 当前根级别，未配置时为 `None`
    pub fn level(&self) -> Option<LevelFilter> {
        self.active
            .read()
            .ok()
            .and_then(|a| a.as_ref().map(|c| c.level))
    }

    pub fn appender_descriptions(&self) -> Vec<String> {
        match self.active.read() {
            Ok(active) => active
                .as_ref()
                .map(|c| c.appenders.iter().map(Appender::describe).collect())
                .unwrap_or_default(),
            Err(_) => Vec::new(),
        }
    }

    fn add_status(&self, status: Status) {
        if let Ok(mut statuses) = self.statuses.lock() {
            if statuses.len() < MAX_STATUS_COUNT {
                statuses.push(status);
            }
        }
    }

    fn emit(&self, level: Level, message: &str, error: Option<&(dyn Error + 'static)>) {
        let Ok(active) = self.active.read() else {
            return;
        };
        let Some(config) = active.as_ref() else {
            return;
        };
        if level > config.level {
            return;
        }

        let event = LayoutEvent {
            level,
            logger: &self.logger_name,
            message,
            error,
        };
        for appender in &config.appenders {
            if let Err(e) = appender.append(&event) {
                self.add_status(Status::error(e));
            }
        }
    }

    fn apply(&self, document: &[u8]) -> Result<(), ConfigError> {
        let resolved = parse_document(document, &self.base_dir)?;
        let appenders = resolved
            .appenders
            .into_iter()
            .map(Appender::open)
            .collect::<Result<Vec<_>, _>>()?;

        if appenders.is_empty() {
            self.add_status(Status::warn("配置中没有 appender，日志将被丢弃"));
        }
        let descriptions: Vec<String> = appenders.iter().map(Appender::describe).collect();
        self.add_status(Status::info(format!(
            "已加载配置: level={}, appenders=[{}]",
            resolved.level,
            descriptions.join(", ")
        )));

        if let Ok(mut active) = self.active.write() {
            *active = Some(ActiveConfig {
                level: resolved.level,
                appenders,
            });
        }
        Ok(())
    }
}

impl LoggingBackend for LoggerContext {
    fn reset_context(&self) {
        if let Ok(mut active) = self.active.write() {
            *active = None;
        }
        if let Ok(mut statuses) = self.statuses.lock() {
            statuses.clear();
        }
    }

    fn configure(&self, document: &[u8]) -> Result<(), ConfigError> {
        self.apply(document).map_err(|e| {
            self.add_status(Status::error(format!("配置失败: {}", e)));
            e
        })
    }

    fn info(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.emit(Level::Info, message, error);
    }

    fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.emit(Level::Warn, message, error);
    }

    fn debug(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.emit(Level::Debug, message, error);
    }

    fn trace(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.emit(Level::Trace, message, error);
    }

    fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.emit(Level::Error, message, error);
    }

    fn status_list(&self) -> Vec<Status> {
        self.statuses.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

impl std::fmt::Debug for LoggerContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerContext")
            .field("logger_name", &self.logger_name)
            .field("base_dir", &self.base_dir)
            .field("configured", &self.is_configured())
            .finish()
    }
}
