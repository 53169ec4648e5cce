//! 测试用的日志后端：记录所有调用，不做任何输出
//!
//! 只在单元测试或开启 `test-support` feature 时编译。

use crate::core::backend::{ConfigError, LoggingBackend, Status};
use std::error::Error;
use std::sync::Mutex;

/// 一次级别输出调用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendCall {
    /// `info` / `warn` / `debug` / `trace` / `error`
    pub method: &'static str,
    pub message: String,
    pub error: Option<String>,
}

impl BackendCall {
    pub fn new(method: &'static str, message: &str, error: Option<&str>) -> Self {
        Self {
            method,
            message: message.to_string(),
            error: error.map(str::to_string),
        }
    }
}

#[derive(Default)]
struct Recorded {
    resets: usize,
    documents: Vec<Vec<u8>>,
    calls: Vec<BackendCall>,
    statuses: Vec<Status>,
}

/// 记录型后端
///
/// 默认接受任何文档；[`RecordingBackend::strict`] 会把文档当作 JSON5 解析，解析失败时返回错误。
#[derive(Default)]
pub struct RecordingBackend {
    strict: bool,
    recorded: Mutex<Recorded>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    pub fn resets(&self) -> usize {
        self.recorded.lock().map(|r| r.resets).unwrap_or_default()
    }

    pub fn documents(&self) -> Vec<Vec<u8>> {
        self.recorded
            .lock()
            .map(|r| r.documents.clone())
            .unwrap_or_default()
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.recorded
            .lock()
            .map(|r| r.calls.clone())
            .unwrap_or_default()
    }

    fn record(&self, method: &'static str, message: &str, error: Option<&(dyn Error + 'static)>) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.calls.push(BackendCall {
                method,
                message: message.to_string(),
                error: error.map(|e| e.to_string()),
            });
        }
    }
}

impl LoggingBackend for RecordingBackend {
    fn reset_context(&self) {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.resets += 1;
            recorded.statuses.clear();
        }
    }

    fn configure(&self, document: &[u8]) -> Result<(), ConfigError> {
        let parsed = if self.strict {
            std::str::from_utf8(document)
                .map_err(ConfigError::from)
                .and_then(|text| {
                    json5::from_str::<serde_json::Value>(text)
                        .map(|_| ())
                        .map_err(ConfigError::from)
                })
        } else {
            Ok(())
        };

        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.documents.push(document.to_vec());
            match &parsed {
                Ok(()) => recorded.statuses.push(Status::info("configured")),
                Err(e) => recorded.statuses.push(Status::error(e.to_string())),
            }
        }
        parsed
    }

    fn info(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.record("info", message, error);
    }

    fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.record("warn", message, error);
    }

    fn debug(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.record("debug", message, error);
    }

    fn trace(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.record("trace", message, error);
    }

    fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>) {
        self.record("error", message, error);
    }

    fn status_list(&self) -> Vec<Status> {
        self.recorded
            .lock()
            .map(|r| r.statuses.clone())
            .unwrap_or_default()
    }
}
