use std::path::PathBuf;
use thiserror::Error;

/// 日志配置加载失败
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件失败: {0}")]
    Io(#[from] std::io::Error),
    #[error("配置文件不是合法的 UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    #[error("配置文件解析失败: {0}")]
    Parse(#[from] json5::Error),
    #[error("无效的日志级别 {value:?} ({field})")]
    InvalidLevel { field: String, value: String },
    #[error("无效的输出格式 {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },
    #[error("未知的 appender 类型: {0}")]
    UnknownAppender(String),
    #[error("appender[{index}] 缺少字段 {field}")]
    MissingField { index: usize, field: &'static str },
    #[error("打开日志文件 {path:?} 失败: {source}")]
    OpenAppender {
        path: PathBuf,
        source: std::io::Error,
    },
}
