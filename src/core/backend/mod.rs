//! 日志后端
//!
//! 引导流程只通过 [`LoggingBackend`] 这个窄接口使用后端：重置、加载配置文档、
//! 按级别输出。[`LoggerContext`] 是 logback 风格的具体实现。

pub mod appender;
pub mod config;
pub mod context;
pub mod error;
pub mod layout;
pub mod status;

use std::error::Error;

pub use config::{AppenderTarget, ResolvedConfig};
pub use context::LoggerContext;
pub use error::ConfigError;
pub use layout::PatternLayout;
pub use status::{print_in_case_of_errors_or_warnings, Status, StatusLevel};

/// 日志后端接口
///
/// 实现方自己负责并发安全，调用方不会额外加锁。
pub trait LoggingBackend: Send + Sync {
    /// 清空当前配置（包括之前的默认配置）
    fn reset_context(&self);

    /// 整体加载一份配置文档
    fn configure(&self, document: &[u8]) -> Result<(), ConfigError>;

    fn info(&self, message: &str, error: Option<&(dyn Error + 'static)>);
    fn warn(&self, message: &str, error: Option<&(dyn Error + 'static)>);
    fn debug(&self, message: &str, error: Option<&(dyn Error + 'static)>);
    fn trace(&self, message: &str, error: Option<&(dyn Error + 'static)>);
    fn error(&self, message: &str, error: Option<&(dyn Error + 'static)>);

    /// 自上次 reset 以来的配置状态
    fn status_list(&self) -> Vec<Status> {
        Vec::new()
    }
}
