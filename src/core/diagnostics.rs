//! 系统诊断通道
//!
//! 对应 Android 上的 logcat（`android.util.Log`）。引导流程和日志后端自身的
//! 诊断信息都走这里，而不是走门面，这样即使没有安装文件日志也能看到，
//! 并且后端写日志时不会递归回到自己。

use log::{Level, LevelFilter, Log, Record};

/// 默认 logcat tag
pub const DEFAULT_TAG: &str = "UserDebugLog";

/// 低层系统日志通道
///
/// Android 上是 `android_logger::AndroidLogger`，其他平台用 `env_logger` 输出到 stderr。
pub struct SystemChannel {
    tag: String,
    inner: Box<dyn Log>,
}

impl SystemChannel {
    pub fn new(tag: &str) -> Self {
        Self::with_logger(tag, platform_logger(tag))
    }

    /// 使用指定的 logger 输出，例如测试里统计诊断条数
    pub fn with_logger(tag: &str, inner: Box<dyn Log>) -> Self {
        Self {
            tag: tag.to_string(),
            inner,
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn info(&self, message: &str) {
        self.write(Level::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.write(Level::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.write(Level::Error, message);
    }

    /// 以指定级别写入一行
    pub fn write(&self, level: Level, message: &str) {
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(&self.tag)
                .args(format_args!("{}", message))
                .build(),
        );
    }

    pub fn flush(&self) {
        self.inner.flush();
    }
}

impl Default for SystemChannel {
    fn default() -> Self {
        Self::new(DEFAULT_TAG)
    }
}

impl std::fmt::Debug for SystemChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemChannel").field("tag", &self.tag).finish()
    }
}

#[cfg(target_os = "android")]
fn platform_logger(tag: &str) -> Box<dyn Log> {
    Box::new(android_logger::AndroidLogger::new(
        android_logger::Config::default()
            .with_max_level(LevelFilter::Trace)
            .with_tag(tag),
    ))
}

#[cfg(not(target_os = "android"))]
fn platform_logger(_tag: &str) -> Box<dyn Log> {
    Box::new(
        env_logger::Builder::new()
            .filter_level(LevelFilter::Trace)
            .target(env_logger::Target::Stderr)
            .build(),
    )
}
