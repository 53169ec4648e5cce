//! 构建类型判断 - 只有 userdebug 构建才开启文件日志

use std::fmt;

/// 开启文件日志的构建类型
pub const DEBUG_BUILD_TYPE: &str = "userdebug";

/// 启动时注入构建类型的环境变量（运行时优先，其次是编译期）
pub const BUILD_TYPE_ENV: &str = "USERDEBUG_LOG_BUILD_TYPE";

const FALLBACK_BUILD_TYPE: &str = "user";

/// 构建类型，例如 `user` / `userdebug` / `eng`
///
/// 进程启动时读取一次，之后不再改变。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BuildClassification(String);

impl BuildClassification {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// 从环境中解析构建类型
    ///
    /// 顺序：运行时环境变量 → 编译期 `option_env!` → `"user"`。
    pub fn from_env() -> Self {
        match std::env::var(BUILD_TYPE_ENV) {
            Ok(value) => Self(value),
            Err(_) => Self::compiled(),
        }
    }

    /// 编译期注入的构建类型
    pub fn compiled() -> Self {
        Self(
            option_env!("USERDEBUG_LOG_BUILD_TYPE")
                .unwrap_or(FALLBACK_BUILD_TYPE)
                .to_string(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BuildClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BuildClassification {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BuildClassification {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// 是否开启文件日志：仅当构建类型严格等于 `userdebug`
pub fn should_enable_file_logging(classification: &BuildClassification) -> bool {
    classification.as_str() == DEBUG_BUILD_TYPE
}
