//! 配置状态记录（对应 logback 的 StatusManager / StatusPrinter）

use crate::core::diagnostics::SystemChannel;
use log::Level;
use serde::Serialize;
use std::fmt;

/// 状态列表最多保留的条数
pub const MAX_STATUS_COUNT: usize = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum StatusLevel {
    Info,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Status {
    pub level: StatusLevel,
    pub message: String,
}

impl Status {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Info,
            message: message.into(),
        }
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Warn,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: StatusLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.level {
            StatusLevel::Info => "INFO",
            StatusLevel::Warn => "WARN",
            StatusLevel::Error => "ERROR",
        };
        write!(f, "[{}] {}", tag, self.message)
    }
}

/// 状态列表中有警告或错误时，把整份列表打印到系统通道
///
/// 返回是否打印了。
pub fn print_in_case_of_errors_or_warnings(statuses: &[Status], channel: &SystemChannel) -> bool {
    let worst = statuses.iter().map(|s| s.level).max();
    if !matches!(worst, Some(StatusLevel::Warn) | Some(StatusLevel::Error)) {
        return false;
    }

    let report = statuses
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join("\n");
    let level = match worst {
        Some(StatusLevel::Error) => Level::Error,
        _ => Level::Warn,
    };
    channel.write(level, &format!("日志配置状态:\n{}", report));
    true
}
