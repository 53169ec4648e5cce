//! 输出格式 - logback 风格的 pattern
//!
//! 支持的转换符：
//! - `%d` / `%date`，可带 chrono 格式 `%d{%H:%M:%S%.3f}`
//! - `%level` / `%le` / `%p`
//! - `%logger` / `%c`
//! - `%thread` / `%t`
//! - `%msg` / `%m` / `%message`
//! - `%ex` / `%err`：错误链，没有错误时为空
//! - `%n` 换行，`%%` 百分号
//!
//! 宽度写法同 logback：`%-5level` 左对齐，`%5level` 右对齐。

use super::error::ConfigError;
use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use log::Level;
use regex::Regex;
use std::error::Error;
use std::fmt::Write;

const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// 宽度上限，再大的填充对日志行没有意义
pub const MAX_WIDTH: usize = 256;

/// 默认格式
pub const DEFAULT_PATTERN: &str = "%d [%thread] %-5level %logger - %msg%ex%n";

/// 一次输出需要的全部信息
#[derive(Debug, Clone, Copy)]
pub struct LayoutEvent<'a> {
    pub level: Level,
    pub logger: &'a str,
    pub message: &'a str,
    pub error: Option<&'a (dyn Error + 'static)>,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Date(String),
    Level,
    Logger,
    Thread,
    Message,
    Error,
    Newline,
}

#[derive(Debug, Clone, PartialEq)]
struct Token {
    segment: Segment,
    width: Option<usize>,
    left_align: bool,
}

/// 预编译好的 pattern，configure 时解析一次
#[derive(Debug, Clone)]
pub struct PatternLayout {
    pattern: String,
    tokens: Vec<Token>,
}

impl PatternLayout {
    pub fn compile(pattern: &str) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            reason,
        };

        let regex = Regex::new(r"%(?:(%)|(-)?(\d+)?([a-zA-Z]+)(?:\{([^}]*)\})?)")
            .map_err(|e| invalid(e.to_string()))?;

        let mut tokens = Vec::new();
        let mut last = 0;
        for caps in regex.captures_iter(pattern) {
            let whole = caps.get(0).map(|m| (m.start(), m.end())).unwrap_or((last, last));
            if whole.0 > last {
                tokens.push(Token::plain(Segment::Literal(pattern[last..whole.0].to_string())));
            }
            last = whole.1;

            if caps.get(1).is_some() {
                tokens.push(Token::plain(Segment::Literal("%".to_string())));
                continue;
            }

            let word = caps.get(4).map(|m| m.as_str()).unwrap_or_default();
            let option = caps.get(5).map(|m| m.as_str());
            let segment = match word {
                "d" | "date" => {
                    let format = option.unwrap_or(DEFAULT_DATE_FORMAT);
                    validate_date_format(format).map_err(invalid)?;
                    Segment::Date(format.to_string())
                }
                _ if option.is_some() => {
                    return Err(invalid(format!("%{} 不支持 {{...}} 参数", word)));
                }
                "level" | "le" | "p" => Segment::Level,
                "logger" | "c" => Segment::Logger,
                "thread" | "t" => Segment::Thread,
                "msg" | "m" | "message" => Segment::Message,
                "ex" | "err" => Segment::Error,
                "n" => Segment::Newline,
                other => return Err(invalid(format!("未知的转换符 %{}", other))),
            };

            let width = match caps.get(3) {
                Some(m) => {
                    let width = m
                        .as_str()
                        .parse::<usize>()
                        .map_err(|e| invalid(format!("无效的宽度: {}", e)))?;
                    if width > MAX_WIDTH {
                        return Err(invalid(format!("宽度 {} 超过上限 {}", width, MAX_WIDTH)));
                    }
                    Some(width)
                }
                None => None,
            };

            tokens.push(Token {
                segment,
                width,
                left_align: caps.get(2).is_some(),
            });
        }
        if last < pattern.len() {
            tokens.push(Token::plain(Segment::Literal(pattern[last..].to_string())));
        }

        Ok(Self {
            pattern: pattern.to_string(),
            tokens,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn render(&self, event: &LayoutEvent<'_>) -> String {
        let mut out = String::with_capacity(self.pattern.len() + event.message.len() + 32);
        for token in &self.tokens {
            let text = match &token.segment {
                Segment::Literal(s) => s.clone(),
                Segment::Date(format) => {
                    let mut date = String::new();
                    if write!(date, "{}", Local::now().format(format)).is_err() {
                        continue;
                    }
                    date
                }
                Segment::Level => event.level.to_string(),
                Segment::Logger => event.logger.to_string(),
                Segment::Thread => current_thread_name(),
                Segment::Message => event.message.to_string(),
                Segment::Error => render_error_chain(event.error),
                Segment::Newline => "\n".to_string(),
            };
            match (token.width, token.left_align) {
                (Some(w), true) => {
                    let _ = write!(out, "{:<w$}", text, w = w);
                }
                (Some(w), false) => {
                    let _ = write!(out, "{:>w$}", text, w = w);
                }
                (None, _) => out.push_str(&text),
            }
        }
        out
    }
}

impl Token {
    fn plain(segment: Segment) -> Self {
        Self {
            segment,
            width: None,
            left_align: false,
        }
    }
}

/// 解析并试格式化一次；只能用于解析的转换符（如 `%#z`）格式化时会失败
fn validate_date_format(format: &str) -> Result<(), String> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(format!("无效的日期格式 {:?}", format));
    }
    let mut sample = String::new();
    write!(sample, "{}", Local::now().format(format))
        .map_err(|_| format!("日期格式 {:?} 无法用于输出", format))
}

fn current_thread_name() -> String {
    let thread = std::thread::current();
    match thread.name() {
        Some(name) => name.to_string(),
        None => format!("{:?}", thread.id()),
    }
}

fn render_error_chain(error: Option<&(dyn Error + 'static)>) -> String {
    let Some(error) = error else {
        return String::new();
    };
    let mut out = format!("\n{}", error);
    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(out, "\nCaused by: {}", cause);
        source = cause.source();
    }
    out
}
