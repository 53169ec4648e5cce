//! 配置文档解析与校验
//!
//! 文档格式为 JSON5（允许注释，方便通过 adb 手工编辑），整体校验通过后才会生效。

use super::error::ConfigError;
use super::layout::{PatternLayout, DEFAULT_PATTERN};
use crate::core::diagnostics::DEFAULT_TAG;
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const DEFAULT_ROOT_LEVEL: LevelFilter = LevelFilter::Debug;

#[derive(Debug, Deserialize)]
struct ConfigDocument {
    level: Option<String>,
    #[serde(default)]
    appenders: Vec<AppenderDocument>,
}

#[derive(Debug, Deserialize)]
struct AppenderDocument {
    kind: String,
    path: Option<String>,
    #[serde(default = "default_append")]
    append: bool,
    pattern: Option<String>,
    threshold: Option<String>,
    tag: Option<String>,
}

fn default_append() -> bool {
    true
}

/// appender 输出目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppenderTarget {
    File { path: PathBuf, append: bool },
    Logcat { tag: String },
}

/// 校验后的 appender 描述
#[derive(Debug, Clone)]
pub struct AppenderSpec {
    pub target: AppenderTarget,
    pub layout: PatternLayout,
    pub threshold: LevelFilter,
}

/// 校验后的完整配置
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub level: LevelFilter,
    pub appenders: Vec<AppenderSpec>,
}

/// 解析配置文档，相对路径基于 `base_dir`
pub fn parse_document(bytes: &[u8], base_dir: &Path) -> Result<ResolvedConfig, ConfigError> {
    let text = std::str::from_utf8(bytes)?;
    let document: ConfigDocument = json5::from_str(text)?;

    let level = match document.level.as_deref() {
        Some(value) => parse_level("level", value)?,
        None => DEFAULT_ROOT_LEVEL,
    };

    let appenders = document
        .appenders
        .into_iter()
        .enumerate()
        .map(|(index, appender)| resolve_appender(index, appender, base_dir))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ResolvedConfig { level, appenders })
}

fn resolve_appender(
    index: usize,
    appender: AppenderDocument,
    base_dir: &Path,
) -> Result<AppenderSpec, ConfigError> {
    let target = match appender.kind.to_ascii_lowercase().as_str() {
        "file" => {
            let raw = appender
                .path
                .filter(|p| !p.trim().is_empty())
                .ok_or(ConfigError::MissingField { index, field: "path" })?;
            let path = PathBuf::from(raw);
            let path = if path.is_absolute() {
                path
            } else {
                base_dir.join(path)
            };
            AppenderTarget::File {
                path,
                append: appender.append,
            }
        }
        "logcat" => AppenderTarget::Logcat {
            tag: appender.tag.unwrap_or_else(|| DEFAULT_TAG.to_string()),
        },
        other => return Err(ConfigError::UnknownAppender(other.to_string())),
    };

    let layout = PatternLayout::compile(appender.pattern.as_deref().unwrap_or(DEFAULT_PATTERN))?;

    let threshold = match appender.threshold.as_deref() {
        Some(value) => parse_level(&format!("appenders[{}].threshold", index), value)?,
        None => LevelFilter::Trace,
    };

    Ok(AppenderSpec {
        target,
        layout,
        threshold,
    })
}

fn parse_level(field: &str, value: &str) -> Result<LevelFilter, ConfigError> {
    LevelFilter::from_str(value.trim()).map_err(|_| ConfigError::InvalidLevel {
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<ResolvedConfig, ConfigError> {
        parse_document(text.as_bytes(), Path::new("/data/app/files"))
    }

    #[test]
    fn test_parse_bundled_default() {
        let config = parse_document(
            crate::core::bootstrap::DEFAULT_CONFIG,
            Path::new("/data/app/files"),
        )
        .expect("内置默认配置应该合法");
        assert_eq!(config.level, LevelFilter::Debug);
        assert_eq!(config.appenders.len(), 2);
        assert_eq!(
            config.appenders[0].target,
            AppenderTarget::File {
                path: PathBuf::from("/data/app/files/logs/userdebug.log"),
                append: true,
            }
        );
        assert_eq!(config.appenders[1].threshold, LevelFilter::Info);
    }

    #[test]
    fn test_level_is_case_insensitive_and_defaults_to_debug() {
        assert_eq!(parse("{ level: 'WARN' }").unwrap().level, LevelFilter::Warn);
        assert_eq!(parse("{}").unwrap().level, LevelFilter::Debug);
    }

    #[test]
    fn test_absolute_path_kept() {
        let config = parse("{ appenders: [{ kind: 'file', path: '/sdcard/x.log' }] }").unwrap();
        assert_eq!(
            config.appenders[0].target,
            AppenderTarget::File {
                path: PathBuf::from("/sdcard/x.log"),
                append: true,
            }
        );
    }

    #[test]
    fn test_malformed_document_is_parse_error() {
        assert!(matches!(parse("<config/>"), Err(ConfigError::Parse(_))));
        assert!(matches!(parse(""), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_invalid_utf8_rejected() {
        let result = parse_document(&[0xff, 0xfe, 0x00], Path::new("/tmp"));
        assert!(matches!(result, Err(ConfigError::Utf8(_))));
    }

    #[test]
    fn test_validation_errors() {
        assert!(matches!(
            parse("{ level: 'loud' }"),
            Err(ConfigError::InvalidLevel { .. })
        ));
        assert!(matches!(
            parse("{ appenders: [{ kind: 'socket' }] }"),
            Err(ConfigError::UnknownAppender(kind)) if kind == "socket"
        ));
        assert!(matches!(
            parse("{ appenders: [{ kind: 'file' }] }"),
            Err(ConfigError::MissingField { index: 0, field: "path" })
        ));
        assert!(matches!(
            parse("{ appenders: [{ kind: 'logcat', threshold: 'nope' }] }"),
            Err(ConfigError::InvalidLevel { .. })
        ));
    }

    #[test]
    fn test_hand_edited_pattern_that_cannot_render_is_rejected() {
        for pattern in ["%70000level %m%n", "%d{%#z} %m", "%level{x}"] {
            let text = format!("{{ appenders: [{{ kind: 'logcat', pattern: '{}' }}] }}", pattern);
            assert!(
                matches!(parse(&text), Err(ConfigError::InvalidPattern { .. })),
                "{} 应该被拒绝",
                pattern
            );
        }
    }
}
