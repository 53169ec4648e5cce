//! 配置引导
//!
//! 默认情况下日志框架只在固定位置查找配置文件。这里的配置文件放在
//! `/data/data/<app>/files/<config-file-name>`，这样可以通过 adb 读写。
//! 因此启动时先确保这个文件存在（不存在就从内置资源复制一份），再用它配置后端。

mod error;

pub use error::BootstrapError;

use crate::core::backend::{ConfigError, LoggingBackend};
use crate::core::diagnostics::DEFAULT_TAG;
use std::borrow::Cow;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// 配置文件名
pub const CONFIG_FILE_NAME: &str = "userdebuglog_config.json5";

/// 随应用打包的默认配置
pub static DEFAULT_CONFIG: &[u8] = include_bytes!("../../../res/userdebuglog_config.json5");

/// 引导参数
#[derive(Debug, Clone)]
pub struct BootstrapConfig {
    /// 应用私有可写目录（Android 上的 `Context.getFilesDir()`）
    pub files_dir: PathBuf,
    pub config_file_name: String,
    pub default_config: Cow<'static, [u8]>,
    /// 输出中 `%logger` 的名字
    pub logger_name: String,
}

impl BootstrapConfig {
    pub fn for_files_dir(files_dir: impl Into<PathBuf>) -> Self {
        Self {
            files_dir: files_dir.into(),
            config_file_name: CONFIG_FILE_NAME.to_string(),
            default_config: Cow::Borrowed(DEFAULT_CONFIG),
            logger_name: DEFAULT_TAG.to_string(),
        }
    }

    pub fn with_config_file_name(mut self, name: impl Into<String>) -> Self {
        self.config_file_name = name.into();
        self
    }

    pub fn with_default_config(mut self, bytes: impl Into<Cow<'static, [u8]>>) -> Self {
        self.default_config = bytes.into();
        self
    }

    pub fn with_logger_name(mut self, name: impl Into<String>) -> Self {
        self.logger_name = name.into();
        self
    }

    /// 配置文件的完整路径
    pub fn config_path(&self) -> PathBuf {
        self.files_dir.join(&self.config_file_name)
    }
}

/// [`ensure_config_file`] 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// 文件原本不存在，已从默认配置写入
    Created,
    /// 文件已存在，未做任何修改
    Existing,
}

/// 确保配置文件存在
///
/// 已存在的文件保持原样（运维人员可能手工改过）。不存在时先写临时文件，
/// 写完整后再以不覆盖的方式落到目标路径，不会留下写了一半的配置。
pub fn ensure_config_file(
    target: &Path,
    default_config: &[u8],
) -> Result<EnsureOutcome, BootstrapError> {
    if target.exists() {
        return Ok(EnsureOutcome::Existing);
    }

    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| BootstrapError::CreateDirectory {
        path: dir.to_path_buf(),
        source,
    })?;

    let write_error = |source| BootstrapError::Write {
        path: target.to_path_buf(),
        source,
    };
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    tmp.write_all(default_config).map_err(write_error)?;
    tmp.as_file().sync_all().map_err(write_error)?;

    match tmp.persist_noclobber(target) {
        Ok(_) => Ok(EnsureOutcome::Created),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(EnsureOutcome::Existing),
        Err(e) => Err(BootstrapError::Persist {
            path: target.to_path_buf(),
            source: e.error,
        }),
    }
}

/// 清空后端已有配置，再用 `path` 处的文件整体重新配置
pub fn load_configuration<B>(backend: &B, path: &Path) -> Result<(), ConfigError>
where
    B: LoggingBackend + ?Sized,
{
    backend.reset_context();
    let document = fs::read(path)?;
    backend.configure(&document)
}
