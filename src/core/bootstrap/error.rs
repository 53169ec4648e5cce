use std::path::PathBuf;
use thiserror::Error;

/// 写入默认配置文件失败（存储已满、无权限等）
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("创建目录 {path:?} 失败: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("写入默认配置 {path:?} 失败: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("保存配置文件 {path:?} 失败: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}
