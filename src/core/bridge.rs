//! `log` crate → 门面的桥接
//!
//! 安装后，进程内所有 `log::info!` 等宏都会走到 [`LogFacade`]。

use crate::core::facade::LogFacade;
use crate::core::sink::Priority;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::Arc;

pub struct FacadeBridge {
    facade: Arc<LogFacade>,
}

impl FacadeBridge {
    pub fn new(facade: Arc<LogFacade>) -> Self {
        Self { facade }
    }
}

impl Log for FacadeBridge {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        self.facade.tree_count() > 0
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let message = record.args().to_string();
        self.facade.log(
            map_level(record.level()).as_raw(),
            Some(record.target()),
            &message,
            None,
        );
    }

    fn flush(&self) {}
}

/// `log::Level` 到 Android 优先级
pub fn map_level(level: Level) -> Priority {
    match level {
        Level::Error => Priority::Error,
        Level::Warn => Priority::Warn,
        Level::Info => Priority::Info,
        Level::Debug => Priority::Debug,
        Level::Trace => Priority::Verbose,
    }
}

/// 把门面注册为 `log` 的全局 logger，每个进程只能成功一次
pub fn install_log_bridge(facade: Arc<LogFacade>) -> Result<(), log::SetLoggerError> {
    log::set_boxed_logger(Box::new(FacadeBridge::new(facade)))?;
    log::set_max_level(LevelFilter::Trace);
    Ok(())
}
