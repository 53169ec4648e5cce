//! 文件日志 sink - 引导配置并把分级日志转发给后端

use crate::core::backend::{print_in_case_of_errors_or_warnings, LoggerContext, LoggingBackend};
use crate::core::bootstrap::{
    ensure_config_file, load_configuration, BootstrapConfig, EnsureOutcome,
};
use crate::core::diagnostics::SystemChannel;
use crate::core::facade::LogTree;
use serde::Serialize;
use std::error::Error;
use std::sync::{Arc, Mutex};

/// Android 日志优先级（与 `android.util.Log` 的常量一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(i32)]
pub enum Priority {
    Verbose = 2,
    Debug = 3,
    Info = 4,
    Warn = 5,
    Error = 6,
    Assert = 7,
}

impl Priority {
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            2 => Some(Priority::Verbose),
            3 => Some(Priority::Debug),
            4 => Some(Priority::Info),
            5 => Some(Priority::Warn),
            6 => Some(Priority::Error),
            7 => Some(Priority::Assert),
            _ => None,
        }
    }

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// sink 生命周期
///
/// `Uninitialized → ConfigEnsured → Loaded | LoadFailed`。两个终态下 sink 都保持可用，
/// `LoadFailed` 时输出行为取决于后端的默认状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SinkState {
    Uninitialized,
    ConfigEnsured,
    Loaded,
    LoadFailed,
}

/// 文件日志 sink
///
/// 构造时同步完成引导（确保配置文件存在 → reset → 加载），之后只做转发，不做 I/O。
pub struct FileLoggingSink<B: LoggingBackend + ?Sized = LoggerContext> {
    config: BootstrapConfig,
    channel: SystemChannel,
    state: Mutex<SinkState>,
    backend: Arc<B>,
}

impl FileLoggingSink<LoggerContext> {
    /// 使用内置的 [`LoggerContext`] 作为后端
    pub fn with_logger_context(config: BootstrapConfig) -> Self {
        let backend = Arc::new(LoggerContext::new(&config.logger_name, config.files_dir.clone()));
        Self::new(config, backend)
    }
}

impl<B: LoggingBackend + ?Sized> FileLoggingSink<B> {
    pub fn new(config: BootstrapConfig, backend: Arc<B>) -> Self {
        let channel = SystemChannel::new(&config.logger_name);
        Self::with_channel(config, backend, channel)
    }

    /// 诊断信息写到指定的系统通道
    pub fn with_channel(config: BootstrapConfig, backend: Arc<B>, channel: SystemChannel) -> Self {
        let sink = Self {
            channel,
            config,
            state: Mutex::new(SinkState::Uninitialized),
            backend,
        };
        sink.configure_for_local_configuration_file();
        sink
    }

    pub fn state(&self) -> SinkState {
        self.state
            .lock()
            .map(|s| *s)
            .unwrap_or(SinkState::Uninitialized)
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    pub fn config(&self) -> &BootstrapConfig {
        &self.config
    }

    /// 重新读取配置文件（例如通过 adb 修改之后）
    pub fn reconfigure(&self) -> SinkState {
        self.configure_for_local_configuration_file()
    }

    /// 按固定映射表转发：INFO→info，WARN→warn，DEBUG→debug，VERBOSE→trace，ERROR→error
    ///
    /// 其他级别（包括 ASSERT 和未知值）直接丢弃。
    pub fn log(
        &self,
        priority: i32,
        _tag: Option<&str>,
        message: &str,
        error: Option<&(dyn Error + 'static)>,
    ) {
        match Priority::from_raw(priority) {
            Some(Priority::Info) => self.backend.info(message, error),
            Some(Priority::Warn) => self.backend.warn(message, error),
            Some(Priority::Debug) => self.backend.debug(message, error),
            Some(Priority::Verbose) => self.backend.trace(message, error),
            Some(Priority::Error) => self.backend.error(message, error),
            // TODO: ASSERT (wtf) 目前没有对应的后端级别，确认是否应映射到 error
            Some(Priority::Assert) | None => {}
        }
    }

    fn set_state(&self, state: SinkState) {
        if let Ok(mut current) = self.state.lock() {
            *current = state;
        }
    }

    fn configure_for_local_configuration_file(&self) -> SinkState {
        let path = self.config.config_path();

        match ensure_config_file(&path, &self.config.default_config) {
            Ok(EnsureOutcome::Created) => self.channel.info(&format!(
                "日志配置文件不存在，已重新创建: {}",
                path.display()
            )),
            Ok(EnsureOutcome::Existing) => {}
            Err(e) => self.channel.error(&format!("❌ 写入默认日志配置失败: {}", e)),
        }
        self.set_state(SinkState::ConfigEnsured);

        let state = match load_configuration(self.backend.as_ref(), &path) {
            Ok(()) => {
                print_in_case_of_errors_or_warnings(&self.backend.status_list(), &self.channel);
                SinkState::Loaded
            }
            Err(e) => {
                let printed =
                    print_in_case_of_errors_or_warnings(&self.backend.status_list(), &self.channel);
                if !printed {
                    self.channel
                        .error(&format!("❌ 加载日志配置 {} 失败: {}", path.display(), e));
                }
                SinkState::LoadFailed
            }
        };

        self.set_state(state);
        state
    }
}

impl<B: LoggingBackend + ?Sized> LogTree for FileLoggingSink<B> {
    fn log(
        &self,
        priority: i32,
        tag: Option<&str>,
        message: &str,
        error: Option<&(dyn Error + 'static)>,
    ) {
        FileLoggingSink::log(self, priority, tag, message, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bootstrap::{CONFIG_FILE_NAME, DEFAULT_CONFIG};
    use crate::core::test_support::{BackendCall, RecordingBackend};
    use log::{Level, Log, Metadata, Record};
    use std::fmt;
    use std::fs;

    #[derive(Debug)]
    struct Boom;

    /// 记录系统通道收到的每条诊断的级别
    #[derive(Clone, Default)]
    struct DiagnosticLog(Arc<Mutex<Vec<Level>>>);

    impl DiagnosticLog {
        fn levels(&self) -> Vec<Level> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Log for DiagnosticLog {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            self.0.lock().unwrap().push(record.level());
        }

        fn flush(&self) {}
    }

    fn observed_sink(
        dir: &std::path::Path,
        backend: RecordingBackend,
    ) -> (FileLoggingSink<RecordingBackend>, DiagnosticLog) {
        let diagnostics = DiagnosticLog::default();
        let channel = SystemChannel::with_logger("test", Box::new(diagnostics.clone()));
        let sink = FileLoggingSink::with_channel(
            BootstrapConfig::for_files_dir(dir),
            Arc::new(backend),
            channel,
        );
        (sink, diagnostics)
    }

    impl fmt::Display for Boom {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "boom")
        }
    }

    impl Error for Boom {}

    fn recording_sink(
        dir: &std::path::Path,
        default: &'static [u8],
    ) -> FileLoggingSink<RecordingBackend> {
        let config = BootstrapConfig::for_files_dir(dir).with_default_config(default);
        FileLoggingSink::new(config, Arc::new(RecordingBackend::strict()))
    }

    #[test]
    fn test_priority_raw_values_match_android() {
        assert_eq!(Priority::from_raw(2), Some(Priority::Verbose));
        assert_eq!(Priority::from_raw(7), Some(Priority::Assert));
        assert_eq!(Priority::from_raw(1), None);
        assert_eq!(Priority::Error.as_raw(), 6);
    }

    #[test]
    fn test_level_mapping_table() {
        let dir = tempfile::tempdir().unwrap();
        let sink = recording_sink(dir.path(), b"{}".as_slice());
        let boom = Boom;

        sink.log(Priority::Info.as_raw(), Some("t"), "i", None);
        sink.log(Priority::Warn.as_raw(), Some("t"), "w", Some(&boom));
        sink.log(Priority::Debug.as_raw(), None, "d", None);
        sink.log(Priority::Verbose.as_raw(), None, "v", None);
        sink.log(Priority::Error.as_raw(), None, "e", Some(&boom));

        assert_eq!(
            sink.backend().calls(),
            vec![
                BackendCall::new("info", "i", None),
                BackendCall::new("warn", "w", Some("boom")),
                BackendCall::new("debug", "d", None),
                BackendCall::new("trace", "v", None),
                BackendCall::new("error", "e", Some("boom")),
            ]
        );
    }

    #[test]
    fn test_unmapped_priorities_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let sink = recording_sink(dir.path(), b"{}".as_slice());

        for raw in [Priority::Assert.as_raw(), 0, 1, 8, -3, i32::MAX] {
            sink.log(raw, Some("t"), "dropped", None);
        }

        assert!(sink.backend().calls().is_empty());
    }

    #[test]
    fn test_bootstrap_seeds_file_and_loads() {
        let dir = tempfile::tempdir().unwrap();
        let sink = recording_sink(dir.path(), b"{ level: 'debug' }".as_slice());

        assert_eq!(sink.state(), SinkState::Loaded);
        assert_eq!(
            fs::read(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            b"{ level: 'debug' }"
        );
        assert_eq!(sink.backend().resets(), 1);
        assert_eq!(sink.backend().documents(), vec![b"{ level: 'debug' }".to_vec()]);
    }

    #[test]
    fn test_malformed_config_is_non_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), b"<configuration>").unwrap();

        let sink = recording_sink(dir.path(), DEFAULT_CONFIG);

        assert_eq!(sink.state(), SinkState::LoadFailed);
        sink.log(Priority::Debug.as_raw(), None, "still callable", None);
        assert_eq!(sink.backend().calls().len(), 1);
        assert_eq!(
            fs::read(dir.path().join(CONFIG_FILE_NAME)).unwrap(),
            b"<configuration>"
        );
    }

    #[test]
    fn test_malformed_config_emits_exactly_one_error_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), b"<configuration>").unwrap();

        let (sink, diagnostics) = observed_sink(dir.path(), RecordingBackend::strict());

        assert_eq!(sink.state(), SinkState::LoadFailed);
        assert_eq!(diagnostics.levels(), vec![Level::Error]);
    }

    #[test]
    fn test_clean_load_of_existing_config_is_silent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), b"{ level: 'debug' }").unwrap();

        let (sink, diagnostics) = observed_sink(dir.path(), RecordingBackend::strict());

        assert_eq!(sink.state(), SinkState::Loaded);
        assert!(diagnostics.levels().is_empty());
    }

    #[test]
    fn test_seeding_reports_only_an_info_diagnostic() {
        let dir = tempfile::tempdir().unwrap();

        let (sink, diagnostics) = observed_sink(dir.path(), RecordingBackend::new());

        assert_eq!(sink.state(), SinkState::Loaded);
        assert_eq!(diagnostics.levels(), vec![Level::Info]);
    }

    #[test]
    fn test_malformed_config_with_logger_context_emits_one_error_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), b"<configuration>").unwrap();
        let diagnostics = DiagnosticLog::default();
        let config = BootstrapConfig::for_files_dir(dir.path());
        let backend = Arc::new(LoggerContext::new(&config.logger_name, dir.path()));

        let sink = FileLoggingSink::with_channel(
            config,
            backend,
            SystemChannel::with_logger("test", Box::new(diagnostics.clone())),
        );

        assert_eq!(sink.state(), SinkState::LoadFailed);
        assert_eq!(diagnostics.levels(), vec![Level::Error]);
    }

    #[test]
    fn test_reconfigure_picks_up_edited_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = recording_sink(dir.path(), b"{ level: 'debug' }".as_slice());

        fs::write(dir.path().join(CONFIG_FILE_NAME), b"not json5 {").unwrap();
        assert_eq!(sink.reconfigure(), SinkState::LoadFailed);

        fs::write(dir.path().join(CONFIG_FILE_NAME), b"{ level: 'trace' }").unwrap();
        assert_eq!(sink.reconfigure(), SinkState::Loaded);

        assert_eq!(sink.backend().resets(), 3);
        assert_eq!(
            sink.backend().documents().last().cloned(),
            Some(b"{ level: 'trace' }".to_vec())
        );
    }

    #[test]
    fn test_unwritable_storage_is_non_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("files");
        fs::write(&blocker, b"").unwrap();

        let sink = recording_sink(&blocker, DEFAULT_CONFIG);

        assert_eq!(sink.state(), SinkState::LoadFailed);
        assert!(sink.backend().documents().is_empty());
        sink.log(Priority::Info.as_raw(), None, "no crash", None);
    }

    #[test]
    fn test_bundled_default_with_logger_context_writes_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileLoggingSink::with_logger_context(BootstrapConfig::for_files_dir(dir.path()));
        assert_eq!(sink.state(), SinkState::Loaded);

        sink.log(Priority::Info.as_raw(), None, "Info", None);
        sink.log(Priority::Debug.as_raw(), None, "Debug", None);
        sink.log(Priority::Verbose.as_raw(), None, "Verbose", None);

        let content = fs::read_to_string(dir.path().join("logs/userdebug.log")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("INFO  UserDebugLog - Info"));
        assert!(lines[1].ends_with("DEBUG UserDebugLog - Debug"));
    }
}
