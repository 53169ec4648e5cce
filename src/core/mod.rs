pub mod app;
pub mod backend;
pub mod bootstrap;
pub mod bridge;
pub mod diagnostics;
pub mod facade;
pub mod gate;
pub mod sink;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use app::{install_file_logging, install_file_logging_with};
pub use backend::{LoggerContext, LoggingBackend};
pub use bootstrap::{BootstrapConfig, BootstrapError, EnsureOutcome};
pub use facade::{LogFacade, LogTree};
pub use gate::{should_enable_file_logging, BuildClassification};
pub use sink::{FileLoggingSink, Priority, SinkState};
