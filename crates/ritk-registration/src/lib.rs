pub mod error;
pub mod metric;
pub mod optimizer;
pub mod parallel;
pub mod progress;
pub mod validation;

pub use error::{RegistrationError, Result, ScalarRole};
pub use metric::{Metric, MetricInputs, MutualInformation, MutualInformationConfig, MutualInformationOutput};
pub use parallel::ExecutionStrategy;
pub use progress::{ConsoleProgressCallback, HistoryCallback, ProgressCallback, ProgressInfo, ProgressTracker, RunSummary};
