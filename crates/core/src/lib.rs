pub mod error;
pub mod event;
pub mod history;
pub mod interval;
pub mod state;

pub use error::{Result, TaskError, TerminateError};
pub use event::{ChartSurface, Message, Tab};
pub use history::SampleHistory;
pub use interval::RefreshInterval;
