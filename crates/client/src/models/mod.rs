//! Typed records of the tool execution API.

pub mod enums;
pub mod error;
pub mod list;
pub mod run;
pub mod tool;

pub use enums::{PaginationType, RunStatus, ToolStepFailureBehavior, ToolStepMethod};
pub use error::{ErrorDetail, ErrorResponse};
pub use list::{Page, RunList, ToolList};
pub use run::{
    Run, RunMetadata, RunOptions, RunRequest, RunToolPayload, RunToolSnapshot, StepResult,
};
pub use tool::{FtpVariant, Pagination, StepProtocol, Tool, ToolStep};
