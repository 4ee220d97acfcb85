use crate::wire::wire_enum;

wire_enum! {
    /// Execution status of a run.
    pub enum RunStatus {
        /// Execution in progress.
        Running => "running",
        /// Completed successfully.
        Success => "success",
        /// Failed due to an error.
        Failed => "failed",
        /// Cancelled by a user or the system.
        Aborted => "aborted",
    }
}

impl RunStatus {
    /// A run in a terminal state will not change status again.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Running)
    }
}

wire_enum! {
    /// HTTP method of a step. Non-HTTP protocols use `POST`.
    pub enum ToolStepMethod {
        Get => "GET",
        Post => "POST",
        Put => "PUT",
        Delete => "DELETE",
        Patch => "PATCH",
        Head => "HEAD",
        Options => "OPTIONS",
    }
}

wire_enum! {
    pub enum PaginationType {
        Disabled => "disabled",
        PageBased => "pageBased",
        OffsetBased => "offsetBased",
        CursorBased => "cursorBased",
    }
}

wire_enum! {
    /// What happens to the rest of a tool when a step fails.
    pub enum ToolStepFailureBehavior {
        /// Stop the tool.
        Fail => "fail",
        /// Proceed to the next step.
        Continue => "continue",
    }
}
