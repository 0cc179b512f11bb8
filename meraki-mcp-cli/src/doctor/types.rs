//! Check results and their statuses

/// Outcome of one check
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CheckStatus {
    /// Nothing to report
    Ok,
    /// Works, but something deserves attention
    Warning,
    /// The server will not work until this is fixed
    Error,
}

/// Process exit code, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    Warning = 1,
    Error = 2,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// One line of the doctor report
#[derive(Debug, Clone)]
pub struct Check {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    /// What the user can do about a warning or error
    pub fix: Option<String>,
}

impl Check {
    pub fn new(name: &str, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            status,
            message: message.into(),
            fix: None,
        }
    }

    pub fn with_fix(mut self, fix: impl Into<String>) -> Self {
        self.fix = Some(fix.into());
        self
    }
}

pub(crate) struct CheckCounts {
    pub ok_count: usize,
    pub warning_count: usize,
    pub error_count: usize,
}
