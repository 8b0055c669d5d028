use std::process::ExitCode;

/// Process exit status of a keyshrink command.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ExitStatus {
    /// The command ran; any warnings were advisory.
    Success,
    /// Translations are out of sync and `--deny-warnings` was given.
    Failure,
    /// Config, I/O, parse or missing-reference error. Nothing was written.
    Error,
}

impl From<ExitStatus> for ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => ExitCode::from(0),
            ExitStatus::Failure => ExitCode::from(1),
            ExitStatus::Error => ExitCode::from(2),
        }
    }
}
