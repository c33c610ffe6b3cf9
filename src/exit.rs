// src/exit.rs
//! Process exit codes for `socindex`.
//!
//! Provides a stable contract for scripts and automation.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum SocIndexExit {
    /// Scores were computed and printed.
    Success = 0,
    /// Generic error (IO, thread pool, internal invariant).
    Error = 1,
    /// Relations, stakes or parameters failed to parse or validate.
    InvalidInput = 2,
}

impl SocIndexExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }

    pub fn exit(self) -> ! {
        std::process::exit(self.code())
    }

    /// Maps a library error onto the exit code a script should see.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        use crate::error::SocIndexError;
        match err.downcast_ref::<SocIndexError>() {
            Some(
                SocIndexError::Validation(_) | SocIndexError::Config(_) | SocIndexError::Json(_),
            ) => Self::InvalidInput,
            _ => Self::Error,
        }
    }
}

impl Termination for SocIndexExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
