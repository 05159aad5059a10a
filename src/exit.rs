// src/exit.rs
//! Standardized process exit codes, in the same spirit as the teacher's
//! `SlopChopExit`: a stable, scriptable contract rather than bare 0/1.

use std::process::Termination;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TreeDiffExit {
    /// Script emitted successfully.
    Success = 0,
    /// Generic error (IO, config, unexpected).
    Error = 1,
    /// An input file was missing or unreadable (spec.md §7).
    InputError = 2,
    /// The AST blob failed to decode (spec.md §7).
    DecodeError = 3,
}

impl TreeDiffExit {
    #[must_use]
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl Termination for TreeDiffExit {
    fn report(self) -> std::process::ExitCode {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        std::process::ExitCode::from(self.code() as u8)
    }
}
