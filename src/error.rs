//! Error types.
//!
//! Everything that can stop the poll loop is an [`Error`]. The one recoverable
//! condition, an event whose index falls outside the device's declared
//! capabilities, is the separate [`IndexError`](crate::state::IndexError) and
//! never travels through this enum.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal (or usage) conditions raised by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// No device path was given on the command line.
    #[error("usage: {program} <device>")]
    Usage { program: String },

    /// The controller device could not be opened.
    #[error("cannot open device {}: {source}", .path.display())]
    NotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An event record could not be read in full.
    #[error("error reading event from {}: {reason}", .path.display())]
    Read { path: PathBuf, reason: String },

    /// The OS refused to grant or revoke access to the port range.
    #[error("ioperm(0x{base:x}, {len}, {}) failed: {source}", u8::from(*.enable))]
    Permission {
        base: u16,
        len: u16,
        enable: bool,
        #[source]
        source: io::Error,
    },

    /// The frame could not be written to the console.
    #[error("writing frame: {0}")]
    Output(#[from] io::Error),

    /// The configuration file is missing or malformed.
    #[error("config {}: {reason}", .path.display())]
    Config { path: PathBuf, reason: String },
}

impl Error {
    /// Process exit code for this condition.
    ///
    /// Only [`Error::Usage`] exits successfully; every other kind is a failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Usage { .. } => 0,
            _ => 1,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_usage_exits_cleanly() {
        let usage = Error::Usage {
            program: "joyport".into(),
        };
        assert_eq!(usage.exit_code(), 0);

        let read = Error::Read {
            path: "/dev/js0".into(),
            reason: "short read".into(),
        };
        assert_eq!(read.exit_code(), 1);

        let denied = Error::Permission {
            base: 0x378,
            len: 3,
            enable: true,
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(denied.exit_code(), 1);
        assert!(denied.to_string().starts_with("ioperm(0x378, 3, 1) failed"));
    }
}
