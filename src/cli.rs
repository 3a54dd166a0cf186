//! Command-line handling.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Parsed invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cli {
    pub program: String,
    pub device: PathBuf,
}

impl Cli {
    /// `args` includes the program name, as from [`std::env::args`].
    ///
    /// A missing device is [`Error::Usage`]; extra arguments are ignored.
    pub fn parse<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut args = args.into_iter().map(Into::into);
        let program = args.next().unwrap_or_else(|| "joyport".to_string());
        match args.next() {
            Some(device) => Ok(Self {
                program,
                device: PathBuf::from(device),
            }),
            None => Err(Error::Usage { program }),
        }
    }
}

/// Text printed for [`Error::Usage`].
pub fn usage(program: &str) -> String {
    format!("Usage: {program} <device>\n\nDevice could be: /dev/js0\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_is_the_first_positional() {
        let cli = Cli::parse(["joyport", "/dev/js0"]).unwrap();
        assert_eq!(cli.device, PathBuf::from("/dev/js0"));
        assert_eq!(cli.program, "joyport");
    }

    #[test]
    fn no_device_is_a_usage_exit() {
        let err = Cli::parse(["./joyport"]).unwrap_err();
        assert_eq!(err.exit_code(), 0);
        let Error::Usage { program } = err else {
            panic!("expected usage error");
        };
        let text = usage(&program);
        assert!(text.starts_with("Usage: ./joyport <device>"));
        assert!(text.contains("/dev/js0"));
    }
}
