//! Line protocol spoken over the editor's control socket.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

pub const SOCKET_PATH: &str = "/tmp/ringframe.sock";

#[derive(Debug, Clone, PartialEq)]
pub enum ControlCommand {
    /// Decode and show a new photo.
    Load(PathBuf),
    /// Write the current canvas as PNG, to the configured path if none given.
    Export(Option<PathBuf>),
    ResetView,
    Zoom(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum ControlError {
    #[error("Empty command")]
    Empty,
    #[error("Unknown command '{0}'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("Invalid zoom scale '{0}'")]
    InvalidScale(String),
}

impl FromStr for ControlCommand {
    type Err = ControlError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, arg) = match line.split_once(char::is_whitespace) {
            Some((verb, arg)) => (verb, Some(arg.trim()).filter(|a| !a.is_empty())),
            None => (line, None),
        };

        match verb {
            "" => Err(ControlError::Empty),
            "load" => arg
                .map(|p| Self::Load(PathBuf::from(p)))
                .ok_or(ControlError::MissingArgument("load")),
            "export" => Ok(Self::Export(arg.map(PathBuf::from))),
            "reset" => Ok(Self::ResetView),
            "zoom" => {
                let arg = arg.ok_or(ControlError::MissingArgument("zoom"))?;
                arg.parse::<f64>()
                    .ok()
                    .filter(|s| s.is_finite())
                    .map(Self::Zoom)
                    .ok_or_else(|| ControlError::InvalidScale(arg.to_string()))
            }
            other => Err(ControlError::Unknown(other.to_string())),
        }
    }
}

impl fmt::Display for ControlCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(path) => write!(f, "load {}", path.display()),
            Self::Export(Some(path)) => write!(f, "export {}", path.display()),
            Self::Export(None) => write!(f, "export"),
            Self::ResetView => write!(f, "reset"),
            Self::Zoom(scale) => write!(f, "zoom {}", scale),
        }
    }
}
