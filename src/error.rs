use std::io::Write;
use strum_macros::Display;
use thiserror::Error;

#[derive(Debug, Display)]
pub enum ConfigType {
    #[strum(serialize = "Main config")]
    MAIN,
    #[strum(serialize = "Document")]
    DOCUMENT,
}

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("error processing args. Cause : {0}")]
    ArgsProcessingError(String),
    #[error("unable to create default configuration file in {0}")]
    ConfigError(String),
    #[error("unable to read configuration file {file:?}. Cause : {cause}")]
    ConfigReadError { file: String, cause: String },
    #[error("unable to parse {location} file {file:?}. Cause : {cause}")]
    SerdeTomlError {
        location: ConfigType,
        file: String,
        cause: String,
    },
    #[error(transparent)]
    Io(#[from] ::std::io::Error),
    #[error("JSON parsing error: {0}")]
    JsonError(String),
    #[error("{0}")]
    StructuredTextError(String),
    #[error("invalid format")]
    InvalidCustom,
    #[error("invalid settings. Cause : {0}")]
    InvalidSettings(String),
    #[error("unable to decode state token. Cause : {0}")]
    TokenDecodeError(String),
    #[error("unable to import {location} {file:?}. Cause : {cause}")]
    ImportError {
        location: ConfigType,
        file: String,
        cause: String,
    },
    #[error("convert failed. Cause : {0}")]
    RenderError(String),
    #[error(transparent)]
    Pattern(#[from] ::regex::Error),
    #[error("{0}")]
    Msg(String),
}

impl From<&'static str> for Error {
    fn from(s: &'static str) -> Self {
        Error::Msg(s.to_owned())
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Msg(s)
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::JsonError(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn default_error_handler(error: &Error, output: &mut dyn Write) {
    use nu_ansi_term::Color::Red;

    match error {
        Error::Io(io_error) if io_error.kind() == ::std::io::ErrorKind::BrokenPipe => {
            ::std::process::exit(0);
        }
        Error::ConfigError(_)
        | Error::ConfigReadError { file: _, cause: _ }
        | Error::SerdeTomlError {
            location: _,
            file: _,
            cause: _,
        } => {
            writeln!(output, "{}: {}", Red.paint("[config error]"), error).ok();
        }
        Error::JsonError(_)
        | Error::TokenDecodeError(_)
        | Error::ImportError {
            location: _,
            file: _,
            cause: _,
        } => {
            writeln!(output, "{}: {}", Red.paint("[state error]"), error).ok();
        }
        Error::StructuredTextError(_) | Error::InvalidCustom | Error::InvalidSettings(_) => {
            writeln!(output, "{}: {}", Red.paint("[custom error]"), error).ok();
        }
        Error::RenderError(_) => {
            writeln!(output, "{}: {}", Red.paint("[render error]"), error).ok();
        }
        _ => {
            writeln!(output, "{}: {}", Red.paint("[tmaker error]"), error).ok();
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_handler_labels_categories() {
        let mut out = Vec::new();
        default_error_handler(&Error::InvalidCustom, &mut out);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("[custom error]"));
        assert!(text.contains("invalid format"));
    }

    #[test]
    fn test_import_error_mentions_location() {
        let error = Error::ImportError {
            location: ConfigType::DOCUMENT,
            file: "tm_a.json".to_string(),
            cause: "missing field `bucket`".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "unable to import Document \"tm_a.json\". Cause : missing field `bucket`"
        );
    }
}
