use core::fmt::{self, Display};
use hyper::{
    header::InvalidHeaderValue,
    http::{self, uri::InvalidUri},
};
use serde_json::error::Category;

#[derive(Debug)]
pub enum Error {
    /// The configured server does not form a valid URI.
    InvalidUri,
    /// The session cookie contains bytes not allowed in a header.
    InvalidHeader,
    /// The request could not be assembled.
    Request,
    /// The connection failed or was dropped mid-response.
    Transport,
    /// The server answered with a non-success status code.
    Status(u16),
    /// JSON syntax error detected.
    Syntax,
    /// Unexpected JSON data types encountered.
    Data,
}

impl From<InvalidUri> for Error {
    fn from(_: InvalidUri) -> Self {
        Self::InvalidUri
    }
}

impl From<InvalidHeaderValue> for Error {
    fn from(_: InvalidHeaderValue) -> Self {
        Self::InvalidHeader
    }
}

impl From<http::Error> for Error {
    fn from(_: http::Error) -> Self {
        Self::Request
    }
}

impl From<hyper::Error> for Error {
    fn from(_: hyper::Error) -> Self {
        Self::Transport
    }
}

impl From<hyper_util::client::legacy::Error> for Error {
    fn from(_: hyper_util::client::legacy::Error) -> Self {
        Self::Transport
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        match err.classify() {
            Category::Data => Self::Data,
            Category::Syntax | Category::Eof => Self::Syntax,
            Category::Io => Self::Transport,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUri => f.write_str("Invalid server URI."),
            Self::InvalidHeader => f.write_str("Invalid session cookie."),
            Self::Request => f.write_str("Failed to build the request."),
            Self::Transport => f.write_str("Failed to reach the quiz server."),
            Self::Status(code) => write!(f, "Quiz server responded with status {code}."),
            Self::Syntax => f.write_str("Syntax error in JSON detected."),
            Self::Data => f.write_str("Unexpected data types in JSON detected."),
        }
    }
}

impl std::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
