use std::error::Error;
use std::fmt;

/// Page load or DOM extraction failure, carrying the transport status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrapeError {
    pub status: u16,
    pub message: String,
}

impl ScrapeError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        ScrapeError {
            status,
            message: message.into(),
        }
    }

    /// Wrap a transport failure, defaulting to 500 when the error carries
    /// no HTTP status (timeouts, connection resets, DNS failures).
    pub fn transport(err: &reqwest::Error) -> Self {
        let status = err.status().map_or(500, |s| s.as_u16());
        ScrapeError::new(status, err.to_string())
    }
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "scrape failed ({}): {}", self.status, self.message)
    }
}

impl Error for ScrapeError {}

/// Destination append returned a non-success status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteError {
    pub status: u16,
    pub message: String,
}

impl WriteError {
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        WriteError {
            status,
            message: message.into(),
        }
    }

    pub fn transport(err: &reqwest::Error) -> Self {
        let status = err.status().map_or(500, |s| s.as_u16());
        WriteError::new(status, err.to_string())
    }
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sheet append failed ({}): {}", self.status, self.message)
    }
}

impl Error for WriteError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_status() {
        let err = ScrapeError::new(404, "page gone");
        assert_eq!(err.to_string(), "scrape failed (404): page gone");
    }

    #[test]
    fn write_error_keeps_status() {
        let err = WriteError::new(503, "backend unavailable");
        assert_eq!(err.status, 503);
    }
}
