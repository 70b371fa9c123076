// Error handling for the FTPS client.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpsError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to initialize FTPS session: {0}")]
    SessionInit(String),

    #[error("Could not apply option {option}: {reason}")]
    Configuration {
        option: &'static str,
        reason: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Transfer failed: [{code}] {message}")]
    Transfer { code: u32, message: String },
}

impl FtpsError {
    /// Builds a `Transfer` error from a server reply.
    pub fn transfer(code: u32, message: impl Into<String>) -> Self {
        FtpsError::Transfer {
            code,
            message: message.into(),
        }
    }

    /// Builds a `Transfer` error for an operation that exceeded the
    /// configured timeout. 421 is the FTP "service not available" family,
    /// the closest reply-code analogue to a dead exchange.
    pub fn timed_out(what: &str) -> Self {
        FtpsError::Transfer {
            code: 421,
            message: format!("{} timed out", what),
        }
    }
}
