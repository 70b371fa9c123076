use crate::error::FtpsError;
use log::{debug, trace};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};

/// One server reply on the control channel: the three-digit code plus the
/// accompanying text. Multi-line replies are collapsed into `message` with
/// the continuation lines joined by `\n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub code: u32,
    pub message: String,
}

impl Reply {
    /// 1xx: transfer about to start, more to follow on this exchange.
    pub fn is_preliminary(&self) -> bool {
        (100..200).contains(&self.code)
    }

    /// 2xx: requested action completed.
    pub fn is_completion(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// 3xx: command accepted, another command expected (e.g. USER -> PASS).
    pub fn is_intermediate(&self) -> bool {
        (300..400).contains(&self.code)
    }

    /// Converts a negative reply into a `Transfer` error carrying the
    /// server's code and message.
    pub fn into_transfer_error(self) -> FtpsError {
        FtpsError::transfer(self.code, self.message)
    }
}

/// Command/reply engine for the FTP control channel.
///
/// Generic over the stream so the protocol logic runs identically over a
/// TLS-wrapped TCP stream and an in-memory duplex stream in tests.
pub struct ControlChannel<S> {
    stream: BufStream<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> ControlChannel<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: BufStream::new(stream),
        }
    }

    /// Sends one command line, CRLF-terminated.
    pub async fn send_command(&mut self, command: &str) -> Result<(), FtpsError> {
        trace!("--> {}", command);
        self.stream.write_all(command.as_bytes()).await?;
        self.stream.write_all(b"\r\n").await?;
        self.stream.flush().await?;
        Ok(())
    }

    /// Reads one complete reply, handling the multi-line form
    /// (`123-first line` ... `123 last line`).
    pub async fn read_reply(&mut self) -> Result<Reply, FtpsError> {
        let mut line = String::new();
        let n = self.stream.read_line(&mut line).await?;
        if n == 0 {
            return Err(FtpsError::Io(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "control connection closed by server",
            )));
        }
        let line = line.trim_end();

        let code = parse_reply_code(line)?;
        let mut message = reply_text(line).to_string();

        // Multi-line reply: keep reading until "<code> " terminates it.
        if line.as_bytes().get(3) == Some(&b'-') {
            let terminator = format!("{:03} ", code);
            loop {
                let mut next = String::new();
                let n = self.stream.read_line(&mut next).await?;
                if n == 0 {
                    return Err(FtpsError::Io(std::io::Error::new(
                        std::io::ErrorKind::UnexpectedEof,
                        "control connection closed mid-reply",
                    )));
                }
                let next = next.trim_end();
                if let Some(last) = next.strip_prefix(&terminator) {
                    message.push('\n');
                    message.push_str(last);
                    break;
                }
                message.push('\n');
                message.push_str(next);
            }
        }

        debug!("<-- {} {}", code, message.lines().next().unwrap_or(""));
        Ok(Reply { code, message })
    }

    /// Sends a command and reads the single reply to it.
    pub async fn exchange(&mut self, command: &str) -> Result<Reply, FtpsError> {
        self.send_command(command).await?;
        self.read_reply().await
    }

    /// Releases the underlying stream, e.g. to shut it down explicitly.
    pub fn into_inner(self) -> S {
        self.stream.into_inner()
    }
}

fn parse_reply_code(line: &str) -> Result<u32, FtpsError> {
    line.get(..3)
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| FtpsError::transfer(0, format!("malformed server reply: {:?}", line)))
}

fn reply_text(line: &str) -> &str {
    // Skip "NNN " or "NNN-"; a bare "NNN" has no text.
    line.get(4..).unwrap_or("")
}
