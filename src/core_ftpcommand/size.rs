use crate::core_network::ControlChannel;
use crate::error::FtpsError;
use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

/// Size reported for an unknown or unreportable remote file. Callers must
/// treat non-positive values as "unknown", not as a zero-length file.
pub const SIZE_UNKNOWN: i64 = -1;

/// Probes the size of a remote file with SIZE, a metadata exchange on the
/// control channel only, no data connection and no body transfer.
///
/// A completed negative reply (file missing, SIZE unsupported) yields
/// [`SIZE_UNKNOWN`]; only a broken exchange is an error.
pub async fn send_size<C>(
    control: &mut ControlChannel<C>,
    remote_path: &str,
) -> Result<i64, FtpsError>
where
    C: AsyncRead + AsyncWrite + Unpin,
{
    let reply = control.exchange(&format!("SIZE {}", remote_path)).await?;
    if reply.code != 213 {
        debug!(
            "SIZE {} not reported: [{}] {}",
            remote_path, reply.code, reply.message
        );
        return Ok(SIZE_UNKNOWN);
    }

    match reply.message.trim().parse::<i64>() {
        Ok(size) => Ok(size),
        Err(_) => {
            debug!("Unparsable SIZE payload: {}", reply.message);
            Ok(SIZE_UNKNOWN)
        }
    }
}
