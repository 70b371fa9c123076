use crate::constants::DATA_BUFFER_SIZE;
use crate::core_network::ControlChannel;
use crate::error::FtpsError;
use log::{info, trace};
use std::future::Future;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Sends a STOR and streams `source` over the data connection.
///
/// `data` is a pending connection rather than an open stream: in active
/// mode the server dials back only after it has accepted the transfer
/// command, so establishment has to wait until the preliminary reply.
/// The data connection is shut down once the source is exhausted so the
/// server sees EOF, then the final transfer reply is checked on the
/// control channel.
pub async fn send_stor<C, D, Fut, R>(
    control: &mut ControlChannel<C>,
    data: Fut,
    remote_path: &str,
    source: &mut R,
) -> Result<u64, FtpsError>
where
    C: AsyncRead + AsyncWrite + Unpin,
    D: AsyncRead + AsyncWrite + Unpin,
    Fut: Future<Output = Result<D, FtpsError>>,
    R: AsyncRead + Unpin,
{
    let reply = control.exchange(&format!("STOR {}", remote_path)).await?;
    if !reply.is_preliminary() {
        return Err(reply.into_transfer_error());
    }
    let mut data = data.await?;

    let mut buffer = vec![0u8; DATA_BUFFER_SIZE];
    let mut sent: u64 = 0;
    loop {
        let n = source.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        data.write_all(&buffer[..n]).await.map_err(|e| {
            FtpsError::transfer(426, format!("data connection broke during upload: {}", e))
        })?;
        sent += n as u64;
        trace!("Uploaded {} bytes so far", sent);
    }
    data.shutdown().await.map_err(|e| {
        FtpsError::transfer(426, format!("could not close data connection: {}", e))
    })?;
    drop(data);

    let reply = control.read_reply().await?;
    if !reply.is_completion() {
        return Err(reply.into_transfer_error());
    }
    info!("Stored {} ({} bytes)", remote_path, sent);
    Ok(sent)
}
