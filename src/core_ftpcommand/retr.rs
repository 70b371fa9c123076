use crate::constants::DATA_BUFFER_SIZE;
use crate::core_network::ControlChannel;
use crate::error::FtpsError;
use log::info;
use std::future::Future;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Sends a RETR and drains the data connection, capturing the content in
/// memory while teeing every chunk into `sink` (the local file).
///
/// `data` is a pending connection, established once the server accepts the
/// command (see [`send_stor`](crate::core_ftpcommand::stor::send_stor)).
/// Returns the retrieved bytes; an empty vector when the remote file is
/// empty.
pub async fn send_retr<C, D, Fut, W>(
    control: &mut ControlChannel<C>,
    data: Fut,
    remote_path: &str,
    sink: &mut W,
) -> Result<Vec<u8>, FtpsError>
where
    C: AsyncRead + AsyncWrite + Unpin,
    D: AsyncRead + AsyncWrite + Unpin,
    Fut: Future<Output = Result<D, FtpsError>>,
    W: AsyncWrite + Unpin,
{
    let reply = control.exchange(&format!("RETR {}", remote_path)).await?;
    if !reply.is_preliminary() {
        return Err(reply.into_transfer_error());
    }
    let mut data = data.await?;

    let mut content = Vec::new();
    let mut buffer = vec![0u8; DATA_BUFFER_SIZE];
    loop {
        let n = data.read(&mut buffer).await.map_err(|e| {
            FtpsError::transfer(426, format!("data connection broke during download: {}", e))
        })?;
        if n == 0 {
            break;
        }
        content.extend_from_slice(&buffer[..n]);
        sink.write_all(&buffer[..n]).await?;
    }
    drop(data);

    let reply = control.read_reply().await?;
    if !reply.is_completion() {
        return Err(reply.into_transfer_error());
    }
    info!("Retrieved {} ({} bytes)", remote_path, content.len());
    Ok(content)
}
