use crate::core_network::ControlChannel;
use crate::error::FtpsError;
use crate::helpers::split_listing;
use log::info;
use std::future::Future;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

/// Sends an NLST (name-only listing) for `remote_dir` and collects the
/// result in memory.
///
/// `data` is a pending connection, established once the server accepts the
/// command. Returns one entry per line in server-reported order; an empty
/// directory yields an empty vector.
pub async fn send_nlst<C, D, Fut>(
    control: &mut ControlChannel<C>,
    data: Fut,
    remote_dir: &str,
) -> Result<Vec<String>, FtpsError>
where
    C: AsyncRead + AsyncWrite + Unpin,
    D: AsyncRead + AsyncWrite + Unpin,
    Fut: Future<Output = Result<D, FtpsError>>,
{
    let command = if remote_dir.is_empty() || remote_dir == "/" {
        "NLST".to_string()
    } else {
        format!("NLST {}", remote_dir)
    };
    let reply = control.exchange(&command).await?;
    if !reply.is_preliminary() {
        return Err(reply.into_transfer_error());
    }
    let mut data = data.await?;

    let mut raw = Vec::new();
    data.read_to_end(&mut raw).await.map_err(|e| {
        FtpsError::transfer(426, format!("data connection broke during listing: {}", e))
    })?;
    drop(data);

    let reply = control.read_reply().await?;
    if !reply.is_completion() {
        return Err(reply.into_transfer_error());
    }

    let names = split_listing(&String::from_utf8_lossy(&raw));
    info!("Listed {} entries", names.len());
    Ok(names)
}
