use crate::core_network::control::ControlChannel;
use crate::error::FtpsError;
use log::{debug, info};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;

/// Requests passive mode and dials the address the server advertises.
pub async fn open_pasv_connection<S>(
    control: &mut ControlChannel<S>,
) -> Result<TcpStream, FtpsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let reply = control.exchange("PASV").await?;
    if reply.code != 227 {
        return Err(reply.into_transfer_error());
    }

    let addr = parse_pasv_reply(&reply.message)?;
    debug!("PASV data connection target: {}", addr);

    let data_stream = TcpStream::connect(addr).await.map_err(|e| {
        FtpsError::transfer(425, format!("can't open data connection to {}: {}", addr, e))
    })?;
    info!("PASV data connection established with {}", addr);
    Ok(data_stream)
}

/// Parses the `227 Entering Passive Mode (h1,h2,h3,h4,p1,p2)` payload.
pub fn parse_pasv_reply(message: &str) -> Result<SocketAddr, FtpsError> {
    let start = message.find('(');
    let end = message.rfind(')');
    let inner = match (start, end) {
        (Some(s), Some(e)) if s < e => &message[s + 1..e],
        _ => {
            return Err(FtpsError::transfer(
                227,
                format!("unparsable PASV reply: {}", message),
            ))
        }
    };

    let parts: Result<Vec<u8>, _> = inner.split(',').map(|x| x.trim().parse::<u8>()).collect();
    let parts = parts.map_err(|_| {
        FtpsError::transfer(227, format!("unparsable PASV reply: {}", message))
    })?;
    if parts.len() != 6 {
        return Err(FtpsError::transfer(
            227,
            format!("unparsable PASV reply: {}", message),
        ));
    }

    let ip = IpAddr::V4(Ipv4Addr::new(parts[0], parts[1], parts[2], parts[3]));
    let port = (parts[4] as u16) << 8 | parts[5] as u16;
    Ok(SocketAddr::new(ip, port))
}
