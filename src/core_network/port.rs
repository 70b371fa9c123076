use crate::core_network::control::ControlChannel;
use crate::error::FtpsError;
use log::{debug, info};
use std::net::{IpAddr, SocketAddr};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpListener, TcpStream};

/// Prepares an active mode (PORT) data connection: binds a listener on the
/// local side and advertises it to the server. The server dials in only
/// once it has accepted the following transfer command, so the accept is a
/// separate step ([`accept_data_connection`]).
///
/// `local_ip` is the address of the control connection, which is the
/// interface the server can reach us on; the port is auto-selected.
pub async fn prepare_port_listener<S>(
    control: &mut ControlChannel<S>,
    local_ip: IpAddr,
) -> Result<TcpListener, FtpsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let listener = TcpListener::bind(SocketAddr::new(local_ip, 0))
        .await
        .map_err(|e| FtpsError::Configuration {
            option: "active-mode",
            reason: format!("could not bind data listener: {}", e),
        })?;
    let addr = listener.local_addr()?;
    debug!("Active mode listener bound on {}", addr);

    let reply = control.exchange(&format_port_command(addr)?).await?;
    if !reply.is_completion() {
        return Err(reply.into_transfer_error());
    }
    Ok(listener)
}

/// Accepts the server's incoming data connection on the advertised listener.
pub async fn accept_data_connection(listener: TcpListener) -> Result<TcpStream, FtpsError> {
    let (data_stream, peer) = listener.accept().await.map_err(|e| {
        FtpsError::transfer(425, format!("can't open data connection: {}", e))
    })?;
    info!("Active mode data connection accepted from {}", peer);
    Ok(data_stream)
}

/// Formats `PORT h1,h2,h3,h4,p1,p2` for a local IPv4 endpoint.
pub fn format_port_command(addr: SocketAddr) -> Result<String, FtpsError> {
    let ip = match addr.ip() {
        IpAddr::V4(ip) => ip,
        IpAddr::V6(_) => {
            return Err(FtpsError::Configuration {
                option: "active-mode",
                reason: "PORT requires an IPv4 local address".to_string(),
            })
        }
    };
    let octets = ip.octets();
    Ok(format!(
        "PORT {},{},{},{},{},{}",
        octets[0],
        octets[1],
        octets[2],
        octets[3],
        addr.port() / 256,
        addr.port() % 256
    ))
}
