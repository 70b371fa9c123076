use crate::error::FtpsError;
use log::warn;
use tokio::net::TcpStream;
use tokio_native_tls::TlsConnector;

pub type TlsStream = tokio_native_tls::TlsStream<TcpStream>;

/// Builds the TLS connector used for both the control and the data channel.
///
/// Peer-certificate and hostname verification are disabled: this client
/// targets endpoints with self-signed or internally issued certificates.
/// The channel is still encrypted, but the server identity is not checked.
pub fn insecure_connector() -> Result<TlsConnector, FtpsError> {
    warn!("TLS certificate verification is disabled for this session");
    let connector = native_tls::TlsConnector::builder()
        .danger_accept_invalid_certs(true)
        .danger_accept_invalid_hostnames(true)
        .build()
        .map_err(|e| FtpsError::SessionInit(format!("failed to build TLS connector: {}", e)))?;
    Ok(TlsConnector::from(connector))
}

/// Runs the TLS handshake over an established TCP stream.
pub async fn handshake(
    connector: &TlsConnector,
    domain: &str,
    stream: TcpStream,
) -> Result<TlsStream, native_tls::Error> {
    connector.connect(domain, stream).await
}
