//! FTP over implicit SSL/TLS client.
//!
//! A thin client for pushing and pulling files over FTPS in *implicit* mode:
//! the TLS handshake happens immediately on connect (port 990 by default),
//! before any FTP command is exchanged. Data connections are protected too
//! (`PROT P`).
//!
//! ```no_run
//! use ftps_client::{ClientConfig, SecureFtpClient};
//!
//! # async fn run() -> Result<(), ftps_client::FtpsError> {
//! let config = ClientConfig::new("alice", "s3cret", "ftp.example.com");
//! let mut client = SecureFtpClient::connect(config).await?;
//! client.upload("report.txt", b"hello").await?;
//! let names = client.list_files().await?;
//! client.quit().await;
//! # Ok(())
//! # }
//! ```
//!
//! Certificate verification is intentionally disabled (see
//! [`core_tls::insecure_connector`]); this client targets endpoints with
//! self-signed or otherwise unverifiable certificates.

pub mod config;
pub mod constants;
pub mod core_client;
pub mod core_ftpcommand;
pub mod core_network;
pub mod core_tls;
pub mod error;
pub mod helpers;

pub use config::ClientConfig;
pub use core_client::SecureFtpClient;
pub use error::FtpsError;
