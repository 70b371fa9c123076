// SSL/TLS support for the FTPS client (implicit mode: the handshake runs
// before any FTP command is exchanged).

pub mod connector;

pub use connector::{handshake, insecure_connector, TlsStream};
