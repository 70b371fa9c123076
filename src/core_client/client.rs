use crate::config::ClientConfig;
use crate::core_ftpcommand::{login, nlst, retr, size, stor};
use crate::core_network::{pasv, port, ControlChannel};
use crate::core_tls::{self, TlsStream};
use crate::error::FtpsError;
use crate::helpers::{join_url, local_target, remote_path};
use log::{debug, info};
use std::io::{Cursor, SeekFrom};
use std::net::IpAddr;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::time;
use tokio_native_tls::TlsConnector;

/// A pending data connection: passive mode dials the server up front,
/// active mode keeps a listener the server dials back on once it has
/// accepted the transfer command.
pub(crate) enum DataSetup {
    Passive(TcpStream),
    Active(TcpListener),
}

/// Client handle for one FTP-over-implicit-TLS session.
///
/// One authenticated control connection, many sequential operations: every
/// operation takes `&mut self`, re-applies the transfer options it depends
/// on, and opens its own data connection, so no call inherits state from
/// the one before it.
///
/// Dropping the client closes the session; [`quit`](Self::quit) does the
/// same with a protocol goodbye first. Teardown failures are never
/// surfaced.
pub struct SecureFtpClient {
    control: ControlChannel<TlsStream>,
    connector: TlsConnector,
    config: ClientConfig,
    base_url: String,
    local_ip: IpAddr,
}

impl SecureFtpClient {
    /// Connects to the server, runs the implicit TLS handshake and
    /// negotiates the session (login, data-channel protection, binary
    /// transfer type).
    ///
    /// Fails with `InvalidArgument` before touching the network when the
    /// config does not validate, with `SessionInit` when the endpoint
    /// cannot be reached, and with `Configuration` naming the first
    /// session option the server refused.
    pub async fn connect(config: ClientConfig) -> Result<Self, FtpsError> {
        config.validate()?;
        let base_url = config.base_url();
        let timeout = config.timeout();
        let connector = core_tls::insecure_connector()?;

        info!("Connecting to {}:{} (implicit TLS)", config.server, config.port);
        let tcp = time::timeout(
            timeout,
            TcpStream::connect((config.server.as_str(), config.port)),
        )
        .await
        .map_err(|_| {
            FtpsError::SessionInit(format!(
                "connection to {}:{} timed out",
                config.server, config.port
            ))
        })?
        .map_err(|e| {
            FtpsError::SessionInit(format!(
                "could not connect to {}:{}: {}",
                config.server, config.port, e
            ))
        })?;
        let local_ip = tcp.local_addr()?.ip();

        let tls = time::timeout(timeout, core_tls::handshake(&connector, &config.server, tcp))
            .await
            .map_err(|_| FtpsError::SessionInit("TLS handshake timed out".to_string()))?
            .map_err(|e| FtpsError::SessionInit(format!("TLS handshake failed: {}", e)))?;

        let mut control = ControlChannel::new(tls);
        time::timeout(
            timeout,
            login::negotiate_session(&mut control, &config.username, &config.password),
        )
        .await
        .map_err(|_| FtpsError::timed_out("session negotiation"))??;

        Ok(Self {
            control,
            connector,
            config,
            base_url,
            local_ip,
        })
    }

    /// The directory this session operates in: `ftps://{server}/{initial_path}`.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Uploads `file` as `file_name` under the base directory.
    ///
    /// The content is staged into an in-memory seekable buffer and rewound
    /// before sending; the buffer is released when the call returns,
    /// whatever the outcome.
    pub async fn upload(&mut self, file_name: &str, file: &[u8]) -> Result<(), FtpsError> {
        let url = join_url(&self.base_url, file_name);
        debug!("Uploading {} bytes to {}", file.len(), url);

        let mut buffer = Cursor::new(Vec::with_capacity(file.len()));
        std::io::Write::write_all(&mut buffer, file)?;
        std::io::Seek::seek(&mut buffer, SeekFrom::Start(0))?;

        let timeout = self.config.timeout();
        let SecureFtpClient {
            control,
            connector,
            config,
            local_ip,
            ..
        } = self;
        let remote = remote_path(&config.initial_path, file_name);

        let op = async {
            login::reset_transfer_options(control).await?;
            let setup = prepare_data_setup(control, config.passive_mode, *local_ip).await?;
            let data = establish(setup, connector, &config.server);
            stor::send_stor(control, data, &remote, &mut buffer).await?;
            Ok(())
        };
        time::timeout(timeout, op)
            .await
            .map_err(|_| FtpsError::timed_out("upload"))?
    }

    /// Lists the file names in the base directory, in server-reported
    /// order. An empty directory yields an empty vector.
    pub async fn list_files(&mut self) -> Result<Vec<String>, FtpsError> {
        debug!("Listing {}", self.base_url);

        let timeout = self.config.timeout();
        let SecureFtpClient {
            control,
            connector,
            config,
            local_ip,
            ..
        } = self;
        let dir = match config.initial_path.trim_matches('/') {
            "" => String::new(),
            d => format!("/{}", d),
        };

        let op = async {
            login::reset_transfer_options(control).await?;
            let setup = prepare_data_setup(control, config.passive_mode, *local_ip).await?;
            let data = establish(setup, connector, &config.server);
            nlst::send_nlst(control, data, &dir).await
        };
        time::timeout(timeout, op)
            .await
            .map_err(|_| FtpsError::timed_out("listing"))?
    }

    /// Downloads `file_name` from the base directory, writing the content
    /// to `{local_path}/{file_name}` while also returning it.
    ///
    /// The local file is created up front (`Io` when that fails) and closed
    /// when the call returns, whatever the outcome of the transfer.
    pub async fn download(
        &mut self,
        file_name: &str,
        local_path: &str,
    ) -> Result<Vec<u8>, FtpsError> {
        let target = local_target(local_path, file_name);
        debug!("Downloading {} to {}", join_url(&self.base_url, file_name), target);

        let mut local_file = File::create(&target).await?;

        let timeout = self.config.timeout();
        let SecureFtpClient {
            control,
            connector,
            config,
            local_ip,
            ..
        } = self;
        let remote = remote_path(&config.initial_path, file_name);

        let op = async {
            login::reset_transfer_options(control).await?;
            let setup = prepare_data_setup(control, config.passive_mode, *local_ip).await?;
            let data = establish(setup, connector, &config.server);
            retr::send_retr(control, data, &remote, &mut local_file).await
        };
        let result = time::timeout(timeout, op)
            .await
            .map_err(|_| FtpsError::timed_out("download"));

        // The local target is closed on every path; a flush failure only
        // matters when the transfer itself succeeded.
        match result {
            Ok(Ok(content)) => {
                local_file.flush().await?;
                Ok(content)
            }
            Ok(Err(e)) | Err(e) => {
                let _ = local_file.flush().await;
                Err(e)
            }
        }
    }

    /// Probes the size of `file_name` without transferring it.
    ///
    /// Returns [`SIZE_UNKNOWN`](crate::core_ftpcommand::size::SIZE_UNKNOWN)
    /// when the server cannot report a length; callers must treat
    /// non-positive values as "unknown", not as an empty file.
    pub async fn remote_file_size(&mut self, file_name: &str) -> Result<i64, FtpsError> {
        let remote = remote_path(&self.config.initial_path, file_name);
        time::timeout(
            self.config.timeout(),
            size::send_size(&mut self.control, &remote),
        )
        .await
        .map_err(|_| FtpsError::timed_out("size probe"))?
    }

    /// Says goodbye and releases the session. Nothing can be done about
    /// teardown failures, so they are logged and swallowed.
    pub async fn quit(self) {
        let mut control = self.control;
        if let Err(e) = control.exchange("QUIT").await {
            debug!("QUIT failed (ignored): {}", e);
        }
        let mut stream = control.into_inner();
        if let Err(e) = stream.shutdown().await {
            debug!("Session shutdown failed (ignored): {}", e);
        }
    }
}

/// Opens the data-connection setup the configured mode calls for: PASV
/// dials the server's advertised address, PORT advertises a local listener.
pub(crate) async fn prepare_data_setup<S>(
    control: &mut ControlChannel<S>,
    passive_mode: bool,
    local_ip: IpAddr,
) -> Result<DataSetup, FtpsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    if passive_mode {
        let stream = pasv::open_pasv_connection(control).await?;
        Ok(DataSetup::Passive(stream))
    } else {
        let listener = port::prepare_port_listener(control, local_ip).await?;
        Ok(DataSetup::Active(listener))
    }
}

/// Completes a prepared data connection and wraps it in TLS (`PROT P`
/// covers the data channel too).
async fn establish(
    setup: DataSetup,
    connector: &TlsConnector,
    domain: &str,
) -> Result<TlsStream, FtpsError> {
    let tcp = match setup {
        DataSetup::Passive(stream) => stream,
        DataSetup::Active(listener) => port::accept_data_connection(listener).await?,
    };
    core_tls::handshake(connector, domain, tcp)
        .await
        .map_err(|e| {
            FtpsError::transfer(425, format!("TLS handshake on data connection failed: {}", e))
        })
}
