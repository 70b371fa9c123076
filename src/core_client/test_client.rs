// Tests for client construction rules and data-connection mode selection.

#[cfg(test)]
mod tests {
    use crate::config::ClientConfig;
    use crate::core_client::client::{prepare_data_setup, DataSetup};
    use crate::core_client::SecureFtpClient;
    use crate::core_network::ControlChannel;
    use crate::error::FtpsError;
    use std::net::{IpAddr, Ipv4Addr};
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_rejects_blank_username_before_touching_network() {
        let config = ClientConfig::new("", "pw", "ftp.example.com");
        let err = SecureFtpClient::connect(config).await.err().unwrap();
        assert!(matches!(err, FtpsError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_connect_rejects_blank_server() {
        let config = ClientConfig::new("alice", "pw", "");
        let err = SecureFtpClient::connect(config).await.err().unwrap();
        assert!(matches!(err, FtpsError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_connect_rejects_zero_port() {
        let mut config = ClientConfig::new("alice", "pw", "ftp.example.com");
        config.port = 0;
        let err = SecureFtpClient::connect(config).await.err().unwrap();
        assert!(matches!(err, FtpsError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_connect_refused_is_session_init() {
        // Grab a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut config = ClientConfig::new("alice", "pw", "127.0.0.1");
        config.port = port;
        config.timeout_secs = 5;
        let err = SecureFtpClient::connect(config).await.err().unwrap();
        assert!(matches!(err, FtpsError::SessionInit(_)));
    }

    #[tokio::test]
    async fn test_passive_flag_selects_pasv() {
        // Real listener standing in for the server's advertised data port.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let data_port = listener.local_addr().unwrap().port();

        let (client, server) = tokio::io::duplex(1024);
        let mut control = ControlChannel::new(client);

        let script = tokio::spawn(async move {
            let mut peer = BufReader::new(server);
            let mut line = String::new();
            peer.read_line(&mut line).await.unwrap();
            assert_eq!(line.trim_end(), "PASV");
            let reply = format!(
                "227 Entering Passive Mode (127,0,0,1,{},{}).\r\n",
                data_port / 256,
                data_port % 256
            );
            peer.get_mut().write_all(reply.as_bytes()).await.unwrap();
            // Complete the dial-in so the client side resolves.
            listener.accept().await.unwrap();
        });

        let setup = prepare_data_setup(
            &mut control,
            true,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        )
        .await
        .unwrap();
        assert!(matches!(setup, DataSetup::Passive(_)));
        script.await.unwrap();
    }

    #[tokio::test]
    async fn test_active_flag_selects_port() {
        let (client, server) = tokio::io::duplex(1024);
        let mut control = ControlChannel::new(client);

        let script = tokio::spawn(async move {
            let mut peer = BufReader::new(server);
            let mut line = String::new();
            peer.read_line(&mut line).await.unwrap();
            assert!(
                line.starts_with("PORT 127,0,0,1,"),
                "expected a PORT advertisement, got {:?}",
                line
            );
            peer.get_mut()
                .write_all(b"200 Command okay.\r\n")
                .await
                .unwrap();
        });

        let setup = prepare_data_setup(
            &mut control,
            false,
            IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
        )
        .await
        .unwrap();
        assert!(matches!(setup, DataSetup::Active(_)));
        script.await.unwrap();
    }
}
