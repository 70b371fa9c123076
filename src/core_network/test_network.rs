// Tests for the control-channel engine and data-connection helpers.

#[cfg(test)]
mod tests {
    use crate::core_network::control::ControlChannel;
    use crate::core_network::pasv::parse_pasv_reply;
    use crate::core_network::port::format_port_command;
    use crate::error::FtpsError;
    use std::net::SocketAddr;
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_single_line_reply() {
        let (client, mut server) = tokio::io::duplex(1024);
        server.write_all(b"220 Welcome\r\n").await.unwrap();

        let mut control = ControlChannel::new(client);
        let reply = control.read_reply().await.unwrap();
        assert_eq!(reply.code, 220);
        assert_eq!(reply.message, "Welcome");
        assert!(reply.is_completion());
    }

    #[tokio::test]
    async fn test_multi_line_reply() {
        let (client, mut server) = tokio::io::duplex(1024);
        server
            .write_all(b"230-Logged in\r\nsome banner text\r\n230 Proceed\r\n")
            .await
            .unwrap();

        let mut control = ControlChannel::new(client);
        let reply = control.read_reply().await.unwrap();
        assert_eq!(reply.code, 230);
        assert_eq!(reply.message, "Logged in\nsome banner text\nProceed");
    }

    #[tokio::test]
    async fn test_malformed_reply() {
        let (client, mut server) = tokio::io::duplex(1024);
        server.write_all(b"garbage\r\n").await.unwrap();

        let mut control = ControlChannel::new(client);
        let err = control.read_reply().await.unwrap_err();
        assert!(matches!(err, FtpsError::Transfer { code: 0, .. }));
    }

    #[tokio::test]
    async fn test_closed_connection_is_io_error() {
        let (client, server) = tokio::io::duplex(1024);
        drop(server);

        let mut control = ControlChannel::new(client);
        let err = control.read_reply().await.unwrap_err();
        assert!(matches!(err, FtpsError::Io(_)));
    }

    #[tokio::test]
    async fn test_exchange_writes_crlf_terminated_command() {
        let (client, server) = tokio::io::duplex(1024);
        let mut control = ControlChannel::new(client);

        let server_task = tokio::spawn(async move {
            let mut server = ControlChannel::new(server);
            // Read the command back through the same line engine.
            server.send_command("200 Command okay.").await.ok();
            server
        });

        let reply = control.exchange("NOOP").await.unwrap();
        assert_eq!(reply.code, 200);
        server_task.await.unwrap();
    }

    #[test]
    fn test_parse_pasv_reply() {
        let addr = parse_pasv_reply("Entering Passive Mode (192,168,1,10,4,1).").unwrap();
        assert_eq!(addr, "192.168.1.10:1025".parse::<SocketAddr>().unwrap());
    }

    #[test]
    fn test_parse_pasv_reply_rejects_garbage() {
        assert!(parse_pasv_reply("Entering Passive Mode").is_err());
        assert!(parse_pasv_reply("(1,2,3)").is_err());
        assert!(parse_pasv_reply("(1,2,3,4,5,x)").is_err());
    }

    #[test]
    fn test_format_port_command() {
        let addr: SocketAddr = "10.0.0.2:1026".parse().unwrap();
        assert_eq!(
            format_port_command(addr).unwrap(),
            "PORT 10,0,0,2,4,2"
        );
    }

    #[test]
    fn test_format_port_command_rejects_ipv6() {
        let addr: SocketAddr = "[::1]:1026".parse().unwrap();
        assert!(matches!(
            format_port_command(addr),
            Err(FtpsError::Configuration { option: "active-mode", .. })
        ));
    }
}
