use crate::core_network::ControlChannel;
use crate::error::FtpsError;
use log::{debug, info};
use tokio::io::{AsyncRead, AsyncWrite};

/// Drives the session negotiation that follows the implicit TLS handshake:
/// greeting, USER/PASS, then the protection and transfer-type options.
///
/// A rejected option fails with `Configuration` naming the first option the
/// server refused, so callers see which setting broke instead of a generic
/// login failure.
pub async fn negotiate_session<S>(
    control: &mut ControlChannel<S>,
    username: &str,
    password: &str,
) -> Result<(), FtpsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let greeting = control.read_reply().await?;
    if !greeting.is_completion() {
        return Err(FtpsError::SessionInit(format!(
            "server refused session: [{}] {}",
            greeting.code, greeting.message
        )));
    }
    debug!("Server greeting: {}", greeting.message.lines().next().unwrap_or(""));

    // USER may complete on its own (230) or ask for a password (331).
    let reply = control.exchange(&format!("USER {}", username)).await?;
    match reply.code {
        230 => {}
        331 | 332 => {
            let reply = control.exchange(&format!("PASS {}", password)).await?;
            if !reply.is_completion() {
                return Err(FtpsError::Configuration {
                    option: "credentials",
                    reason: format!("[{}] {}", reply.code, reply.message),
                });
            }
        }
        _ => {
            return Err(FtpsError::Configuration {
                option: "credentials",
                reason: format!("[{}] {}", reply.code, reply.message),
            });
        }
    }
    info!("Authenticated as {}", username);

    // Require TLS on the data channel as well: PBSZ 0 then PROT P.
    let reply = control.exchange("PBSZ 0").await?;
    if !reply.is_completion() {
        return Err(FtpsError::Configuration {
            option: "protection-buffer-size",
            reason: format!("[{}] {}", reply.code, reply.message),
        });
    }
    let reply = control.exchange("PROT P").await?;
    if !reply.is_completion() {
        return Err(FtpsError::Configuration {
            option: "data-protection",
            reason: format!("[{}] {}", reply.code, reply.message),
        });
    }

    // Content is treated as opaque bytes throughout.
    let reply = control.exchange("TYPE I").await?;
    if !reply.is_completion() {
        return Err(FtpsError::Configuration {
            option: "transfer-type",
            reason: format!("[{}] {}", reply.code, reply.message),
        });
    }

    Ok(())
}

/// Re-applies the per-transfer options a previous operation may have
/// changed. Every transfer calls this so no operation depends on leftover
/// state from the one before it.
pub async fn reset_transfer_options<S>(control: &mut ControlChannel<S>) -> Result<(), FtpsError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let reply = control.exchange("TYPE I").await?;
    if !reply.is_completion() {
        return Err(FtpsError::Configuration {
            option: "transfer-type",
            reason: format!("[{}] {}", reply.code, reply.message),
        });
    }
    Ok(())
}
