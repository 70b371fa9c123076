pub mod client;

pub use client::SecureFtpClient;

#[cfg(test)]
mod test_client;
