pub mod control;
pub mod pasv;
pub mod port;

pub use control::{ControlChannel, Reply};

#[cfg(test)]
mod test_network;
