// src/constants.rs

/// Default port for FTP over implicit TLS.
pub const DEFAULT_IMPLICIT_TLS_PORT: u16 = 990;

/// Overall per-operation timeout applied when the config does not override it.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Chunk size for streaming data-channel reads and writes.
pub const DATA_BUFFER_SIZE: usize = 8192;
