pub mod decoder;
pub mod runtime;
pub mod server;
