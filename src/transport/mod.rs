//! Socket-facing side of the server: an io_uring event loop that feeds the
//! request engine.
//!
//! The engine itself never touches a socket; this module is the reference
//! transport around it:
//! - `SO_REUSEPORT` listener construction, one listener per worker
//! - a connection pool reusing buffers across connections
//! - SQE submission helpers with (connection, op) tagged user_data
//! - the worker reactor driving accept -> recv -> handle -> send -> close

pub mod config;
pub mod conn;
pub mod socket;
pub mod uring_ops;
pub mod user_data;
pub mod worker;

pub use config::WorkerConfig;
pub use conn::{Connection, ConnectionPool};
pub use socket::make_listener;
pub use worker::run_worker;
