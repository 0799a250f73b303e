//! Embeddable server for the Woopsa object-access protocol.
//!
//! A Woopsa server exposes a fixed catalog of named, typed properties and
//! nullary methods over plain HTTP/1.1. Clients discover the catalog
//! (`meta`), read and write properties (`read/<name>`, `write/<name>`) and
//! invoke methods (`invoke/<name>`), receiving JSON-encoded typed values.
//!
//! The request engine ([`server::Server`]) is transport-agnostic: it parses
//! a complete request out of a caller-provided byte buffer and assembles the
//! full HTTP response into a second caller-provided buffer, allocating
//! nothing on the way. The [`transport`] module provides an io_uring event
//! loop that feeds the engine from real sockets; see `src/main.rs` for a
//! complete server wired up with a demo catalog.

pub mod catalog;
pub mod constants;
pub mod protocol;
pub mod server;
pub mod transport;

mod buffer;
mod util;

pub use catalog::{Catalog, Entry, MethodThunk, PropertyBinding, SharedCell, TextValue, ValueType};
pub use server::{FallbackHandler, Outcome, RequestStatus, Server};
