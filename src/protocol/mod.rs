//! Wire-level parsing: HTTP/1.1 request framing and URL-form decoding.
//!
//! Everything here is zero-copy or bounded-copy over caller buffers; no
//! parsing path allocates.

pub mod framing;
pub mod urlencoded;

pub use framing::{HeaderLines, RecvBuf, RequestLine};
pub use urlencoded::PairDecoder;
