use memchr::memmem;

use crate::constants::REQUEST_BUFFER_CAPACITY;
use crate::server::RequestStatus;

/// Fixed-capacity accumulation buffer for an incoming request.
///
/// The transport recvs directly into the free tail and the parsing
/// functions below operate on the accumulated window. One request per
/// connection (`Connection: close`), so there is no consume/compact cycle:
/// the buffer is reset between connections.
pub struct RecvBuf {
    buf: Vec<u8>,
    end: usize,
}

impl RecvBuf {
    pub fn with_capacity(cap: usize) -> Self {
        Self {
            buf: vec![0; cap],
            end: 0,
        }
    }

    pub fn new() -> Self {
        Self::with_capacity(REQUEST_BUFFER_CAPACITY)
    }

    /// Pointer and length for the next recv operation.
    pub fn write_ptr_len(&mut self) -> (*mut u8, usize) {
        let free = self.buf.len() - self.end;
        (unsafe { self.buf.as_mut_ptr().add(self.end) }, free)
    }

    /// Mark that `n` bytes were written to the buffer.
    pub fn wrote(&mut self, n: usize) {
        self.end = (self.end + n).min(self.buf.len());
    }

    /// The accumulated window.
    pub fn window(&self) -> &[u8] {
        &self.buf[..self.end]
    }

    pub fn is_full(&self) -> bool {
        self.end == self.buf.len()
    }

    pub fn reset(&mut self) {
        self.end = 0;
    }
}

impl Default for RecvBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// First line of the request: leading word and the next space-delimited
/// word. Everything after the target (protocol version, headers) is the
/// dispatcher's to skip.
pub struct RequestLine<'a> {
    pub method: &'a [u8],
    pub target: &'a [u8],
}

pub fn parse_request_line(buf: &[u8]) -> Option<RequestLine<'_>> {
    let line_end = memmem::find(buf, b"\r\n")?;
    let mut words = buf[..line_end].split(|&b| b == b' ').filter(|w| !w.is_empty());
    let method = words.next()?;
    let target = words.next()?;
    Some(RequestLine { method, target })
}

/// Iterator over CRLF-delimited lines of a header block, request line
/// included. A CR not followed by LF is not a terminator; scanning simply
/// continues past it. Stops at the empty line or when the block runs out.
pub struct HeaderLines<'a> {
    rest: &'a [u8],
}

impl<'a> HeaderLines<'a> {
    pub fn new(block: &'a [u8]) -> Self {
        Self { rest: block }
    }
}

impl<'a> Iterator for HeaderLines<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        if self.rest.starts_with(b"\r\n") {
            return None;
        }
        let end = memmem::find(self.rest, b"\r\n")?;
        let line = &self.rest[..end];
        self.rest = &self.rest[end + 2..];
        Some(line)
    }
}

/// Extract the Content-Length announced anywhere in the header block.
/// A header with a malformed value counts as absent.
pub fn content_length(block: &[u8]) -> Option<usize> {
    for line in HeaderLines::new(block) {
        let Some(colon) = line.iter().position(|&b| b == b':') else {
            continue;
        };
        let (name, value) = line.split_at(colon);
        if ascii_equals_ignore_case(trim_ascii_whitespace(name), b"content-length") {
            return parse_usize_decimal_strict(&value[1..]);
        }
    }
    None
}

/// Pure completeness predicate over a partially received buffer.
///
/// With no Content-Length announced, the request is complete as soon as the
/// header terminator is present. Otherwise the bytes after the terminator
/// must equal the announced length. Idempotent; never writes to the input.
pub fn request_status(buf: &[u8]) -> RequestStatus {
    let Some(pos) = memmem::find(buf, b"\r\n\r\n") else {
        return RequestStatus::NeedMore;
    };
    let announced = content_length(&buf[..pos + 2]).unwrap_or(0);
    if announced == 0 || buf.len() - (pos + 4) == announced {
        RequestStatus::Complete
    } else {
        RequestStatus::NeedMore
    }
}

/// The bytes after the header terminator; empty when the terminator has not
/// arrived yet.
pub fn body(buf: &[u8]) -> &[u8] {
    match memmem::find(buf, b"\r\n\r\n") {
        Some(pos) => &buf[pos + 4..],
        None => &[],
    }
}

#[inline]
fn ascii_equals_ignore_case(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).all(|(&x, &y)| x.eq_ignore_ascii_case(&y))
}

#[inline]
fn trim_ascii_whitespace(mut bytes: &[u8]) -> &[u8] {
    while !bytes.is_empty() && (bytes[0] == b' ' || bytes[0] == b'\t') {
        bytes = &bytes[1..];
    }
    while !bytes.is_empty() && (bytes[bytes.len() - 1] == b' ' || bytes[bytes.len() - 1] == b'\t') {
        bytes = &bytes[..bytes.len() - 1];
    }
    bytes
}

#[inline]
fn parse_usize_decimal_strict(input: &[u8]) -> Option<usize> {
    let trimmed = trim_ascii_whitespace(input);
    if trimmed.is_empty() {
        return None;
    }
    let mut value: usize = 0;
    for &ch in trimmed {
        if !ch.is_ascii_digit() {
            return None;
        }
        let digit = (ch - b'0') as usize;
        value = value.checked_mul(10)?.checked_add(digit)?;
    }
    Some(value)
}
