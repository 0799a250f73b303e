use std::str;

use tracing::{debug, warn};

use crate::buffer::ResponseBuf;
use crate::catalog::{Catalog, Property, PropertyBinding};
use crate::constants::{KEY_CAPACITY, SCRATCH_CAPACITY};
use crate::protocol::framing;
use crate::protocol::urlencoded::PairDecoder;

use super::response::{
    self, BAD_REQUEST, CONTENT_TYPE_HTML, CONTENT_TYPE_JSON, INTERNAL_ERROR, NOT_FOUND, OK,
};
use super::{FallbackHandler, Outcome, RequestStatus};

/// A Woopsa server instance: the configured path prefix, the borrowed
/// catalog, the optional fallback handler and a fixed scratch workspace.
///
/// [`handle_request`](Self::handle_request) is self-contained per call; the
/// only cross-call state is the framing status the caller loops on via
/// [`check_request_complete`](Self::check_request_complete). The scratch
/// workspace is not re-entrant, which is why handling takes `&mut self`:
/// one invocation at a time per instance. Workers that serve connections
/// concurrently each own their own instance over the same catalog.
pub struct Server<'a> {
    prefix: &'a str,
    catalog: &'a Catalog<'a>,
    fallback: Option<&'a dyn FallbackHandler>,
    scratch: [u8; SCRATCH_CAPACITY],
}

impl<'a> Server<'a> {
    /// Record the configuration. No I/O happens here.
    pub fn new(
        prefix: &'a str,
        catalog: &'a Catalog<'a>,
        fallback: Option<&'a dyn FallbackHandler>,
    ) -> Self {
        Self {
            prefix,
            catalog,
            fallback,
            scratch: [0; SCRATCH_CAPACITY],
        }
    }

    /// Whether `input` currently holds a complete request. Pure and
    /// idempotent; call it after every recv until it reports complete,
    /// then hand the buffer to [`handle_request`](Self::handle_request).
    pub fn check_request_complete(&self, input: &[u8]) -> RequestStatus {
        framing::request_status(input)
    }

    /// Parse one complete request out of `input` and assemble the full
    /// HTTP response into `output`. Returns the outcome class and the
    /// response length (header bytes plus body bytes).
    ///
    /// The response is always complete and bounded by `output`'s capacity;
    /// if the capacity did not suffice, the response is replaced by a 500
    /// and the outcome is [`Outcome::OtherError`].
    pub fn handle_request(&mut self, input: &[u8], output: &mut [u8]) -> (Outcome, usize) {
        self.scratch.fill(0);
        let capacity = output.len();
        let mut out = ResponseBuf::new(output);
        let mut outcome = self.dispatch(input, &mut out);
        if out.truncated() {
            warn!(capacity, "response did not fit, replacing with 500");
            response::emit_error(&mut out, &INTERNAL_ERROR);
            outcome = Outcome::OtherError;
        }
        let len = out.len();
        (outcome, len)
    }

    fn dispatch(&mut self, input: &[u8], out: &mut ResponseBuf<'_>) -> Outcome {
        let Some(line) = framing::parse_request_line(input) else {
            warn!("unparsable request line");
            response::emit_error(out, &BAD_REQUEST);
            return Outcome::ClientRequestError;
        };
        let is_post = line.method == b"POST";

        let Some(tail) = line.target.strip_prefix(self.prefix.as_bytes()) else {
            return self.serve_fallback(line.target, is_post, out);
        };

        if tail.starts_with(b"meta") && !is_post {
            self.serve_meta(out)
        } else if let Some(name) = tail.strip_prefix(b"read/")
            && !is_post
        {
            self.serve_read(name, out)
        } else if let Some(name) = tail.strip_prefix(b"write/")
            && is_post
        {
            self.serve_write(name, input, out)
        } else if let Some(name) = tail.strip_prefix(b"invoke/")
            && is_post
        {
            self.serve_invoke(name, out)
        } else {
            debug!(path = %String::from_utf8_lossy(line.target), "no verb matched");
            response::emit_error(out, &NOT_FOUND);
            Outcome::ClientRequestError
        }
    }

    fn serve_meta(&self, out: &mut ResponseBuf<'_>) -> Outcome {
        debug!("serving catalog manifest");
        let envelope = response::begin_response(out, &OK, CONTENT_TYPE_JSON);
        let body_len = response::emit_meta(out, self.catalog);
        response::finish_response(out, &envelope, body_len);
        Outcome::Success
    }

    fn serve_read(&self, name: &[u8], out: &mut ResponseBuf<'_>) -> Outcome {
        let Some(property) = self.property_named(name) else {
            response::emit_error(out, &NOT_FOUND);
            return Outcome::ClientRequestError;
        };
        debug!(property = property.name, "serving read");
        let envelope = response::begin_response(out, &OK, CONTENT_TYPE_JSON);
        let body_len = response::emit_property_value(out, property);
        response::finish_response(out, &envelope, body_len);
        Outcome::Success
    }

    fn serve_write(&mut self, name: &[u8], input: &[u8], out: &mut ResponseBuf<'_>) -> Outcome {
        let Some(property) = self.property_named(name) else {
            response::emit_error(out, &NOT_FOUND);
            return Outcome::ClientRequestError;
        };
        if property.read_only {
            debug!(property = property.name, "rejecting write to read-only property");
            response::emit_error(out, &BAD_REQUEST);
            return Outcome::ClientRequestError;
        }

        // Hunt the form body for the `value` key; everything else is
        // ignored. The decoded payload lands in the scratch workspace.
        let mut decoder = PairDecoder::new(framing::body(input));
        let mut key = [0u8; KEY_CAPACITY];
        let mut payload_len = None;
        while let Some((key_len, value_len)) = decoder.next_pair(&mut key, &mut self.scratch) {
            if &key[..key_len] == b"value" {
                payload_len = Some(value_len);
                break;
            }
        }
        let Some(payload_len) = payload_len else {
            response::emit_error(out, &BAD_REQUEST);
            return Outcome::ClientRequestError;
        };

        if !store_value(property, &self.scratch[..payload_len]) {
            debug!(property = property.name, "write payload rejected");
            response::emit_error(out, &BAD_REQUEST);
            return Outcome::ClientRequestError;
        }

        debug!(property = property.name, "serving write");
        let envelope = response::begin_response(out, &OK, CONTENT_TYPE_JSON);
        let body_len = response::emit_property_value(out, property);
        response::finish_response(out, &envelope, body_len);
        Outcome::Success
    }

    fn serve_invoke(&self, name: &[u8], out: &mut ResponseBuf<'_>) -> Outcome {
        let method = str::from_utf8(name)
            .ok()
            .and_then(|n| self.catalog.find_method(n));
        let Some(method) = method else {
            response::emit_error(out, &NOT_FOUND);
            return Outcome::ClientRequestError;
        };
        debug!(method = method.name, "serving invoke");
        let envelope = response::begin_response(out, &OK, CONTENT_TYPE_JSON);
        let body_len = response::emit_method_result(out, method);
        response::finish_response(out, &envelope, body_len);
        Outcome::Success
    }

    fn serve_fallback(&self, target: &[u8], is_post: bool, out: &mut ResponseBuf<'_>) -> Outcome {
        let handler_and_path = match (self.fallback, str::from_utf8(target)) {
            (Some(handler), Ok(path)) => Some((handler, path)),
            _ => None,
        };
        let Some((handler, path)) = handler_and_path else {
            response::emit_error(out, &NOT_FOUND);
            return Outcome::ClientRequestError;
        };
        debug!(path, "delegating to fallback handler");
        let envelope = response::begin_response(out, &OK, CONTENT_TYPE_HTML);
        let body_len = handler.serve(path, is_post, out.spare_capacity_mut());
        if body_len == 0 {
            response::emit_error(out, &NOT_FOUND);
            return Outcome::ClientRequestError;
        }
        out.commit(body_len);
        response::finish_response(out, &envelope, body_len);
        Outcome::OtherResponse
    }

    fn property_named(&self, name: &[u8]) -> Option<&'a Property<'a>> {
        str::from_utf8(name)
            .ok()
            .and_then(|n| self.catalog.find_property(n))
    }
}

/// Coerce the decoded payload per the property's type and store it under
/// the cell's critical section. Returns false when the payload does not
/// coerce or does not fit; storage is unchanged in that case.
fn store_value(property: &Property<'_>, payload: &[u8]) -> bool {
    match property.binding {
        PropertyBinding::Logical(cell) => {
            cell.set(payload.eq_ignore_ascii_case(b"true"));
            true
        }
        PropertyBinding::Integer(cell) => match parse_text(payload).and_then(parse_i32) {
            Some(v) => {
                cell.set(v);
                true
            }
            None => false,
        },
        PropertyBinding::Real(cell) | PropertyBinding::TimeSpan(cell) => {
            match parse_text(payload).and_then(parse_f32) {
                Some(v) => {
                    cell.set(v);
                    true
                }
                None => false,
            }
        }
        PropertyBinding::DateTime(cell)
        | PropertyBinding::Text(cell)
        | PropertyBinding::Link(cell)
        | PropertyBinding::ResourceUrl(cell) => match parse_text(payload) {
            Some(s) => cell.with(|text| text.assign(s)),
            None => false,
        },
    }
}

fn parse_text(payload: &[u8]) -> Option<&str> {
    str::from_utf8(payload).ok()
}

fn parse_i32(text: &str) -> Option<i32> {
    text.trim().parse().ok()
}

fn parse_f32(text: &str) -> Option<f32> {
    text.trim().parse().ok()
}
