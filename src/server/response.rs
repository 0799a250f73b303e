//! Response assembly: the HTTP envelope with its patched Content-Length
//! slot, and the JSON renderings of typed values and the catalog manifest.

use crate::buffer::ResponseBuf;
use crate::catalog::{Catalog, Entry, Method, MethodThunk, Property, PropertyBinding, ValueType};
use crate::constants::CONTENT_LENGTH_FIELD_WIDTH;

pub(crate) struct Status {
    pub code: &'static str,
    pub reason: &'static str,
}

pub(crate) const OK: Status = Status {
    code: "200",
    reason: "OK",
};
pub(crate) const BAD_REQUEST: Status = Status {
    code: "400",
    reason: "Bad request",
};
pub(crate) const NOT_FOUND: Status = Status {
    code: "404",
    reason: "Not found",
};
pub(crate) const INTERNAL_ERROR: Status = Status {
    code: "500",
    reason: "Internal server error",
};

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";
pub(crate) const CONTENT_TYPE_HTML: &str = "text/html";

/// Remembers where the Content-Length slot was reserved so it can be
/// patched once the body size is known.
pub(crate) struct Envelope {
    content_length_at: usize,
}

/// Write the response envelope: status line, content type, the fixed
/// cross-origin and connection headers, a Content-Length slot of eight
/// spaces, and the blank line. The body follows immediately after.
pub(crate) fn begin_response(
    out: &mut ResponseBuf<'_>,
    status: &Status,
    content_type: &str,
) -> Envelope {
    out.append(b"HTTP/1.1 ");
    out.append(status.code.as_bytes());
    out.append(b" ");
    out.append(status.reason.as_bytes());
    out.append(b"\r\n");
    out.append(b"Content-Type: ");
    out.append(content_type.as_bytes());
    out.append(b"\r\n");
    out.append(b"Access-Control-Allow-Origin: *\r\n");
    out.append(b"Connection: close\r\n");
    out.append(b"Content-Length:");
    let content_length_at = out.len();
    out.append(b"        \r\n");
    out.append(b"\r\n");
    Envelope { content_length_at }
}

/// Patch the reserved slot with the exact body byte count. The slot is
/// rewritten in place; the CR terminating the header line is untouched.
pub(crate) fn finish_response(out: &mut ResponseBuf<'_>, envelope: &Envelope, body_len: usize) {
    out.patch_padded_usize(envelope.content_length_at, CONTENT_LENGTH_FIELD_WIDTH, body_len);
}

/// Replace whatever is in the buffer with a complete error response whose
/// body is the reason phrase itself.
pub(crate) fn emit_error(out: &mut ResponseBuf<'_>, status: &Status) {
    out.reset();
    let envelope = begin_response(out, status, CONTENT_TYPE_JSON);
    let body_len = out.append(status.reason.as_bytes());
    finish_response(out, &envelope, body_len);
}

/// `{"Value":<v>,"Type":"<name>"}` around a caller-supplied value
/// rendering. Returns the intended body length.
fn emit_value_object<'b>(
    out: &mut ResponseBuf<'b>,
    value_type: ValueType,
    emit_value: impl FnOnce(&mut ResponseBuf<'b>) -> usize,
) -> usize {
    let mut n = out.append(b"{\"Value\":");
    n += emit_value(out);
    n += out.append(b",\"Type\":\"");
    n += out.append(value_type.wire_name().as_bytes());
    n += out.append(b"\"}");
    n
}

fn emit_quoted(out: &mut ResponseBuf<'_>, bytes: &[u8]) -> usize {
    let mut n = out.append(b"\"");
    n += out.append_escaped(bytes, b'"', b'\\');
    n += out.append(b"\"");
    n
}

/// The value response for a property's current contents. Each storage
/// access holds the cell's critical section for exactly one value's worth
/// of work.
pub(crate) fn emit_property_value(out: &mut ResponseBuf<'_>, property: &Property<'_>) -> usize {
    let value_type = property.binding.value_type();
    match property.binding {
        PropertyBinding::Logical(cell) => emit_value_object(out, value_type, |out| {
            out.append(if cell.get() { "true" } else { "false" }.as_bytes())
        }),
        PropertyBinding::Integer(cell) => emit_value_object(out, value_type, |out| {
            out.append_fmt(format_args!("{}", cell.get()))
        }),
        PropertyBinding::Real(cell) | PropertyBinding::TimeSpan(cell) => {
            emit_value_object(out, value_type, |out| {
                out.append_fmt(format_args!("{:.6}", cell.get()))
            })
        }
        PropertyBinding::DateTime(cell)
        | PropertyBinding::Text(cell)
        | PropertyBinding::Link(cell)
        | PropertyBinding::ResourceUrl(cell) => emit_value_object(out, value_type, |out| {
            cell.with(|text| emit_quoted(out, text.as_str().as_bytes()))
        }),
    }
}

/// Invoke a method and render its result. A void method produces an empty
/// body.
pub(crate) fn emit_method_result(out: &mut ResponseBuf<'_>, method: &Method<'_>) -> usize {
    match method.thunk {
        MethodThunk::Void(f) => {
            f();
            0
        }
        MethodThunk::Integer(f) => emit_value_object(out, method.return_type, |out| {
            out.append_fmt(format_args!("{}", f()))
        }),
        MethodThunk::Real(f) => emit_value_object(out, method.return_type, |out| {
            out.append_fmt(format_args!("{:.6}", f()))
        }),
        MethodThunk::Text(f) => {
            let value = f();
            emit_value_object(out, method.return_type, |out| {
                emit_quoted(out, value.as_bytes())
            })
        }
    }
}

/// The catalog manifest: properties and methods in declaration order,
/// commas between elements only.
pub(crate) fn emit_meta(out: &mut ResponseBuf<'_>, catalog: &Catalog<'_>) -> usize {
    let mut n = out.append(b"{\"Name\":\"Root\",\"Properties\":[");
    let mut first = true;
    for entry in catalog.entries() {
        let Entry::Property(property) = entry else {
            continue;
        };
        if !first {
            n += out.append(b",");
        }
        first = false;
        n += out.append(b"{\"Name\":\"");
        n += out.append_escaped(property.name.as_bytes(), b'"', b'\\');
        n += out.append(b"\",\"Type\":\"");
        n += out.append(property.binding.value_type().wire_name().as_bytes());
        n += out.append(b"\",\"ReadOnly\":");
        n += out.append(if property.read_only { "true" } else { "false" }.as_bytes());
        n += out.append(b"}");
    }
    n += out.append(b"],\"Methods\":[");
    first = true;
    for entry in catalog.entries() {
        let Entry::Method(method) = entry else {
            continue;
        };
        if !first {
            n += out.append(b",");
        }
        first = false;
        n += out.append(b"{\"Name\":\"");
        n += out.append_escaped(method.name.as_bytes(), b'"', b'\\');
        n += out.append(b"\",\"ReturnType\":\"");
        n += out.append(method.return_type.wire_name().as_bytes());
        n += out.append(b"\",\"ArgumentInfos\":[]}");
    }
    n += out.append(b"],\"Items\":[]}");
    n
}
