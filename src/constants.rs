//! Compile-time capacities and wire constants.

/// Workspace for one URL-decoded form value. Bounds the longest value a
/// client can write to a string property in a single request.
pub const SCRATCH_CAPACITY: usize = 256;

/// Decoded form keys are short (`value`); longer keys are truncated and
/// can therefore never match.
pub const KEY_CAPACITY: usize = 16;

/// Width of the Content-Length slot reserved in the response envelope and
/// patched in place once the body size is known.
pub const CONTENT_LENGTH_FIELD_WIDTH: usize = 8;

pub const REQUEST_BUFFER_CAPACITY: usize = 8 * 1024;
pub const RESPONSE_BUFFER_CAPACITY: usize = 32 * 1024;

pub const INITIAL_ACCEPTS_PER_WORKER: usize = 8;

pub const DEFAULT_PATH_PREFIX: &str = "/woopsa/";
