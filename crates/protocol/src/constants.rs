/// Status a server returns while the upload is still missing bytes.
///
/// Repurposed from "Permanent Redirect"; clients must not follow it.
pub const STATUS_RESUME_INCOMPLETE: u16 = 308;

/// Range unit used in both request and response headers.
pub const BYTES_UNIT: &str = "bytes";

/// Response header reporting the bytes the server has persisted.
pub const RANGE: &str = "range";
