pub use content_type::ContentType;
pub use header::{Header, HeaderError, HeaderField, HeaderFieldValue};
pub use http_version::{HttpVersion, HttpVersionError};
pub use method::Method;
pub use status_code::StatusCode;

mod content_type;
mod header;
mod http_version;
mod method;
mod status_code;
