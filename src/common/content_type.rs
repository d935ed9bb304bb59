use std::convert::TryFrom;

use crate::common::{Header, HeaderField, HeaderFieldValue};

/// `Content-Type` values the page handler produces
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum ContentType {
    /// `text/html`
    TextHtml,
    /// `text/plain`
    TextPlain,
}

impl ContentType {
    /// The mime type as `&str`
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TextHtml => "text/html",
            Self::TextPlain => "text/plain",
        }
    }
}

impl From<ContentType> for Header {
    fn from(content_type: ContentType) -> Self {
        Header {
            field: HeaderField::try_from(&b"Content-Type"[..]).unwrap(),
            value: HeaderFieldValue::try_from(content_type.as_str().as_bytes()).unwrap(),
        }
    }
}
