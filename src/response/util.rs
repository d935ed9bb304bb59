use std::convert::TryFrom;
use std::time::SystemTime;

use httpdate::HttpDate;
use lazy_static::lazy_static;

use crate::common::{Header, HeaderField, HeaderFieldValue, HttpVersion, StatusCode};

lazy_static! {
    static ref SERVER_HEADER: Header = Header::from_bytes(b"Server", b"hostpage").unwrap();
    static ref DATE_HEADER_FIELD: HeaderField = HeaderField::try_from(&b"Date"[..]).unwrap();
    pub(super) static ref CONNECTION_CLOSE_HEADER: Header =
        Header::from_bytes(b"Connection", b"close").unwrap();
}

/// Transfer encoding used when sending the message.
/// Only supported encodings are listed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(super) enum TransferEncoding {
    Identity,
    Chunked,
}

pub(super) fn choose_transfer_encoding(
    status_code: StatusCode,
    http_version: HttpVersion,
    data_length: Option<usize>,
    chunked_threshold: usize,
) -> TransferEncoding {
    // HTTP/1.0 doesn't know chunked encoding
    if http_version <= HttpVersion::Version1_0 {
        return TransferEncoding::Identity;
    }

    // per RFC 7230 section 3.3.1 no Transfer-Encoding on 1xx and 204
    if status_code.0 < 200 || status_code.0 == 204 {
        return TransferEncoding::Identity;
    }

    // unknown or large bodies are streamed in chunks
    if data_length.map_or(true, |len| len >= chunked_threshold) {
        return TransferEncoding::Chunked;
    }

    TransferEncoding::Identity
}

/// `true` if a body must not be sent with `status_code`
#[inline]
pub(super) fn is_body_ignored_for_status(status_code: StatusCode) -> bool {
    matches!(status_code.0, 100..=199 | 204 | 205 | 304)
}

/// `Date` header with the current date and time
pub(super) fn date_header() -> Header {
    let date = HttpDate::from(SystemTime::now()).to_string();
    Header {
        field: DATE_HEADER_FIELD.clone(),
        value: HeaderFieldValue::try_from(date.as_bytes()).unwrap(),
    }
}

/// `Server` header of this crate
pub(super) fn server_header() -> Header {
    SERVER_HEADER.clone()
}

/// Sets `header` in `headers`; when `overwrite` an existing field is
/// replaced, otherwise the header is appended
pub(crate) fn set_header(headers: &mut Vec<Header>, header: Header, overwrite: bool) {
    if overwrite {
        if let Some(existing) = headers.iter_mut().find(|h| h.field == header.field) {
            existing.value = header.value;
            return;
        }
    }
    headers.push(header);
}

#[cfg(test)]
mod tests {
    use crate::common::{HttpVersion, StatusCode};

    use super::{choose_transfer_encoding, date_header, is_body_ignored_for_status,
        TransferEncoding};

    #[test]
    fn choose_transfer_encoding_test() {
        // HTTP/1.0 is always identity, even without a known length
        assert_eq!(
            choose_transfer_encoding(StatusCode(200), HttpVersion::Version1_0, None, 32_768),
            TransferEncoding::Identity
        );

        assert_eq!(
            choose_transfer_encoding(StatusCode(200), HttpVersion::Version1_1, Some(64), 32_768),
            TransferEncoding::Identity
        );

        assert_eq!(
            choose_transfer_encoding(StatusCode(200), HttpVersion::Version1_1, None, 32_768),
            TransferEncoding::Chunked
        );

        assert_eq!(
            choose_transfer_encoding(
                StatusCode(200),
                HttpVersion::Version1_1,
                Some(40_000),
                32_768
            ),
            TransferEncoding::Chunked
        );

        assert_eq!(
            choose_transfer_encoding(StatusCode(204), HttpVersion::Version1_1, None, 32_768),
            TransferEncoding::Identity
        );
    }

    #[test]
    fn is_body_ignored_test() {
        assert!(is_body_ignored_for_status(StatusCode(204)));
        assert!(is_body_ignored_for_status(StatusCode(304)));
        assert!(!is_body_ignored_for_status(StatusCode(200)));
        assert!(!is_body_ignored_for_status(StatusCode(404)));
    }

    #[test]
    fn date_header_test() {
        let header = date_header();
        assert_eq!(header.field.as_str(), "Date");
        // e.g. "Wed, 04 May 1983 11:17:00 GMT"
        assert_eq!(header.value.as_str().len(), 29);
        assert!(header.value.as_str().ends_with(" GMT"));
    }
}
