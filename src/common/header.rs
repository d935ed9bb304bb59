use std::{
    convert::TryFrom,
    hash::{Hash, Hasher},
    str::FromStr,
};

use ascii::{AsAsciiStrError, AsciiStr, AsciiString};

/// Represents an HTTP header line.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Header {
    /// Field name, e.g. `Content-Type`
    pub field: HeaderField,
    /// Value belonging to `field`
    pub value: HeaderFieldValue,
}

impl Header {
    /// Builds a `Header` from a field and a value in bytes.
    ///
    /// # Errors
    ///
    /// [`HeaderError`] when field or value contain bytes outside the
    /// ranges RFC 9110 allows.
    ///
    /// # Example
    ///
    /// ```
    /// let header = hostpage::Header::from_bytes(b"Content-Type", b"text/html").unwrap();
    /// ```
    pub fn from_bytes<F, V>(field: F, value: V) -> Result<Header, HeaderError>
    where
        F: AsRef<[u8]>,
        V: AsRef<[u8]>,
    {
        let field = HeaderField::try_from(field.as_ref())?;
        let value = HeaderFieldValue::try_from(value.as_ref())?;

        Ok(Header { field, value })
    }

    /// `true` if `field` is managed by the response writer and must not be
    /// set by application code
    #[inline]
    pub(crate) fn is_reserved(field: &HeaderField) -> bool {
        RESERVED_FIELDS.contains(&field.as_str().to_ascii_lowercase().as_str())
    }
}

impl FromStr for Header {
    type Err = HeaderError;

    fn from_str(input: &str) -> Result<Header, HeaderError> {
        Self::try_from(input.as_bytes())
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.field.as_str())?;
        f.write_str(": ")?;
        f.write_str(self.value.as_str())
    }
}

/// Tries to create a `Header` from a raw header line
impl TryFrom<&[u8]> for Header {
    type Error = HeaderError;

    fn try_from(input: &[u8]) -> Result<Self, Self::Error> {
        let colon = input
            .iter()
            .position(|&b| b == b':')
            .ok_or(HeaderError::Format)?;

        if colon == 0 || colon + 1 == input.len() {
            return Err(HeaderError::Format);
        }

        let field = HeaderField::try_from(&input[..colon])?;

        // surrounding whitespace of the value is not significant
        let mut value = &input[colon + 1..];
        while let [b' ', rest @ ..] = value {
            value = rest;
        }
        while let [rest @ .., b' '] = value {
            value = rest;
        }
        let value = HeaderFieldValue::try_from(value)?;

        Ok(Header { field, value })
    }
}

impl TryFrom<&AsciiStr> for Header {
    type Error = HeaderError;

    fn try_from(input: &AsciiStr) -> Result<Self, Self::Error> {
        Self::try_from(input.as_bytes())
    }
}

/// Field name of a header (eg. `Content-Type`, `Content-Length`)
///
/// Comparison between two `HeaderField`s ignores case.
#[derive(Debug, Clone, Eq)]
pub struct HeaderField(AsciiString);

impl HeaderField {
    /// Get [`HeaderField`] as `&[u8]`
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Get [`HeaderField`] as `&str`
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Checks for equivalence ignoring letter case
    #[must_use]
    pub fn equiv(&self, other: &'static str) -> bool {
        other.eq_ignore_ascii_case(self.as_str())
    }
}

/// Checks `bytes` against the token byte range for field names as
/// defined in [RFC 9110](https://datatracker.ietf.org/doc/html/rfc9110#name-tokens)
#[inline]
fn field_byte_range_check(bytes: &[u8]) -> Result<(), HeaderError> {
    if bytes.is_empty() {
        return Err(HeaderError::Range);
    }

    for &b in bytes {
        match b {
            b'a'..=b'z'
            | b'A'..=b'Z'
            | b'0'..=b'9'
            | b'-' | b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'.' | b'^'
            | b'_' | b'`' | b'|' | b'~' => {}
            _ => return Err(HeaderError::Range),
        }
    }
    Ok(())
}

impl FromStr for HeaderField {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<HeaderField, HeaderError> {
        Self::try_from(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for HeaderField {
    type Error = HeaderError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        field_byte_range_check(bytes)?;

        Ok(HeaderField(
            AsciiString::from_ascii(bytes).map_err(|err| HeaderError::Ascii(err.ascii_error()))?,
        ))
    }
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.0.as_str())
    }
}

impl PartialEq for HeaderField {
    fn eq(&self, other: &HeaderField) -> bool {
        self.as_bytes().eq_ignore_ascii_case(other.as_bytes())
    }
}

impl PartialEq<&str> for HeaderField {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str().eq_ignore_ascii_case(other)
    }
}

impl Hash for HeaderField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_ascii_lowercase().hash(state);
    }
}

/// Value of a header field
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct HeaderFieldValue(AsciiString);

impl HeaderFieldValue {
    /// Get [`HeaderFieldValue`] as `&[u8]`
    #[must_use]
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Get [`HeaderFieldValue`] as `&str`
    #[must_use]
    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Checks `bytes` against the byte range for field values as
/// defined in [RFC 9110](https://datatracker.ietf.org/doc/html/rfc9110#name-field-values)
#[inline]
fn field_value_byte_range_check(bytes: &[u8]) -> Result<(), HeaderError> {
    for &b in bytes {
        match b {
            0x20..=0x7e | b'\t' | 0x80..=0xff => {}
            _ => return Err(HeaderError::Range),
        }
    }
    Ok(())
}

impl FromStr for HeaderFieldValue {
    type Err = HeaderError;

    fn from_str(s: &str) -> Result<HeaderFieldValue, HeaderError> {
        Self::try_from(s.as_bytes())
    }
}

impl TryFrom<&[u8]> for HeaderFieldValue {
    type Error = HeaderError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        field_value_byte_range_check(bytes)?;

        Ok(HeaderFieldValue(
            AsciiString::from_ascii(bytes).map_err(|err| HeaderError::Ascii(err.ascii_error()))?,
        ))
    }
}

impl TryFrom<usize> for HeaderFieldValue {
    type Error = HeaderError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        let digits = value.to_string();
        Ok(HeaderFieldValue(
            AsciiString::from_ascii(digits.into_bytes())
                .map_err(|err| HeaderError::Ascii(err.ascii_error()))?,
        ))
    }
}

impl std::fmt::Display for HeaderFieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        f.write_str(self.0.as_str())
    }
}

impl PartialEq<&str> for HeaderFieldValue {
    fn eq(&self, other: &&str) -> bool {
        self.0.as_str() == *other
    }
}

impl std::ops::Deref for HeaderFieldValue {
    type Target = AsciiString;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// needs to be lower-case
const RESERVED_FIELDS: &[&str] = &["connection", "trailer", "transfer-encoding", "upgrade"];

/// Header could not be built or added
#[derive(Debug)]
pub enum HeaderError {
    /// Content is not in ASCII range
    Ascii(AsAsciiStrError),
    /// Provided data is no valid header line
    Format,
    /// This header field is managed by the server and cannot be set
    Reserved,
    /// Content is ASCII but outside the allowed byte range
    Range,
}

impl std::error::Error for HeaderError {}

impl std::fmt::Display for HeaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("header not allowed")
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::{field_byte_range_check, Header, HeaderField, RESERVED_FIELDS};

    #[test]
    fn parse_header_test() {
        let s = "Content-Type: text/html";
        let header: Header = s.parse().unwrap();

        assert!(header.field.equiv("content-type"));
        assert_eq!(header.value.as_str(), "text/html");
        assert_eq!(&header.to_string(), s);

        assert!("hello world".parse::<Header>().is_err());
        assert!(":".parse::<Header>().is_err());
        assert!("Content-Type:".parse::<Header>().is_err());
    }

    #[test]
    fn header_value_with_colon_test() {
        let header: Header = "Time: 20: 34".parse().unwrap();

        assert!(header.field.equiv("time"));
        assert_eq!(header.value.as_str(), "20: 34");
    }

    #[test]
    fn field_byte_range_test() {
        for ok in ["Host", "HOST", "User-Agent", "X_CUSTOM_HEADER"] {
            assert!(field_byte_range_check(ok.as_bytes()).is_ok(), "field: {ok}");
        }

        for bad in [
            "\"Host\"",
            "HOST:",
            "user@host",
            "Host\rHost: localhost",
            "Host\0",
            " Host",
            "\tHost",
            "",
        ] {
            assert!(
                field_byte_range_check(bad.as_bytes()).is_err(),
                "field: {bad}"
            );
        }
    }

    // Resistance to RUSTSEC-2020-0031: "HTTP Request smuggling through
    // malformed Transfer Encoding headers"
    // (https://rustsec.org/advisories/RUSTSEC-2020-0031.html)
    #[test]
    fn strict_headers_test() {
        assert!("Transfer-Encoding : chunked".parse::<Header>().is_err());
        assert!(" Transfer-Encoding: chunked".parse::<Header>().is_err());
        assert!("Transfer Encoding: chunked".parse::<Header>().is_err());
        assert!(" Transfer\tEncoding : chunked".parse::<Header>().is_err());
        assert!("Transfer-Encoding: chunked".parse::<Header>().is_ok());
        assert!("Transfer-Encoding: chunked ".parse::<Header>().is_ok());
        assert!("Transfer-Encoding:   chunked ".parse::<Header>().is_ok());
    }

    #[test]
    fn reserved_fields_lowercase_test() {
        for f in RESERVED_FIELDS {
            assert_eq!(f, &f.to_lowercase());
        }
        assert!(Header::is_reserved(
            &HeaderField::try_from(&b"Connection"[..]).unwrap()
        ));
    }
}
