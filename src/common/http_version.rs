use std::convert::TryFrom;
use std::fmt;

use ascii::AsciiStr;

/// HTTP version token of a request line.
///
/// The server answers HTTP/1.0 and HTTP/1.1; anything newer is parsed so
/// it can be refused with `505 HTTP Version Not Supported`.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum HttpVersion {
    /// HTTP/0.9
    Version0_9,
    /// HTTP/1.0
    Version1_0,
    /// HTTP/1.1
    Version1_1,
    /// HTTP/2.0
    Version2_0,
    /// HTTP/3.0
    Version3_0,
}

impl HttpVersion {
    /// The version in request/status line format, e.g. `HTTP/1.1`
    #[must_use]
    #[inline]
    pub const fn header(self) -> &'static str {
        match self {
            Self::Version0_9 => "HTTP/0.9",
            Self::Version1_0 => "HTTP/1.0",
            Self::Version1_1 => "HTTP/1.1",
            Self::Version2_0 => "HTTP/2.0",
            Self::Version3_0 => "HTTP/3.0",
        }
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let v = match self {
            Self::Version0_9 => "0.9",
            Self::Version1_0 => "1.0",
            Self::Version1_1 => "1.1",
            Self::Version2_0 => "2.0",
            Self::Version3_0 => "3.0",
        };
        f.write_str(v)
    }
}

impl TryFrom<(u8, u8)> for HttpVersion {
    type Error = HttpVersionError;

    fn try_from(value: (u8, u8)) -> Result<Self, Self::Error> {
        match value {
            (1, 1) => Ok(Self::Version1_1),
            (1, 0) => Ok(Self::Version1_0),
            (2, 0) => Ok(Self::Version2_0),
            (3, 0) => Ok(Self::Version3_0),
            (0, 9) => Ok(Self::Version0_9),
            _ => Err(HttpVersionError(value.0, value.1)),
        }
    }
}

impl TryFrom<&AsciiStr> for HttpVersion {
    type Error = HttpVersionError;

    fn try_from(value: &AsciiStr) -> Result<Self, Self::Error> {
        Self::try_from(value.as_bytes())
    }
}

impl TryFrom<&[u8]> for HttpVersion {
    type Error = HttpVersionError;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        // accepts "HTTP/1.1" and the bare "1.1" form
        let digits = if value.len() == 8 && &value[0..5] == b"HTTP/" {
            &value[5..]
        } else {
            value
        };

        if digits.len() == 3 && digits[1] == b'.' {
            let (major, minor) = (digits[0], digits[2]);
            let range = b'0'..=b'9';
            if range.contains(&major) && range.contains(&minor) {
                return Self::try_from((major - b'0', minor - b'0'));
            }
        }

        Err(HttpVersionError(0, 0))
    }
}

/// Error for an unsupported or unparseable [`HttpVersion`]
#[derive(Debug)]
pub struct HttpVersionError(u8, u8);

impl std::error::Error for HttpVersionError {}

impl fmt::Display for HttpVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("unsupported HTTP/{}.{}", self.0, self.1))
    }
}
