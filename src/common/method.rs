use std::{fmt, str::FromStr};

use ascii::{AsciiStr, AsciiString};

/// HTTP request methods as per [RFC 9110](https://datatracker.ietf.org/doc/html/rfc9110#name-methods)
///
/// Only `GET` is answered by the bundled page handler, but every token on
/// the wire must still parse so the server can refuse it cleanly.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `HEAD`
    Head,
    /// `POST`
    Post,
    /// `PUT`
    Put,
    /// `DELETE`
    Delete,
    /// `CONNECT`
    Connect,
    /// `OPTIONS`
    Options,
    /// `TRACE`
    Trace,
    /// `PATCH`
    Patch,
    /// Any other token sent by a client
    NonStandard(AsciiString),
}

impl Method {
    /// The method name as `&str`
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Head => "HEAD",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
            Method::Connect => "CONNECT",
            Method::Options => "OPTIONS",
            Method::Trace => "TRACE",
            Method::Patch => "PATCH",
            Method::NonStandard(s) => s.as_str(),
        }
    }
}

impl FromStr for Method {
    type Err = ();

    fn from_str(s: &str) -> Result<Method, ()> {
        Ok(Method::from(s.as_bytes()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.write_str(self.as_str())
    }
}

impl From<&AsciiStr> for Method {
    fn from(s: &AsciiStr) -> Self {
        Self::from(s.as_bytes())
    }
}

impl From<&[u8]> for Method {
    fn from(b: &[u8]) -> Self {
        match b {
            b"GET" => Method::Get,
            b"HEAD" => Method::Head,
            b"POST" => Method::Post,
            b"PUT" => Method::Put,
            b"DELETE" => Method::Delete,
            b"CONNECT" => Method::Connect,
            b"OPTIONS" => Method::Options,
            b"TRACE" => Method::Trace,
            b"PATCH" => Method::Patch,
            _ => Method::NonStandard(
                AsciiString::from_ascii(b).unwrap_or_else(|_| AsciiString::new()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Method;

    #[test]
    fn parse_method_test() {
        assert_eq!(Method::from(&b"GET"[..]), Method::Get);
        assert_eq!(Method::from(&b"HEAD"[..]), Method::Head);
        assert_eq!("POST".parse::<Method>().unwrap(), Method::Post);
        assert_eq!(
            Method::from(&b"BREW"[..]),
            Method::NonStandard("BREW".parse().unwrap())
        );
    }

    #[test]
    fn display_test() {
        assert_eq!(Method::Get.to_string(), "GET");
        assert_eq!(Method::from(&b"BREW"[..]).to_string(), "BREW");
    }
}
