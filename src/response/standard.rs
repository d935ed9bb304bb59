//! Reusable standard [`Response`](super::Response)s

use std::io::Cursor;

use lazy_static::lazy_static;

use super::{Response, ResponseBox};

/// `StandardResponse` is the type of the cached standard [`Response`]s
pub type StandardResponse = Response<Cursor<&'static [u8]>>;

lazy_static! {
    static ref CACHE_404: StandardResponse = Response::from(404_u16);
    static ref CACHE_500: StandardResponse = Response::from(500_u16);
    static ref CACHE_501: StandardResponse = Response::from(501_u16);
}

/// Standard error responses of the server, the body is the reason phrase
///
/// Ordered by [`StatusCode`](crate::StatusCode)
#[derive(Clone, Copy, Debug, Hash, Eq, Ord, PartialEq, PartialOrd)]
#[allow(missing_docs)]
pub enum Standard {
    NotFound404,
    InternalServerError500,
    NotImplemented501,
}

impl Standard {
    /// A copy of the cached [`StandardResponse`]
    #[must_use]
    pub fn response(self) -> StandardResponse {
        let cached: &'static StandardResponse = match self {
            Standard::NotFound404 => &CACHE_404,
            Standard::InternalServerError500 => &CACHE_500,
            Standard::NotImplemented501 => &CACHE_501,
        };

        cached.clone()
    }
}

impl From<Standard> for ResponseBox {
    fn from(standard: Standard) -> Self {
        standard.response().boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::Standard;

    #[test]
    fn standard_response_test() {
        let response = Standard::NotFound404.response();
        assert_eq!(response.status_code(), 404_u16);
        assert_eq!(response.data_length(), Some("Not Found".len()));

        let response = Standard::NotImplemented501.response();
        assert_eq!(response.status_code(), 501_u16);
    }

    #[test]
    fn standard_body_is_reason_phrase_test() {
        let response = Standard::InternalServerError500.response();
        let body = response.into_reader().unwrap().into_inner();
        assert_eq!(body, b"Internal Server Error");
    }
}
