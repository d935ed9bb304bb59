//! [`RequestHandler`] is the seam between the listening [`Server`](crate::Server)
//! and the application logic answering requests.

use crate::request::Request;
use crate::response::ResponseBox;

/// A `RequestHandler` maps one incoming request to one outgoing response.
///
/// The handler is shared between all connection worker threads, so it must
/// be `Send + Sync` and should not carry mutable state.
///
/// # Example
///
/// ```
/// # use hostpage::{response, Request, RequestHandler, ResponseBox};
/// struct NothingFoundHandler;
///
/// impl RequestHandler for NothingFoundHandler {
///     fn handle(&self, _request: &Request) -> ResponseBox {
///         response::Standard::NotFound404.into()
///     }
/// }
/// ```
pub trait RequestHandler: Send + Sync {
    /// Produce the response for `request`
    fn handle(&self, request: &Request) -> ResponseBox;
}

/// `FnRequestHandler` makes a [`RequestHandler`] out of a function or
/// closure.
///
/// # Example
///
/// ```
/// # use hostpage::{FnRequestHandler, Request, Response};
/// let handler = FnRequestHandler(|_request: &Request| {
///     Response::from_string("hello").boxed()
/// });
/// ```
#[allow(missing_debug_implementations)]
pub struct FnRequestHandler<T>(pub T)
where
    T: Fn(&Request) -> ResponseBox;

impl<T> RequestHandler for FnRequestHandler<T>
where
    T: Fn(&Request) -> ResponseBox + Send + Sync,
{
    #[inline]
    fn handle(&self, request: &Request) -> ResponseBox {
        (self.0)(request)
    }
}

impl<T> From<T> for FnRequestHandler<T>
where
    T: Fn(&Request) -> ResponseBox + Send + Sync,
{
    fn from(f: T) -> Self {
        FnRequestHandler(f)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Response, TestRequest};

    use super::{FnRequestHandler, RequestHandler};

    #[test]
    fn fn_request_handler_test() {
        let handler = FnRequestHandler(|_request: &crate::Request| {
            Response::from_string("hello").with_status_code(201_u16).boxed()
        });

        let response = handler.handle(&TestRequest::new().into_request());
        assert_eq!(response.status_code(), 201_u16);
    }
}
