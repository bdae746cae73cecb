//! Mock HTTP server used by batchget's tests.

mod mock;
mod pool;
mod request;
mod responder;
mod response;

pub use mock::{Builder, Mock};
pub use request::Request;
pub use responder::Responder;
pub use response::Response;

/// Define a mock that answers every request the same way, using a concise
/// DSL.
///
/// ```ignore
/// let m = mock! {
///     status: 503,
///     body: "try again later",
///     delay: 500ms,
///     headers {
///         "retry-after": 1,
///     }
/// };
/// ```
#[macro_export]
macro_rules! mock {
    (@response($response:ident) status: $status:expr, $($tail:tt)*) => {
        $response.status_code = $status as u16;

        $crate::mock!(@response($response) $($tail)*)
    };

    (@response($response:ident) body: $body:expr, $($tail:tt)*) => {
        $response.body = ::std::convert::Into::<Vec<u8>>::into($body);

        $crate::mock!(@response($response) $($tail)*)
    };

    (@response($response:ident) delay: $delay:tt, $($tail:tt)*) => {
        $response.delay = Some($crate::macro_api::parse_duration(stringify!($delay)));

        $crate::mock!(@response($response) $($tail)*)
    };

    (@response($response:ident) headers {
        $(
            $name:literal: $value:expr,
        )*
    } $($tail:tt)*) => {
        $(
            $response.headers.push(($name.to_string(), $value.to_string()));
        )*

        $crate::mock!(@response($response) $($tail)*)
    };

    (@response($response:ident)) => {};

    ($($inner:tt)*) => {{
        $crate::Mock::new(move |_: &$crate::Request| {
            #[allow(unused_mut)]
            let mut response = $crate::Response::default();

            $crate::mock!(@response(response) $($inner)*);

            Some(response)
        })
    }};
}

#[doc(hidden)]
pub mod macro_api {
    use std::time::Duration;

    pub fn parse_duration(s: &str) -> Duration {
        humantime::parse_duration(s).unwrap()
    }
}
