//! Request/response assertion harness for HTTP APIs.
//!
//! Build a [`RequestSpec`], send it through a [`Harness`], and check the
//! [`CapturedResponse`] against a [`ResponseAssertion`]: status code, JSON
//! fields addressed by dot/bracket paths, body substrings, headers, or whole
//! body equality against a fixture file.
//!
//! ```no_run
//! use restquest::Harness;
//! use restquest::Matcher;
//! use restquest::RequestSpec;
//! use restquest::ResponseAssertion;
//!
//! # async fn demo() -> Result<(), restquest::HarnessError> {
//! let harness: Harness = Harness::default();
//! let spec = RequestSpec::get("https://reqres.in/api/unknown")?;
//!
//! harness
//!     .run(&spec, &ResponseAssertion::status(200).field("per_page", Matcher::equals(6)))
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod asserter;
pub mod error;
pub mod fixture;
pub mod harness;
pub mod json_path;
pub mod matcher;
pub mod outputter;
pub mod parser;
pub mod payload;
pub mod request;
pub mod response;
pub mod runner;
pub mod transport;
pub mod validator;

pub use asserter::Assert;
pub use asserter::ResponseAssertion;
pub use error::AssertionFailure;
pub use error::HarnessError;
pub use error::TransportFailure;
pub use harness::Harness;
pub use json_path::JsonPath;
pub use matcher::JsonType;
pub use matcher::Matcher;
pub use request::RequestSpec;
pub use response::CapturedResponse;
pub use transport::ReqwestTransport;
pub use transport::Transport;
