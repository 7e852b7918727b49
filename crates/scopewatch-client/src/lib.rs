//! scopewatch-client — HTTP clients for the upstream APIs.
//!
//! Two stateless clients share one retrying transport:
//!
//! - [`RegistryClient`] lists packages under an npm scope and fetches
//!   per-package daily download counts.
//! - [`SocketClient`] fetches the six-dimension score bundle for a
//!   package version from socket.dev.
//!
//! Both wrap a single outbound GET plus JSON decoding. Retry and
//! timeout behavior lives in [`transport`]; callers only see a
//! [`ClientError`] once the policy is exhausted.

pub mod error;
pub mod registry;
pub mod socket;
pub mod transport;

pub use error::ClientError;
pub use registry::RegistryClient;
pub use socket::SocketClient;
pub use transport::{RetryPolicy, Transport};
