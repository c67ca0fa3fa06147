//! Wire types exchanged with the clickhouse-sinker management API.
//!
//! Every JSON endpoint wraps its payload into an [`Envelope`]; raw diagnostic
//! endpoints ([`DebugKind`]) return plain text.

mod envelope;
pub use envelope::{Envelope, EnvelopeError, SUCCESS_CODE};

mod domain;
pub use domain::*;
