//! Request extractors.

mod caller;

pub use caller::{CALLER_HEADER, CallerIdentity};
