//! Actions available on a [`Client`](crate::Client)
//!
//! Public actions read chain state and work on any client. User actions
//! build messages and run them through the submission pipeline, so they need
//! a signer.

mod public;
mod user;

pub use user::InstantiateOptions;
