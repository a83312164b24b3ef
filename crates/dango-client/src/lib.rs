//! Client for the Dango chain
//!
//! A [`Client`] pairs a [`Transport`](dango_rpc::Transport) with an optional
//! [`Signer`]. Read-only actions (queries, simulation, address prediction)
//! work on any client; transaction actions go through the submission
//! pipeline and need a signer.

pub mod actions;
mod client;
mod config;
mod error;
mod extension;
mod gas;
mod locks;
mod pipeline;
mod signer;

pub use dango_core;
pub use dango_rpc;

pub use actions::InstantiateOptions;
pub use client::{Client, ClientBuilder};
pub use config::{ChainConfig, ClientConfig, DEFAULT_CLIENT_NAME};
pub use error::ClientError;
pub use extension::{Extension, Extensions, FnExtension, extension};
pub use gas::GasOption;
pub use signer::{SignOutcome, Signer, SignerError};
