//! Client composition root

use std::{fmt, sync::Arc};

use dango_rpc::HttpTransport;

use crate::{
    config::{ClientConfig, DEFAULT_CLIENT_NAME},
    error::ClientError,
    extension::{Extension, Extensions, extension},
    locks::SenderLocks,
    signer::Signer,
};

pub(crate) struct ClientCore<T> {
    name: String,
    transport: T,
    signer: Option<Arc<dyn Signer>>,
    chain_id: Option<String>,
    pub(crate) locks: SenderLocks,
}

/// A transport, an optional signer, and the extensions attached to them.
///
/// Cloning is cheap and clones share the transport and the per-sender
/// submission locks. Without a signer the client is read-only: queries work,
/// transaction actions fail with [`ClientError::Configuration`] before
/// touching the network.
pub struct Client<T> {
    pub(crate) core: Arc<ClientCore<T>>,
    extensions: Extensions,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self { core: Arc::clone(&self.core), extensions: self.extensions.clone() }
    }
}

impl<T> fmt::Debug for Client<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("name", &self.core.name)
            .field("chain_id", &self.core.chain_id)
            .field("has_signer", &self.has_signer())
            .field("extensions", &self.extensions)
            .finish_non_exhaustive()
    }
}

impl<T> Client<T> {
    pub fn builder(transport: T) -> ClientBuilder<T> {
        ClientBuilder::new(transport)
    }

    pub fn name(&self) -> &str {
        &self.core.name
    }

    pub fn transport(&self) -> &T {
        &self.core.transport
    }

    pub fn signer(&self) -> Option<&Arc<dyn Signer>> {
        self.core.signer.as_ref()
    }

    pub fn has_signer(&self) -> bool {
        self.core.signer.is_some()
    }

    /// Configured chain id. `None` means it is fetched from the node when
    /// needed.
    pub fn chain_id(&self) -> Option<&str> {
        self.core.chain_id.as_deref()
    }

    /// Whether `other` shares this client's transport and signer.
    pub fn same_core(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.core, &other.core)
    }

    /// Attach the value `f` derives from this client.
    pub fn extend<F, E>(self, f: F) -> Self
    where
        F: FnOnce(&Self) -> E,
        E: std::any::Any + Send + Sync,
    {
        self.with(extension(f))
    }

    /// Attach an [`Extension`], possibly a tuple of them.
    pub fn with<X: Extension<T>>(self, extension: X) -> Self {
        extension.apply(self)
    }

    pub fn ext<E: std::any::Any>(&self) -> Option<&E> {
        self.extensions.get()
    }

    pub const fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    pub(crate) const fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }
}

impl Client<HttpTransport> {
    /// Client over a CometBFT HTTP endpoint. Fails when no RPC URL can be
    /// resolved, or when batching is requested outside a Tokio runtime.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = HttpTransport::new(config.resolve_rpc_url()?, config.http_config())?;
        let mut builder = ClientBuilder::new(transport).name(config.name.clone());
        if let Some(chain_id) = config.resolve_chain_id() {
            builder = builder.chain_id(chain_id);
        }
        Ok(builder.build())
    }
}

/// Builder for [`Client`].
pub struct ClientBuilder<T> {
    name: String,
    transport: T,
    signer: Option<Arc<dyn Signer>>,
    chain_id: Option<String>,
}

impl<T> fmt::Debug for ClientBuilder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("name", &self.name)
            .field("chain_id", &self.chain_id)
            .field("has_signer", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> ClientBuilder<T> {
    pub fn new(transport: T) -> Self {
        Self { name: DEFAULT_CLIENT_NAME.to_string(), transport, signer: None, chain_id: None }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn signer(self, signer: impl Signer + 'static) -> Self {
        self.shared_signer(Arc::new(signer))
    }

    pub fn shared_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    pub fn chain_id(mut self, chain_id: impl Into<String>) -> Self {
        self.chain_id = Some(chain_id.into());
        self
    }

    pub fn build(self) -> Client<T> {
        Client {
            core: Arc::new(ClientCore {
                name: self.name,
                transport: self.transport,
                signer: self.signer,
                chain_id: self.chain_id,
                locks: SenderLocks::default(),
            }),
            extensions: Extensions::default(),
        }
    }
}
