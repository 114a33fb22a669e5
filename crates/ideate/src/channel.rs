//! Secure channel construction for the Ideate gateway.
use http::uri::{Authority, Uri};
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use typed_builder::TypedBuilder;

use crate::{
    error::{Error, Result},
    trust::{NativeTrustStore, TrustStore},
};

/// Gateway used when no target address is given.
pub const DEFAULT_HOST: &str = "gateway-ideate-v1-597696786316.europe-west1.run.app:443";

/// Send and receive ceiling for a single message, in bytes.
pub const MAX_MESSAGE_SIZE: usize = 2_000_000_000;

/// Settings for a single channel.
///
/// An empty `host` selects the factory's default host.
/// `send_limit` and `recv_limit` must be positive and equal.
#[derive(Debug, Clone, PartialEq, Eq, TypedBuilder)]
pub struct ChannelConfig {
    #[builder(default, setter(into))]
    pub host: String,
    #[builder(default = MAX_MESSAGE_SIZE)]
    pub send_limit: usize,
    #[builder(default = MAX_MESSAGE_SIZE)]
    pub recv_limit: usize,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A lazily connected, TLS secured channel to an Ideate gateway.
///
/// Cheap to clone; all clones share the same underlying connection.
/// The connection is closed once every clone has been dropped.
#[derive(Debug, Clone)]
pub struct IdeateChannel {
    channel: Channel,
    authority: Authority,
    send_limit: usize,
    recv_limit: usize,
}

impl IdeateChannel {
    /// Authority the server certificate is verified against.
    #[must_use]
    pub fn authority(&self) -> &str {
        self.authority.as_str()
    }

    #[must_use]
    pub fn send_limit(&self) -> usize {
        self.send_limit
    }

    #[must_use]
    pub fn recv_limit(&self) -> usize {
        self.recv_limit
    }

    #[must_use]
    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    #[must_use]
    pub fn into_inner(self) -> Channel {
        self.channel
    }
}

/// Builds [`IdeateChannel`]s.
///
/// Root certificates are read from `trust_store` on every call to
/// [`create_channel`](Self::create_channel); nothing is cached between channels.
#[derive(Debug, Clone)]
pub struct ChannelFactory<S = NativeTrustStore> {
    default_host: String,
    trust_store: S,
}

impl Default for ChannelFactory<NativeTrustStore> {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelFactory<NativeTrustStore> {
    /// Factory using the operating system's root certificates and [`DEFAULT_HOST`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_trust_store(NativeTrustStore)
    }
}

impl<S: TrustStore> ChannelFactory<S> {
    /// Factory reading root certificates from a custom [`TrustStore`].
    pub fn with_trust_store(trust_store: S) -> Self {
        Self {
            default_host: DEFAULT_HOST.to_string(),
            trust_store,
        }
    }

    /// Replace the host used for empty target addresses.
    #[must_use]
    pub fn set_default_host(mut self, host: impl Into<String>) -> Self {
        self.default_host = host.into();
        self
    }

    #[must_use]
    pub fn default_host(&self) -> &str {
        &self.default_host
    }

    /// Create a channel to `target_address` (`host:port`), or to the default
    /// host if `target_address` is empty.
    ///
    /// Returns without touching the network. The connection is established on
    /// the first RPC, so network and TLS failures surface as [`tonic::Status`]
    /// at call time.
    ///
    /// # Errors
    /// - [`Error::TrustStoreUnavailable`] if root certificates cannot be read.
    /// - [`Error::ConnectionSetupFailed`] if the address is malformed, the
    ///   TLS configuration is rejected, or no Tokio runtime is running.
    pub fn create_channel(&self, target_address: &str) -> Result<IdeateChannel> {
        self.create_channel_with(&ChannelConfig::builder().host(target_address).build())
    }

    /// Create a channel from an explicit [`ChannelConfig`].
    ///
    /// # Errors
    /// See [`create_channel`](Self::create_channel). Also fails with
    /// [`Error::ConnectionSetupFailed`] if the message limits are zero or differ.
    pub fn create_channel_with(&self, config: &ChannelConfig) -> Result<IdeateChannel> {
        if config.send_limit == 0 || config.send_limit != config.recv_limit {
            return Err(Error::setup(format!(
                "message limits must be positive and equal, got send={} recv={}",
                config.send_limit, config.recv_limit
            )));
        }

        let host = if config.host.is_empty() {
            self.default_host.as_str()
        } else {
            config.host.as_str()
        };
        let authority = parse_authority(host)?;

        tracing::debug!(
            "Creating channel to `{authority}` with message limits send={} recv={}",
            config.send_limit,
            config.recv_limit
        );

        let anchor = self.trust_store.load()?;

        let origin: Uri = format!("https://{authority}")
            .parse()
            .map_err(Error::setup)?;
        let tls = ClientTlsConfig::new()
            .trust_anchors(anchor.into_anchors())
            .domain_name(server_name(&authority));

        let endpoint = Endpoint::from(origin.clone())
            .origin(origin)
            .tls_config(tls)
            .map_err(|e| {
                tracing::error!("Failed to configure TLS for `{authority}`: {e}");
                Error::setup(e)
            })?;

        // The lazy channel spawns its buffer worker onto the current runtime.
        tokio::runtime::Handle::try_current().map_err(|e| {
            tracing::error!("Cannot create channel to `{authority}` outside of a Tokio runtime");
            Error::setup(format!("no Tokio runtime to drive the channel: {e}"))
        })?;

        Ok(IdeateChannel {
            channel: endpoint.connect_lazy(),
            authority,
            send_limit: config.send_limit,
            recv_limit: config.recv_limit,
        })
    }
}

/// Create a channel with the default [`ChannelFactory`].
///
/// # Errors
/// See [`ChannelFactory::create_channel`].
pub fn create_channel(target_address: &str) -> Result<IdeateChannel> {
    ChannelFactory::new().create_channel(target_address)
}

/// Name the server certificate must be issued for. IPv6 literals lose their brackets.
fn server_name(authority: &Authority) -> &str {
    authority
        .host()
        .trim_start_matches('[')
        .trim_end_matches(']')
}

fn parse_authority(host: &str) -> Result<Authority> {
    let authority: Authority = host
        .parse()
        .map_err(|e| Error::setup(format!("invalid target address `{host}`: {e}")))?;

    if authority.as_str().contains('@') {
        return Err(Error::setup(format!(
            "target address `{host}` must not contain user info"
        )));
    }
    if authority.host().is_empty() {
        return Err(Error::setup(format!("target address `{host}` has no host")));
    }
    if authority.port_u16().is_none() {
        return Err(Error::setup(format!("target address `{host}` has no port")));
    }
    Ok(authority)
}
