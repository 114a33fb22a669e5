use std::future::Future;

use tonic::{service::interceptor::InterceptedService, transport::Channel};

use crate::{
    channel::{ChannelFactory, IdeateChannel},
    error::Result,
    proto::{ideate_service_client::IdeateServiceClient, AddNoteRequest, AddNoteResponse},
};

/// The Ideate API, one method per RPC.
///
/// Authentication is carried in request metadata; see
/// [`with_bearer_token`](crate::with_bearer_token) and the authorizers.
/// Deadlines are set per call with [`tonic::Request::set_timeout`].
pub trait IdeateService {
    /// Add a note to the stream identified by the request's target.
    fn add_note(
        &mut self,
        request: tonic::Request<AddNoteRequest>,
    ) -> impl Future<Output = std::result::Result<tonic::Response<AddNoteResponse>, tonic::Status>>
           + Send;
}

/// [`IdeateService`] backed by an [`IdeateChannel`].
///
/// Applies the channel's message size limits to every call.
#[derive(Debug, Clone)]
pub struct IdeateClient<T = Channel> {
    inner: IdeateServiceClient<T>,
}

impl IdeateClient<Channel> {
    /// Client without an authorizer. Attach the token to each call with
    /// [`with_bearer_token`](crate::with_bearer_token).
    #[must_use]
    pub fn new(channel: IdeateChannel) -> Self {
        let (send_limit, recv_limit) = (channel.send_limit(), channel.recv_limit());
        Self {
            inner: IdeateServiceClient::new(channel.into_inner())
                .max_encoding_message_size(send_limit)
                .max_decoding_message_size(recv_limit),
        }
    }

    /// Client for the default gateway, using the operating system's root certificates.
    ///
    /// # Errors
    /// See [`ChannelFactory::create_channel`].
    pub fn connect_default() -> Result<Self> {
        let channel = ChannelFactory::new().create_channel("").map_err(|e| {
            tracing::error!("Failed to connect to ideate: {e}");
            e
        })?;
        Ok(Self::new(channel))
    }
}

impl<A: tonic::service::Interceptor> IdeateClient<InterceptedService<Channel, A>> {
    /// Client running every call through `authorizer`, typically a
    /// [`BearerTokenAuthorizer`](crate::BearerTokenAuthorizer).
    #[must_use]
    pub fn with_authorizer(channel: IdeateChannel, authorizer: A) -> Self {
        let (send_limit, recv_limit) = (channel.send_limit(), channel.recv_limit());
        Self {
            inner: IdeateServiceClient::with_interceptor(channel.into_inner(), authorizer)
                .max_encoding_message_size(send_limit)
                .max_decoding_message_size(recv_limit),
        }
    }
}

impl<T> IdeateClient<T> {
    /// Access the generated stub.
    pub fn inner_mut(&mut self) -> &mut IdeateServiceClient<T> {
        &mut self.inner
    }

    #[must_use]
    pub fn into_inner(self) -> IdeateServiceClient<T> {
        self.inner
    }
}

impl IdeateService for IdeateClient<Channel> {
    fn add_note(
        &mut self,
        request: tonic::Request<AddNoteRequest>,
    ) -> impl Future<Output = std::result::Result<tonic::Response<AddNoteResponse>, tonic::Status>>
           + Send {
        self.inner.add_note(request)
    }
}

impl<A> IdeateService for IdeateClient<InterceptedService<Channel, A>>
where
    A: tonic::service::Interceptor + Send,
{
    fn add_note(
        &mut self,
        request: tonic::Request<AddNoteRequest>,
    ) -> impl Future<Output = std::result::Result<tonic::Response<AddNoteResponse>, tonic::Status>>
           + Send {
        self.inner.add_note(request)
    }
}
