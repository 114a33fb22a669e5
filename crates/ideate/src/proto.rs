//! Protobuf messages and the gRPC client stub of `alis.ideate.IdeateService`.
#![allow(clippy::pedantic, unreachable_pub, missing_debug_implementations)]

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AddNoteRequest {
    /// Text of the note.
    #[prost(string, tag = "1")]
    pub content: ::prost::alloc::string::String,
    /// Stream the note is added to.
    #[prost(oneof = "add_note_request::StreamTarget", tags = "2")]
    pub stream_target: ::core::option::Option<add_note_request::StreamTarget>,
}

/// Nested message and enum types in `AddNoteRequest`.
pub mod add_note_request {
    /// Stream the note is added to.
    #[derive(Clone, PartialEq, Eq, Hash, ::prost::Oneof)]
    pub enum StreamTarget {
        /// Collection token generated in Ideate.
        #[prost(string, tag = "2")]
        Token(::prost::alloc::string::String),
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, ::prost::Message)]
pub struct AddNoteResponse {}

/// Generated client implementations.
pub mod ideate_service_client {
    #![allow(
        unused_variables,
        dead_code,
        missing_docs,
        clippy::wildcard_imports,
        clippy::let_unit_value
    )]
    use tonic::codegen::http::Uri;
    use tonic::codegen::*;

    #[derive(Debug, Clone)]
    pub struct IdeateServiceClient<T> {
        inner: tonic::client::Grpc<T>,
    }

    impl<T> IdeateServiceClient<T>
    where
        T: tonic::client::GrpcService<tonic::body::Body>,
        T::Error: Into<StdError>,
        T::ResponseBody: Body<Data = Bytes> + std::marker::Send + 'static,
        <T::ResponseBody as Body>::Error: Into<StdError> + std::marker::Send,
    {
        pub fn new(inner: T) -> Self {
            let inner = tonic::client::Grpc::new(inner);
            Self { inner }
        }

        pub fn with_origin(inner: T, origin: Uri) -> Self {
            let inner = tonic::client::Grpc::with_origin(inner, origin);
            Self { inner }
        }

        pub fn with_interceptor<F>(
            inner: T,
            interceptor: F,
        ) -> IdeateServiceClient<InterceptedService<T, F>>
        where
            F: tonic::service::Interceptor,
            T::ResponseBody: Default,
            T: tonic::codegen::Service<
                http::Request<tonic::body::Body>,
                Response = http::Response<
                    <T as tonic::client::GrpcService<tonic::body::Body>>::ResponseBody,
                >,
            >,
            <T as tonic::codegen::Service<http::Request<tonic::body::Body>>>::Error:
                Into<StdError> + std::marker::Send + std::marker::Sync,
        {
            IdeateServiceClient::new(InterceptedService::new(inner, interceptor))
        }

        /// Limits the maximum size of a decoded message.
        #[must_use]
        pub fn max_decoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_decoding_message_size(limit);
            self
        }

        /// Limits the maximum size of an encoded message.
        #[must_use]
        pub fn max_encoding_message_size(mut self, limit: usize) -> Self {
            self.inner = self.inner.max_encoding_message_size(limit);
            self
        }

        /// Adds a note to the stream identified by the request's target.
        pub async fn add_note(
            &mut self,
            request: impl tonic::IntoRequest<super::AddNoteRequest>,
        ) -> std::result::Result<tonic::Response<super::AddNoteResponse>, tonic::Status> {
            self.inner.ready().await.map_err(|e| {
                tonic::Status::unknown(format!("Service was not ready: {}", e.into()))
            })?;
            let codec = tonic_prost::ProstCodec::default();
            let path =
                http::uri::PathAndQuery::from_static("/alis.ideate.IdeateService/AddNote");
            let mut req = request.into_request();
            req.extensions_mut()
                .insert(GrpcMethod::new("alis.ideate.IdeateService", "AddNote"));
            self.inner.unary(req, path, codec).await
        }
    }
}
