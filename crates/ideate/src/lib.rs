#![warn(
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    clippy::pedantic
)]
#![forbid(unsafe_code)]
//! Client for the Alis Ideate gRPC API.
//!
//! ```no_run
//! use ideate::{
//!     add_note_request::StreamTarget, with_bearer_token, AddNoteRequest, IdeateClient,
//!     IdeateService,
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = IdeateClient::connect_default()?;
//!
//! let request = tonic::Request::new(AddNoteRequest {
//!     content: "Hello, world!".to_string(),
//!     stream_target: Some(StreamTarget::Token("<COLLECTION_TOKEN>".to_string())),
//! });
//! let request = with_bearer_token(request, "<USER_ACCESS_TOKEN>")?;
//! client.add_note(request).await?;
//! # Ok(())
//! # }
//! ```

mod auth;
mod channel;
pub mod error;
#[cfg(feature = "identity")]
mod identity;
pub mod proto;
mod service;
mod trust;

pub use auth::*;
pub use channel::*;
pub use error::{Error, Result};
#[cfg(feature = "identity")]
pub use identity::*;
pub use oauth2::{AccessToken, AuthorizationCode, RefreshToken};
pub use proto::{add_note_request, AddNoteRequest, AddNoteResponse};
pub use service::*;
pub use trust::*;
