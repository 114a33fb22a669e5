mod bearer_token;

use std::{str::FromStr, sync::Arc};

pub use bearer_token::*;
use http::{header::AUTHORIZATION, HeaderValue};
use tonic::metadata::{Ascii, MetadataValue};

use crate::error::{Error, Result};

/// Source of the `authorization` value attached to Ideate calls.
///
/// The service rejects calls without a valid bearer token with
/// [`tonic::Code::Unauthenticated`]. Obtaining and refreshing the token is
/// up to the caller; see [`IdentityClient`](crate::IdentityClient) for the
/// exchange itself.
pub trait Authorizer {
    /// Returns the authorization header to use for requests.
    ///
    /// # Errors
    /// Fails if no token is available.
    fn authorization_header(&self) -> Result<Arc<HeaderValue>>;

    /// Returns the authorization header as gRPC metadata.
    ///
    /// # Errors
    /// - Fails if `Self::authorization_header()` fails.
    /// - Fails if the header value is not ASCII
    fn authorization_metadata(&self) -> std::result::Result<MetadataValue<Ascii>, tonic::Status> {
        let header = self
            .authorization_header()
            .map_err(|e| tonic::Status::unauthenticated(e.to_string()))?;
        let header_str = header.to_str().map_err(|e| {
            tonic::Status::unauthenticated(format!("{}: {e}", Error::InvalidHeaderValue))
        })?;

        let mut value = MetadataValue::from_str(header_str).map_err(|e| {
            tonic::Status::unauthenticated(format!("{}: {e}", Error::InvalidHeaderValue))
        })?;
        value.set_sensitive(true);
        Ok(value)
    }
}

/// Attach `authorization: Bearer {token}` to a single request, replacing any
/// value already present. Pass only the token, without the `Bearer` prefix.
///
/// # Errors
/// Fails with [`Error::InvalidHeaderValue`] if the token is not ASCII.
pub fn with_bearer_token<T>(
    mut request: tonic::Request<T>,
    token: &str,
) -> Result<tonic::Request<T>> {
    require_ascii(token)?;
    let mut value = MetadataValue::from_str(&format!("Bearer {token}"))
        .map_err(|_e| Error::InvalidHeaderValue)?;
    value.set_sensitive(true);
    request
        .metadata_mut()
        .insert(AUTHORIZATION.as_str(), value);
    Ok(request)
}

/// Insert the authorizer's header unless the request already carries one.
pub(crate) fn intercept<A: Authorizer + ?Sized>(
    authorizer: &A,
    mut request: tonic::Request<()>,
) -> std::result::Result<tonic::Request<()>, tonic::Status> {
    let metadata = request.metadata_mut();
    if !metadata.contains_key(AUTHORIZATION.as_str()) {
        metadata.insert(AUTHORIZATION.as_str(), authorizer.authorization_metadata()?);
    }
    Ok(request)
}

/// Helper function to ensure that a string is ASCII.
///
/// # Errors
/// Fails with `InvalidHeaderValue` if the string is not ASCII.
pub(crate) fn require_ascii(s: &str) -> Result<()> {
    if s.is_ascii() {
        Ok(())
    } else {
        Err(Error::InvalidHeaderValue)
    }
}

/// Build a sensitive `Bearer {token}` header value.
pub(crate) fn bearer_header(token: &str) -> Result<HeaderValue> {
    require_ascii(token)?;
    let mut header =
        HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_e| Error::InvalidHeaderValue)?;
    header.set_sensitive(true);
    Ok(header)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_with_bearer_token() {
        let request = with_bearer_token(tonic::Request::new(()), "my-token").unwrap();
        assert_eq!(
            request
                .metadata()
                .get("authorization")
                .unwrap()
                .to_str()
                .unwrap(),
            "Bearer my-token"
        );
    }

    #[test]
    fn test_with_bearer_token_replaces_existing() {
        let mut request = tonic::Request::new(());
        request
            .metadata_mut()
            .insert("authorization", "Bearer stale-token".parse().unwrap());

        let request = with_bearer_token(request, "fresh-token").unwrap();
        let values: Vec<_> = request
            .metadata()
            .get_all("authorization")
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(values, vec!["Bearer fresh-token".to_string()]);
    }

    #[test]
    fn test_non_ascii_token_rejected() {
        let result = with_bearer_token(tonic::Request::new(()), "tökén");
        assert!(matches!(result, Err(Error::InvalidHeaderValue)));
        assert!(matches!(bearer_header("tökén"), Err(Error::InvalidHeaderValue)));
    }

    #[test]
    fn test_control_characters_rejected() {
        assert!(matches!(
            bearer_header("line\nbreak"),
            Err(Error::InvalidHeaderValue)
        ));
    }
}
