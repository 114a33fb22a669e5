//! Interceptors attaching a bearer token to Ideate calls.
use std::sync::{Arc, RwLock};

use http::HeaderValue;
use tonic::service::Interceptor;

use super::{bearer_header, intercept, Authorizer};
use crate::error::Result;

/// Create a simple Authorizer that attaches a given token to any request
/// a client sends. The token is attached with the `Bearer` auth-scheme.
///
/// Implements [`Interceptor`](`tonic::service::Interceptor`). The interceptor does not insert
/// the access token if the intercepted call already has an `Authorization` header, so a
/// per-call token set with [`with_bearer_token`](crate::with_bearer_token) wins.
#[derive(Clone, veil::Redact)]
pub struct BearerTokenAuthorizer {
    #[redact]
    authorization_header: Arc<HeaderValue>,
}

impl BearerTokenAuthorizer {
    /// Create a new interceptor with the given access token.
    /// Pass only the token, without the `Bearer` prefix.
    ///
    /// # Errors
    /// Fails if "Bearer {token}" is not a valid ASCII string.
    pub fn new(token: &str) -> Result<Self> {
        Ok(Self {
            authorization_header: Arc::new(bearer_header(token)?),
        })
    }
}

impl Authorizer for BearerTokenAuthorizer {
    fn authorization_header(&self) -> Result<Arc<HeaderValue>> {
        Ok(self.authorization_header.clone())
    }
}

impl Interceptor for BearerTokenAuthorizer {
    fn call(
        &mut self,
        request: tonic::Request<()>,
    ) -> std::result::Result<tonic::Request<()>, tonic::Status> {
        intercept(&*self, request)
    }
}

/// Bearer token authorizer whose token can be replaced while clients using it
/// stay alive.
///
/// All clones share the token. Call [`set_token`](Self::set_token) after
/// refreshing the access token; subsequent calls pick up the new value.
#[derive(Clone, veil::Redact)]
pub struct SharedBearerTokenAuthorizer {
    #[redact]
    authorization_header: Arc<RwLock<Arc<HeaderValue>>>,
}

impl SharedBearerTokenAuthorizer {
    /// Pass only the token, without the `Bearer` prefix.
    ///
    /// # Errors
    /// Fails if "Bearer {token}" is not a valid ASCII string.
    pub fn new(token: &str) -> Result<Self> {
        Ok(Self {
            authorization_header: Arc::new(RwLock::new(Arc::new(bearer_header(token)?))),
        })
    }

    /// Replace the token for all clones of this authorizer.
    /// On error the previous token stays in place.
    ///
    /// # Errors
    /// Fails if "Bearer {token}" is not a valid ASCII string.
    pub fn set_token(&self, token: &str) -> Result<()> {
        let header = Arc::new(bearer_header(token)?);
        // Unwrap RWLock to propagate poison (writer panicked)
        let mut guard = self
            .authorization_header
            .write()
            .expect("Non-poisoned lock");
        *guard = header;
        drop(guard);
        tracing::debug!("Replaced bearer token");
        Ok(())
    }
}

impl Authorizer for SharedBearerTokenAuthorizer {
    fn authorization_header(&self) -> Result<Arc<HeaderValue>> {
        // Unwrap RWLock to propagate poison (writer panicked)
        let guard = self
            .authorization_header
            .read()
            .expect("Non-poisoned lock");
        Ok(guard.clone())
    }
}

impl Interceptor for SharedBearerTokenAuthorizer {
    fn call(
        &mut self,
        request: tonic::Request<()>,
    ) -> std::result::Result<tonic::Request<()>, tonic::Status> {
        intercept(&*self, request)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tonic::service::Interceptor;

    use super::*;
    use crate::error::Error;

    fn authorization(request: &tonic::Request<()>) -> &str {
        request
            .metadata()
            .get("authorization")
            .unwrap()
            .to_str()
            .unwrap()
    }

    #[test]
    fn test_tonic_access_token_added() {
        let mut interceptor = BearerTokenAuthorizer::new("my-token").unwrap();

        let request = tonic::Request::new(());
        assert!(request.metadata().is_empty());
        let modified_request = interceptor.call(request).unwrap();

        assert_eq!(
            interceptor.authorization_header().unwrap(),
            Arc::new(HeaderValue::from_str("Bearer my-token").unwrap())
        );
        assert_eq!(authorization(&modified_request), "Bearer my-token");
    }

    #[test]
    fn test_tonic_access_token_not_added_if_authorization_present() {
        let mut interceptor = BearerTokenAuthorizer::new("my-token").unwrap();

        let mut request = tonic::Request::new(());
        request
            .metadata_mut()
            .insert("authorization", "Bearer existing-token".parse().unwrap());

        let modified_request = interceptor.call(request).unwrap();
        assert_eq!(authorization(&modified_request), "Bearer existing-token");
    }

    #[test]
    fn test_invalid_token() {
        assert!(matches!(
            BearerTokenAuthorizer::new("tökén"),
            Err(Error::InvalidHeaderValue)
        ));
        assert!(matches!(
            SharedBearerTokenAuthorizer::new("tökén"),
            Err(Error::InvalidHeaderValue)
        ));
    }

    #[test]
    fn test_debug_redacts_token() {
        let authorizer = BearerTokenAuthorizer::new("my-secret-token").unwrap();
        assert!(!format!("{authorizer:?}").contains("my-secret-token"));

        let authorizer = SharedBearerTokenAuthorizer::new("my-secret-token").unwrap();
        assert!(!format!("{authorizer:?}").contains("my-secret-token"));
    }

    #[test]
    fn test_shared_token_replaced_for_all_clones() {
        let authorizer = SharedBearerTokenAuthorizer::new("old-token").unwrap();
        let mut interceptor = authorizer.clone();

        let request = interceptor.call(tonic::Request::new(())).unwrap();
        assert_eq!(authorization(&request), "Bearer old-token");

        authorizer.set_token("new-token").unwrap();
        let request = interceptor.call(tonic::Request::new(())).unwrap();
        assert_eq!(authorization(&request), "Bearer new-token");
    }

    #[test]
    fn test_shared_token_kept_on_invalid_replacement() {
        let authorizer = SharedBearerTokenAuthorizer::new("old-token").unwrap();
        assert!(authorizer.set_token("tökén").is_err());
        assert_eq!(
            authorizer.authorization_header().unwrap().to_str().unwrap(),
            "Bearer old-token"
        );
    }
}
