//! OAuth2 authorization-code and refresh-token exchange against Alis Identity.
//!
//! The Ideate service accepts user access tokens issued by Alis Identity.
//! Redirecting the user, handling the callback and storing the tokens belong
//! to the application; [`IdentityClient`] only builds the authorize URL and
//! performs the token requests.
use std::sync::Arc;

use oauth2::{AccessToken, AuthorizationCode, ClientId, ClientSecret, RedirectUrl, RefreshToken};
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;
use url::Url;

use crate::{
    auth::BearerTokenAuthorizer,
    error::{Error, Result},
};

/// Alis Identity host used unless configured otherwise.
pub const DEFAULT_IDENTITY_HOST: &str = "https://identity.alisx.com";

fn default_identity_host() -> Url {
    Url::parse(DEFAULT_IDENTITY_HOST).expect("Default identity host is a valid URL")
}

/// Registration of an application with Alis Identity.
///
/// * `identity_host`: Defaults to [`DEFAULT_IDENTITY_HOST`].
/// * `client_id`, `client_secret`: Issued when registering the app.
/// * `redirect_url`: Registered redirect URI receiving the `code`.
/// * `http_client`: Custom `reqwest::Client`. Defaults to a client with redirects disabled.
#[derive(Debug, Clone, TypedBuilder)]
pub struct IdentityConfig {
    #[builder(default = default_identity_host())]
    identity_host: Url,
    #[builder(setter(transform = |client_id: &str| ClientId::new(client_id.to_string())))]
    client_id: ClientId,
    #[builder(setter(transform = |client_secret: &str| ClientSecret::new(client_secret.to_string())))]
    client_secret: ClientSecret,
    #[builder(setter(transform = |redirect_url: Url| RedirectUrl::from_url(redirect_url)))]
    redirect_url: RedirectUrl,
    #[builder(default, setter(strip_option))]
    http_client: Option<reqwest::Client>,
}

/// Access token and, if issued, refresh token returned by the token endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenPair {
    access_token: AccessToken,
    refresh_token: Option<RefreshToken>,
}

impl TokenPair {
    #[must_use]
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<&RefreshToken> {
        self.refresh_token.as_ref()
    }

    /// Interceptor attaching the access token to Ideate calls.
    ///
    /// # Errors
    /// Fails if the access token is not ASCII.
    pub fn authorizer(&self) -> Result<BearerTokenAuthorizer> {
        BearerTokenAuthorizer::new(self.access_token.secret())
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    grant_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<&'a str>,
    client_id: &'a str,
    client_secret: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    redirect_uri: Option<&'a str>,
}

/// Client for the Alis Identity token endpoint.
///
/// Performs a single request per call. Refreshing when an Ideate call fails
/// with [`tonic::Code::Unauthenticated`] is up to the caller, for example by
/// passing the new access token to
/// [`SharedBearerTokenAuthorizer::set_token`](crate::SharedBearerTokenAuthorizer::set_token).
#[derive(Debug, Clone)]
pub struct IdentityClient {
    identity_host: Url,
    client_id: ClientId,
    client_secret: ClientSecret,
    redirect_url: RedirectUrl,
    http_client: reqwest::Client,
}

impl IdentityClient {
    /// Create a new [`IdentityClient`].
    ///
    /// # Errors
    /// - Fails with [`Error::InvalidIdentityHost`] if `identity_host` cannot carry a path.
    /// - Fails if the default HTTP client cannot be created.
    pub fn new(config: IdentityConfig) -> Result<Self> {
        if config.identity_host.cannot_be_a_base() {
            return Err(Error::InvalidIdentityHost(format!(
                "`{}` is not a base URL",
                config.identity_host
            )));
        }

        let http_client = match config.http_client {
            Some(client) => client,
            None => reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .map_err(Arc::new)?,
        };

        Ok(Self {
            identity_host: config.identity_host,
            client_id: config.client_id,
            client_secret: config.client_secret,
            redirect_url: config.redirect_url,
            http_client,
        })
    }

    /// URL to redirect the user to for sign-in.
    #[must_use]
    pub fn authorize_url(&self) -> Url {
        let mut url = self.endpoint("authorize");
        url.query_pairs_mut()
            .append_pair("client_id", self.client_id.as_str())
            .append_pair("redirect_uri", self.redirect_url.as_str());
        url
    }

    /// Exchange the `code` received on the redirect URI for tokens.
    ///
    /// # Errors
    /// - [`Error::OAuth2RequestFailed`] if the identity server does not answer with `200 OK`.
    /// - [`Error::OAuth2ParseError`] if the response is not a token response.
    /// - [`Error::ReqwestFailed`] if the request could not be sent.
    pub async fn exchange_code(&self, code: &AuthorizationCode) -> Result<TokenPair> {
        tracing::debug!(
            "Exchanging authorization code for client `{}`",
            self.client_id.as_str()
        );
        self.request_tokens(&TokenRequest {
            grant_type: "authorization_code",
            code: Some(code.secret().as_str()),
            refresh_token: None,
            client_id: self.client_id.as_str(),
            client_secret: self.client_secret.secret().as_str(),
            redirect_uri: Some(self.redirect_url.as_str()),
        })
        .await
    }

    /// Obtain a new access token with a refresh token.
    ///
    /// # Errors
    /// See [`exchange_code`](Self::exchange_code).
    pub async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair> {
        tracing::debug!(
            "Refreshing access token for client `{}`",
            self.client_id.as_str()
        );
        self.request_tokens(&TokenRequest {
            grant_type: "refresh_token",
            code: None,
            refresh_token: Some(refresh_token.secret().as_str()),
            client_id: self.client_id.as_str(),
            client_secret: self.client_secret.secret().as_str(),
            redirect_uri: None,
        })
        .await
    }

    async fn request_tokens(&self, body: &TokenRequest<'_>) -> Result<TokenPair> {
        let response = self
            .http_client
            .post(self.endpoint("token"))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach identity server: {e}");
                Arc::new(e)
            })?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            tracing::error!(
                "Identity server rejected `{}` grant for client `{}`: {status}",
                body.grant_type,
                body.client_id
            );
            return Err(Error::OAuth2RequestFailed(format!(
                "identity server error: {status}"
            )));
        }

        response
            .json::<TokenPair>()
            .await
            .map_err(|e| Error::OAuth2ParseError(e.to_string()))
    }

    fn endpoint(&self, name: &str) -> Url {
        let mut url = self.identity_host.clone();
        url.set_query(None);
        // Base URLs always have path segments, checked in `new`.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(name);
        }
        url
    }
}
