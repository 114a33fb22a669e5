use ideate::{AuthorizationCode, IdentityClient, IdentityConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Register an app at https://identity.alisx.com/apps to obtain these.
    let client_id = std::env::var("IDEATE_CLIENT_ID")?;
    let client_secret = std::env::var("IDEATE_CLIENT_SECRET")?;
    let redirect_url: url::Url = std::env::var("IDEATE_REDIRECT_URI")?.parse()?;

    let identity = IdentityClient::new(
        IdentityConfig::builder()
            .client_id(&client_id)
            .client_secret(&client_secret)
            .redirect_url(redirect_url)
            .build(),
    )?;

    let Some(code) = std::env::args().nth(1) else {
        println!(
            "Sign in at {} and pass the `code` query parameter of the callback.",
            identity.authorize_url()
        );
        return Ok(());
    };

    let tokens = identity.exchange_code(&AuthorizationCode::new(code)).await?;
    println!("Received access token: {:?}", tokens.access_token());

    // Call this when an Ideate request fails with `Unauthenticated`.
    if let Some(refresh_token) = tokens.refresh_token() {
        let refreshed = identity.refresh(refresh_token).await?;
        println!("Refreshed access token: {:?}", refreshed.access_token());
    }

    Ok(())
}
