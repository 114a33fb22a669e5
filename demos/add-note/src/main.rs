use std::time::Duration;

use ideate::{
    add_note_request::StreamTarget, AddNoteRequest, BearerTokenAuthorizer, IdeateClient,
    IdeateService,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Obtain a user access token via the OAuth flow, see the `token-exchange` demo.
    let access_token = std::env::var("IDEATE_ACCESS_TOKEN")?;
    // Collection token generated in Ideate.
    let collection_token = std::env::var("IDEATE_COLLECTION_TOKEN")?;
    // An empty target selects the default gateway.
    let target = std::env::var("IDEATE_TARGET").unwrap_or_default();

    let channel = ideate::create_channel(&target)?;
    println!("Connecting lazily to {}", channel.authority());

    let authorizer = BearerTokenAuthorizer::new(&access_token)?;
    let mut client = IdeateClient::with_authorizer(channel, authorizer);

    let mut request = tonic::Request::new(AddNoteRequest {
        content: "Hello, world!".into(),
        stream_target: Some(StreamTarget::Token(collection_token)),
    });
    request.set_timeout(Duration::from_secs(30));

    match client.add_note(request).await {
        Ok(_) => println!("Successfully added note."),
        Err(status) if status.code() == tonic::Code::Unauthenticated => {
            println!("Access token rejected, refresh it and try again: {status}");
        }
        Err(status) => return Err(status.into()),
    }

    Ok(())
}
