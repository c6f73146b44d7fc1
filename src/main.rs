use clap::Parser;
use gdrive_connect::{AuthError, DriveAuthClient, DriveAuthConfig};

#[derive(Debug, Parser)]
#[command(
    name = "gdrive-connect",
    about = "Authorize Google Drive access via OAuth and print the token as JSON."
)]
struct Cli {
    /// OAuth client id from the Google Cloud console.
    #[arg(long)]
    client_id: String,

    /// OAuth client secret from the Google Cloud console.
    #[arg(long)]
    client_secret: String,

    /// Loopback redirect URI registered for the OAuth client.
    #[arg(long, default_value = "http://localhost:8085/callback")]
    redirect_uri: String,
}

#[tokio::main]
async fn main() -> Result<(), AuthError> {
    let cli = Cli::parse();

    let config = DriveAuthConfig::new(cli.client_id, cli.client_secret, cli.redirect_uri);
    let client = DriveAuthClient::new(config)?;

    let token = client
        .run_local_flow(|auth| {
            eprintln!("Authorization URL:\n{}", auth.authorization_url);
            if let Err(err) = webbrowser::open(&auth.authorization_url) {
                eprintln!("Failed to open browser automatically: {err}");
            }
            Ok(())
        })
        .await?;

    let output = serde_json::to_string_pretty(&token).map_err(|err| AuthError::Internal {
        message: err.to_string(),
    })?;

    println!("{output}");
    Ok(())
}
