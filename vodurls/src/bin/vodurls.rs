use clap::Parser;
use eyre::Context;
use live_vod_urls::fetch_vod_urls;
use live_vod_urls::live_api::{Endpoints, LiveClient, ManifestFormat};
use live_vod_urls::oauth::Credentials;
use std::io::IsTerminal;
use std::time::Duration;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Print the VOD URLs of the recent sessions of a Brightcove live stream.
///
/// API client credentials are read from `CLIENT_ID` and `CLIENT_SECRET`, which may also be set in
/// a `.env` file in the working directory.
#[derive(Debug, Parser)]
#[command(name = "vodurls", version)]
struct Args {
    /// Live playback URL, e.g. https://fastly.live.brightcove.com/<resource>/<region>/<account>/<jwt>/playlist-hls.m3u8
    playback_url: String,

    #[arg(long, env = "CLIENT_ID", hide_env_values = true)]
    client_id: String,

    #[arg(long, env = "CLIENT_SECRET", hide_env_values = true)]
    client_secret: String,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 10)]
    timeout: u64,

    /// Manifest format of the VODs (hls or dash).
    #[arg(long, default_value_t = ManifestFormat::Hls)]
    manifest_format: ManifestFormat,

    #[arg(long, default_value = "https://oauth.brightcove.com")]
    oauth_url: String,

    #[arg(long, default_value = "https://api.live.brightcove.com")]
    api_url: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();

    // a missing .env is fine, the variables may come from the environment itself
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            return Err(e).context("load .env");
        }
    }

    let args = Args::parse();
    if args.client_id.is_empty() || args.client_secret.is_empty() {
        eyre::bail!("client credentials missing");
    }

    let client = LiveClient::new(
        Endpoints::new(args.oauth_url, args.api_url),
        Duration::from_secs(args.timeout),
    );
    let credentials = Credentials::new(args.client_id, args.client_secret);

    let urls = fetch_vod_urls(
        &client,
        &credentials,
        &args.playback_url,
        args.manifest_format,
    )
    .await?;

    println!();
    for (i, url) in urls.iter().enumerate() {
        println!("VOD URL[{i}]: {url}");
    }
    println!();

    Ok(())
}
