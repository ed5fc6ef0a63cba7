use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use secrecy::SecretString;
use url::Url;

use buildkite_relay::buildkite::BuildkiteClient;
use buildkite_relay::server::{create_app, ServerState};

#[derive(clap::Parser)]
struct Opts {
    /// URL of the Buildkite create-build endpoint of the target pipeline.
    #[arg(long, env = "BUILDKITE_URL")]
    buildkite_url: Url,

    /// Token used to authenticate against the Buildkite REST API.
    #[arg(long, env = "BUILDKITE_AUTH_TOKEN")]
    buildkite_auth_token: String,
}

async fn server(state: ServerState) -> anyhow::Result<()> {
    let app = create_app(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot listen on {addr}"))?;
    tracing::info!("Listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}

fn try_main(opts: Opts) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Cannot build tokio runtime")?;

    let buildkite = BuildkiteClient::new(
        opts.buildkite_url,
        SecretString::new(opts.buildkite_auth_token),
    )?;
    let state = ServerState::new(buildkite);

    runtime.block_on(server(state))
}

fn main() {
    tracing_subscriber::fmt::init();

    let opts = Opts::parse();
    if let Err(error) = try_main(opts) {
        eprintln!("Error: {error:?}");
        std::process::exit(1);
    }
}
