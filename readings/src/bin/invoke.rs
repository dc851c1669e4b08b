//! Handles a single request and exits.
//!
//! Prints `{"statusCode", "headers", "body"}` to stdout, the shape expected by
//! function-style hosts. Logs go to stderr.

use anyhow::Context;
use axum::http::Method;
use clap::Parser;
use readings::config::Config;
use readings::model::ReadingsQuery;
use readings::service::ApiRequest;
use readings::{build_service, init_tracing};
use std::io::Read;

#[derive(Debug, Parser)]
#[command(name = "readings-invoke", about = "Handle one /api/dados request")]
struct Args {
    /// HTTP method (GET, POST, OPTIONS, ...)
    #[arg(short = 'X', long, default_value = "GET")]
    method: String,

    /// Maximum number of readings to return
    #[arg(long)]
    limite: Option<String>,

    /// Only return readings from this device
    #[arg(long)]
    dispositivo: Option<String>,

    /// JSON request body; `-` reads it from stdin
    #[arg(short, long)]
    body: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing(true);

    let args = Args::parse();
    let method = Method::from_bytes(args.method.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid method {:?}", args.method))?;

    let body = match args.body.as_deref() {
        Some("-") => {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read body from stdin")?;
            buffer
        }
        Some(body) => body.as_bytes().to_vec(),
        None => Vec::new(),
    };

    let config = Config::from_env();
    let service = build_service(&config);

    let request = ApiRequest::new(method)
        .with_query(ReadingsQuery {
            limit: args.limite,
            device: args.dispositivo,
        })
        .with_body(body);
    let response = service.handle(request).await;

    println!("{}", response.to_invocation());

    Ok(())
}
