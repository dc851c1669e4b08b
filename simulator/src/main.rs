mod payload;

use clap::Parser;
use payload::ReadingPayload;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "simulator", about = "Posts simulated sensor readings to the readings service")]
struct Args {
    /// Readings endpoint
    #[arg(long, env = "READINGS_URL", default_value = "http://localhost:3000/api/dados")]
    url: String,

    /// Readings per second
    #[arg(long, env = "RATE", default_value_t = 10)]
    rate: u64,

    /// Number of simulated devices
    #[arg(long, env = "DEVICES", default_value_t = 5)]
    devices: usize,

    /// Stop after this many readings
    #[arg(long, env = "COUNT")]
    count: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    anyhow::ensure!(args.rate > 0, "--rate must be positive");
    anyhow::ensure!(args.devices > 0, "--devices must be positive");

    info!("Starting sensor simulator");
    info!(
        "Target: {}, Rate: {} readings/s, Devices: {}",
        args.url, args.rate, args.devices
    );

    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let mut rng = rand::thread_rng();
    let interval = Duration::from_micros((1_000_000 / args.rate).max(1));
    let mut ticker = tokio::time::interval(interval);
    let started = Instant::now();
    let mut sent = 0u64;
    let mut failed = 0u64;

    loop {
        if args.count.is_some_and(|count| sent + failed >= count) {
            break;
        }
        ticker.tick().await;

        let device = format!("sensor-{}", (sent + failed) % args.devices as u64);
        let payload = ReadingPayload::random(&mut rng, device);

        match client.post(&args.url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => sent += 1,
            Ok(response) => {
                failed += 1;
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                warn!("Reading rejected with {}: {}", status, body);
            }
            Err(e) => {
                failed += 1;
                error!("Failed to post reading: {}", e);
            }
        }

        if (sent + failed) % 100 == 0 {
            info!(
                "Posted {} readings ({} failed) in {:.1}s",
                sent,
                failed,
                started.elapsed().as_secs_f64()
            );
        }
    }

    info!("Done: {} posted, {} failed", sent, failed);
    Ok(())
}
