use log_follower::Follower;
use std::env;
use std::io;
use std::process;
use std::sync::Arc;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <file_path>", args[0]);
        process::exit(1);
    }

    let file_path = &args[1];

    let follower = match Follower::open(file_path) {
        Ok(follower) => Arc::new(follower),
        Err(e) => {
            eprintln!("Error opening {}: {}", file_path, e);
            process::exit(1);
        }
    };

    if let Some(mut rotations) = follower.rotations() {
        let name = follower.name();
        tokio::spawn(async move {
            while rotations.next().await.is_some() {
                tracing::info!(file = %name, "log rotated");
            }
        });
    }

    tracing::info!(file = %file_path, "following");

    let reader = Arc::clone(&follower);
    let copied = tokio::task::spawn_blocking(move || {
        let stdout = io::stdout();
        io::copy(&mut &*reader, &mut stdout.lock())
    })
    .await;

    match copied {
        Ok(Err(e)) => {
            eprintln!("Error reading file: {}", e);
            process::exit(1);
        }
        Ok(Ok(_)) => {}
        Err(e) => {
            eprintln!("Reader task failed: {}", e);
            process::exit(1);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("LOG_FOLLOWER_LOG")
        .unwrap_or_else(|_| EnvFilter::new("log_follower=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
