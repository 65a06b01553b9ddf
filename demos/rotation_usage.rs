use log_follower::FollowOptions;
use std::io::{BufRead, BufReader};
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::StreamExt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let path = std::env::args().nth(1).unwrap_or_else(|| "app.log".to_string());

    let follower = Arc::new(
        FollowOptions::new()
            .poll_interval(Duration::from_millis(250))
            .watch(true)
            .open(&path)?,
    );
    let mut rotations = follower.rotations().expect("rotations are taken once");

    let reader = Arc::clone(&follower);
    let lines = tokio::task::spawn_blocking(move || {
        let mut count = 0;
        for line in BufReader::new(&*reader).lines() {
            match line {
                Ok(line) => {
                    count += 1;
                    println!("[{}]: {}", count, line);
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    break;
                }
            }
        }
    });

    // Stop after the second rotation.
    let mut seen = 0;
    while rotations.next().await.is_some() {
        seen += 1;
        println!("--- {} rotated ({} so far) ---", path, seen);
        if seen >= 2 {
            break;
        }
    }

    // The reader notices the close on its next attempt.
    follower.close()?;
    lines.await?;

    Ok(())
}
