use log_follower::Follower;
use std::io::{BufRead, BufReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Print lines mentioning ntpd as they are appended, across rotations.
    let follower = Follower::open("/var/log/messages")?;

    println!("Following {} ...", follower.name());

    for line in BufReader::new(follower).lines() {
        let line = line?;
        if line.contains("ntpd") {
            println!("{}", line);
        }
    }

    Ok(())
}
