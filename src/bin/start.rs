//! `spdev-start` - bring up the whole Smart Parking dev environment

use clap::Parser;
use smart_parking_dev::{run, Args, EntryPoint};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    let code = run(EntryPoint::Start, args).await;
    std::process::exit(code);
}
