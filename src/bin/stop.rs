//! `spdev-stop` - stop containers, the backend and the Flutter app

use clap::Parser;
use smart_parking_dev::{run, Args, EntryPoint};

#[tokio::main]
async fn main() {
    let code = run(EntryPoint::Stop, Args::parse()).await;
    std::process::exit(code);
}
