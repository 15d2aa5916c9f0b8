#[tokio::main]
async fn main() {
    // RUST_LOG overrides; default to info so state transitions are visible
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = talentscout_lib::run().await {
        eprintln!("Error running application: {:#}", e);
        std::process::exit(1);
    }
}
