use geo_sssp::web::server::{start_server, ServerConfig};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    // Usage: web_server [port] [static_dir]
    let args: Vec<String> = env::args().collect();
    let defaults = ServerConfig::default();
    let port = match args.get(1) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            log::warn!("invalid port {:?}, using {}", raw, defaults.port);
            defaults.port
        }),
        None => defaults.port,
    };

    let config = ServerConfig {
        port,
        static_dir: args.get(2).cloned(),
        ..defaults
    };

    println!("Starting geo_sssp web server...");
    println!("Configuration:");
    println!("   Address: {}", config.addr());
    println!("   Static files: {}", config.static_dir.as_deref().unwrap_or("(none)"));
    println!("   CORS enabled: {}", config.enable_cors);
    println!("   Max sessions: {}", config.max_sessions);
    println!();

    start_server(config).await?;

    Ok(())
}
