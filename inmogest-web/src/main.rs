//! Inmogest Web Server
//!
//! HTTP backend for the Inmogest real-estate management system.

use clap::Parser;
use inmogest_core::init_logging;
use inmogest_web::server::InmogestServerBuilder;

/// Inmogest Web Server - real-estate management backend
#[derive(Parser)]
#[command(name = "inmogest-web")]
#[command(about = "HTTP backend for the Inmogest real-estate system")]
#[command(version)]
struct Args {
    /// Server host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Server port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Load environment variables before reading configuration
    dotenvy::dotenv().ok();

    // Set up logging
    init_logging(&args.log_level);

    // Create web configuration, then override with command line arguments
    let mut builder = InmogestServerBuilder::new();
    if let Some(host) = args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }

    let server = builder.build();

    println!("🚀 Starting Inmogest Web Server");
    println!(
        "📍 Server: http://{}",
        server.config().address()
    );
    println!(
        "📚 Swagger UI: http://{}/swagger-ui",
        server.config().address()
    );

    if let Err(e) = server.start().await {
        eprintln!("❌ Server failed: {}", e);
        std::process::exit(1);
    }
}
