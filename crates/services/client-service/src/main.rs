//! Client Service - command line access to client management.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use client_service_lib::config::ClientServiceConfig;
use client_service_lib::ServiceContext;
use common::OptionExt;
use domain::ClientDetails;

#[derive(Parser)]
#[command(name = "client-service")]
#[command(about = "Client management service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new client
    Create {
        /// Trade name (at least 3 characters)
        #[arg(long)]
        name: String,
        /// CNPJ, with or without punctuation
        #[arg(long)]
        cnpj: String,
    },
    /// Show a client by ID
    Get {
        #[arg(long)]
        id: i64,
    },
    /// List all clients
    List,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = ClientServiceConfig::from_env();
    let context = ServiceContext::init(&config).await?;
    let service = context.service();

    let outcome = match cli.command {
        Commands::Create { name, cnpj } => service
            .create_client(&name, &cnpj)
            .await
            .map(|client| serde_json::to_string_pretty(&ClientDetails::from(client))),
        Commands::Get { id } => service
            .get_client(id)
            .await
            .and_then(|client| client.ok_or_not_found())
            .map(|client| serde_json::to_string_pretty(&ClientDetails::from(client))),
        Commands::List => service.list_clients().await.map(|clients| {
            let details: Vec<ClientDetails> = clients.iter().map(ClientDetails::from).collect();
            serde_json::to_string_pretty(&details)
        }),
    };

    context.shutdown().await?;

    match outcome {
        Ok(json) => {
            println!("{}", json?);
            Ok(())
        }
        Err(e) => Err(e.user_message().into()),
    }
}
