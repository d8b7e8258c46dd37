use std::time::Duration;

use clap::{Parser, Subcommand};
use serde_json::Value;

use optic::client::Call;
use optic::{Client, ClientConfig, InvokeError};

#[derive(Parser)]
#[command(name = "optic-cli")]
#[command(about = "Call routes of an optic service with JSON payloads", long_about = None)]
struct Cli {
    /// Base URL of the service, including its base path.
    #[arg(short, long, default_value = "http://localhost:4444/")]
    url: String,

    /// Token sent as the Authorization header.
    #[arg(short, long)]
    token: Option<String>,

    /// Call deadline in seconds.
    #[arg(long, default_value_t = 6)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// POST a JSON body to a route
    Call {
        path: String,
        #[arg(default_value = "{}")]
        body: String,
    },
    /// GET a route with key=value query parameters
    Get {
        path: String,
        params: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = ClientConfig::new(cli.url);
    config.auth_token = cli.token;
    config.timeout_secs = cli.timeout;
    let client = Client::new(config)?;

    let result = match cli.command {
        Commands::Call { path, body } => {
            let body: Value = serde_json::from_str(&body)?;
            client.call(&path).timeout(Duration::from_secs(cli.timeout)).send::<_, Value>(&body).await
        }
        Commands::Get { path, params } => {
            let call = params.iter().try_fold(client.call(&path).get(), |call: Call<'_>, param| {
                param
                    .split_once('=')
                    .map(|(k, v)| call.query(k, v))
                    .ok_or_else(|| format!("query parameter '{}' is not key=value", param))
            })?;
            call.send_empty::<Value>().await
        }
    };

    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        Err(InvokeError::Remote(wire)) => {
            eprintln!("Error: service returned status {}", wire.code);
            eprintln!("{}", serde_json::to_string_pretty(&wire)?);
            Err(wire.into())
        }
        Err(InvokeError::Transport(e)) => Err(e.into()),
    }
}
