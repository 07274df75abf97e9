use clap::{Parser, Subcommand};
use common::{NewWhisper, UpdateWhisper, Whisper};
use reqwest::{Client, StatusCode};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// API base URL
    #[arg(short, long, default_value = "http://127.0.0.1:3000/api/v1")]
    api: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every whisper
    List,

    /// Show a single whisper
    Get { id: u64 },

    /// Create a whisper
    Send { message: String },

    /// Replace the message of a whisper
    Update { id: u64, message: String },

    /// Delete a whisper
    Delete { id: u64 },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = Client::new();
    let base = cli.api.trim_end_matches('/');

    match cli.command {
        Commands::List => {
            let resp = client
                .get(format!("{base}/whisper"))
                .send()
                .await?
                .error_for_status()?;
            let list: Vec<Whisper> = resp.json().await?;
            for w in list {
                println!("[{}] {}", w.id, w.message);
            }
        }

        Commands::Get { id } => {
            let resp = client.get(format!("{base}/whisper/{id}")).send().await?;
            let resp = found_or_exit(resp, id)?;
            let whisper: Whisper = resp.json().await?;
            println!("[{}] {}", whisper.id, whisper.message);
        }

        Commands::Send { message } => {
            let resp = client
                .post(format!("{base}/whisper"))
                .json(&NewWhisper { message })
                .send()
                .await?
                .error_for_status()?;
            let created: Whisper = resp.json().await?;
            println!("created whisper {}", created.id);
        }

        Commands::Update { id, message } => {
            let resp = client
                .patch(format!("{base}/whisper/{id}"))
                .json(&UpdateWhisper { message })
                .send()
                .await?;
            found_or_exit(resp, id)?;
            println!("updated whisper {id}");
        }

        Commands::Delete { id } => {
            let resp = client.delete(format!("{base}/whisper/{id}")).send().await?;
            found_or_exit(resp, id)?;
            println!("deleted whisper {id}");
        }
    }

    Ok(())
}

fn found_or_exit(
    resp: reqwest::Response,
    id: u64,
) -> Result<reqwest::Response, reqwest::Error> {
    if resp.status() == StatusCode::NOT_FOUND {
        eprintln!("whisper {id} not found");
        std::process::exit(1);
    }
    resp.error_for_status()
}
