use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "calc-cli")]
#[command(about = "Command-line client for the calculator service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3005")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// num1 + num2
    Add { num1: String, num2: String },
    /// num1 - num2
    Subtract { num1: String, num2: String },
    /// num1 * num2
    Multiply { num1: String, num2: String },
    /// num1 / num2
    Divide { num1: String, num2: String },
    /// num1 ^ num2
    Power { num1: String, num2: String },
    /// num1 % num2
    Modulo { num1: String, num2: String },
    /// Square root of num
    Sqrt { num: String },
}

impl Commands {
    fn request(self) -> (&'static str, Vec<(&'static str, String)>) {
        match self {
            Commands::Health => ("/health", Vec::new()),
            Commands::Add { num1, num2 } => ("/add", pair(num1, num2)),
            Commands::Subtract { num1, num2 } => ("/subtract", pair(num1, num2)),
            Commands::Multiply { num1, num2 } => ("/multiply", pair(num1, num2)),
            Commands::Divide { num1, num2 } => ("/divide", pair(num1, num2)),
            Commands::Power { num1, num2 } => ("/power", pair(num1, num2)),
            Commands::Modulo { num1, num2 } => ("/modulo", pair(num1, num2)),
            Commands::Sqrt { num } => ("/sqrt", vec![("num", num)]),
        }
    }
}

fn pair(num1: String, num2: String) -> Vec<(&'static str, String)> {
    vec![("num1", num1), ("num2", num2)]
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let (path, query) = cli.command.request();
    let res = client
        .get(format!("{}{}", cli.url.trim_end_matches('/'), path))
        .query(&query)
        .send()
        .await?;

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let json: Value = res.json().await?;

    if status.is_success() {
        println!("{}", serde_json::to_string_pretty(&json)?);
    } else {
        eprintln!("Error: service returned status {}", status);
        eprintln!("{}", serde_json::to_string_pretty(&json)?);
    }
    Ok(())
}
