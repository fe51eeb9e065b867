//! Binary entry point: configuration, operator prompts, and exit-code mapping.

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use kc_device_token::cli::Cli;
use kc_device_token::{render_token, Config, DeviceFlowClient, Error};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing();

    // Configuration failures are reported before any network activity.
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(&cli, &config).await {
        report(e);
        std::process::exit(1);
    }
}

/// Logs go to stderr; stdout is reserved for instructions and the token.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli, config: &Config) -> kc_device_token::Result<()> {
    let client = DeviceFlowClient::new(config);
    let authorization = client.start_device_authorization().await?;

    println!();
    println!("Open the following URL and enter the code:");
    println!("  {}", authorization.verification_uri);
    println!("Code:");
    println!("  {}", authorization.user_code);
    println!();
    println!("Device code expires in {}s", authorization.expires_in);

    wait_for_operator()?;

    let token = client.poll_until_complete(&authorization).await?;
    println!("{}", render_token(&token, cli.json)?);
    Ok(())
}

/// Acknowledgement gate: one line of stdin before polling starts, so the token
/// endpoint is not hammered while the operator is still switching to a browser.
fn wait_for_operator() -> std::io::Result<()> {
    print!("\nPress ENTER after completing login in the browser...");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(())
}

fn report(error: Error) {
    match error {
        // The raw body goes to stdout so it stays visible when stderr is
        // redirected.
        Error::NonJsonResponse { body } => {
            println!("Non-JSON response:");
            println!("{body}");
        }
        Error::IncompleteAuthorization { response } => {
            eprintln!("Missing device_code/user_code/verification_uri");
            let dump = serde_json::to_string_pretty(&response)
                .unwrap_or_else(|_| response.to_string());
            println!("{dump}");
        }
        other => eprintln!("{other}"),
    }
}
