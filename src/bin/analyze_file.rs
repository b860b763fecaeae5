use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use reqwest::multipart::{Form, Part};
use serde_json::Value;

#[derive(Parser)]
#[command(
    name = "analyze-file",
    about = "Upload a local document to a running analyzer and print the result"
)]
struct Cli {
    /// Document to analyze (.pdf, .docx, .doc, or .txt).
    path: PathBuf,
    /// Base URL of the analyzer service.
    #[arg(long, default_value = "http://127.0.0.1:8000")]
    server: String,
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();
    let bytes = tokio::fs::read(&cli.path)
        .await
        .with_context(|| format!("failed to read {}", cli.path.display()))?;
    let filename = cli
        .path
        .file_name()
        .and_then(|name| name.to_str())
        .context("path has no usable file name")?
        .to_string();

    let form = Form::new().part("file", Part::bytes(bytes).file_name(filename));
    let url = format!("{}/analyze", cli.server.trim_end_matches('/'));
    let response = reqwest::Client::new()
        .post(&url)
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("failed to reach {url}"))?;

    let status = response.status();
    let body: Value = response
        .json()
        .await
        .context("analyzer returned a non-JSON body")?;

    if !status.is_success() {
        let detail = body
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or("no detail provided");
        bail!("analyzer returned {status}: {detail}");
    }

    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
