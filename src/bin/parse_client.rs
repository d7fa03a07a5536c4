//! Sample client: uploads a local PDF and prints the JSON response
//!
//! ```bash
//! cargo run --bin parse-client -- manual.pdf --expand-pages 7
//! ```

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "parse-client")]
#[command(about = "Upload a PDF to the TOC service and print the response")]
struct Cli {
    /// PDF file to upload
    #[arg(default_value = "manual.pdf")]
    file: PathBuf,

    /// Service base URL
    #[arg(long, default_value = "http://localhost:3000", env = "API_BASE")]
    api_base: String,

    /// Pages to read after each TOC entry
    #[arg(long, default_value_t = 7)]
    expand_pages: u32,

    /// Attach extracted text to each section record
    #[arg(long)]
    include_text: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let bytes = std::fs::read(&cli.file)?;
    let file_name = cli
        .file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload.pdf")
        .to_string();

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/pdf")?;
    let mut form = reqwest::multipart::Form::new()
        .part("pdf", part)
        .text("expand_pages", cli.expand_pages.to_string());
    if cli.include_text {
        form = form.text("include_text", "true");
    }

    let response = reqwest::Client::new()
        .post(format!("{}/parse-pdf", cli.api_base))
        .multipart(form)
        .send()
        .await?;

    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        anyhow::bail!("request failed with status {status}");
    }
    Ok(())
}
