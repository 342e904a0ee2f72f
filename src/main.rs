use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use tracing::info;
use tracing_subscriber::EnvFilter;
use truthguard_rs::client::{check_many, check_text, HttpVerifier};
use truthguard_rs::config::ClientConfig;
use truthguard_rs::report::{render, ReportContext, ReportFormat, ScanMode};
use truthguard_rs::server::{run_server, Engine};
use truthguard_rs::types::CheckRequest;
use truthguard_rs::{normalize, Normalized};

#[derive(Parser)]
#[command(name="truthguard", version, about = "Fact-check backend client and response normalizer")]
struct Cli {
  #[command(subcommand)]
  cmd: Cmd,
  #[command(flatten)]
  client: ClientConfig,
  /// Log filter used when RUST_LOG is unset
  #[arg(long, default_value="info", global = true)] log_level: String,
}

#[derive(Subcommand)]
enum Cmd {
  /// Normalize a raw backend response (JSON file, or - for stdin)
  Normalize { #[arg(long, default_value="-")] input_file: String },
  /// Send text to the backend and print the normalized result
  Check {
    #[arg(long, conflicts_with="input_file")] text: Option<String>,
    /// JSONL of {"text": ...} records
    #[arg(long)] input_file: Option<String>,
    #[arg(long, default_value_t=4)] concurrency: usize,
  },
  /// Render a report from a raw backend response
  Report {
    #[arg(long, default_value="-")] input_file: String,
    #[arg(long, value_enum, default_value_t=ReportFormat::Text)] format: ReportFormat,
    #[arg(long, value_enum, default_value_t=ScanMode::Full)] mode: ScanMode,
    #[arg(long)] url: Option<String>,
    #[arg(long)] page_title: Option<String>,
    /// File holding the checked text, shown as a preview
    #[arg(long)] content_file: Option<String>,
  },
  /// Serve /normalize and /verify over HTTP
  Serve { #[arg(long, default_value="127.0.0.1:8090")] addr: String },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
  tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

  match cli.cmd {
    Cmd::Normalize { input_file } => {
      let raw = read_json(&input_file).await?;
      print_json(&normalize(&raw))?;
    }
    Cmd::Check { text, input_file, concurrency } => {
      let verifier = HttpVerifier::new(&cli.client)?;
      match (text, input_file) {
        (Some(text), _) => print_json(&check_text(&verifier, &text).await?)?,
        (None, Some(path)) => {
          let texts = read_requests(&path).await?;
          info!(count = texts.len(), concurrency, "checking batch");
          for out in check_many(&verifier, texts, concurrency).await {
            println!("{}", serde_json::to_string(&out)?);
          }
        }
        (None, None) => bail!("either --text or --input-file is required"),
      }
    }
    Cmd::Report { input_file, format, mode, url, page_title, content_file } => {
      let raw = read_json(&input_file).await?;
      let verdict = match normalize(&raw) {
        Normalized::Verdict(v) => v,
        Normalized::Error { error } => bail!("backend returned an error: {error}"),
      };
      let content = match content_file {
        Some(p) => Some(tokio::fs::read_to_string(&p).await.with_context(|| format!("reading {p}"))?),
        None => None,
      };
      let ctx = ReportContext { url, page_title, content, ..ReportContext::new(mode) };
      print!("{}", render(format, &ctx, &verdict));
    }
    Cmd::Serve { addr } => {
      let verifier = HttpVerifier::new(&cli.client)?;
      info!(endpoint = %cli.client.endpoint, "forwarding /verify");
      run_server(Engine { verifier: Arc::new(verifier) }, &addr).await?;
    }
  }
  Ok(())
}

async fn read_input(path: &str) -> Result<String> {
  if path == "-" {
    let mut buf = String::new();
    tokio::io::stdin().read_to_string(&mut buf).await.context("reading stdin")?;
    Ok(buf)
  } else {
    tokio::fs::read_to_string(path).await.with_context(|| format!("reading {path}"))
  }
}

async fn read_json(path: &str) -> Result<Value> {
  let body = read_input(path).await?;
  serde_json::from_str(&body).with_context(|| format!("{path} is not valid JSON"))
}

async fn read_requests(path: &str) -> Result<Vec<String>> {
  let body = read_input(path).await?;
  body.lines()
    .enumerate()
    .filter(|(_, l)| !l.trim().is_empty())
    .map(|(i, l)| {
      serde_json::from_str::<CheckRequest>(l)
        .map(|r| r.text)
        .with_context(|| format!("{path}:{}: expected {{\"text\": ...}}", i + 1))
    })
    .collect()
}

fn print_json(out: &Normalized) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(out)?);
  Ok(())
}
