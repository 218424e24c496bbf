//! Console bridge - serves a JavaScript console to an observer over stdin/stdout.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use js_console::{
    BoaEngine, ChannelTransport, ConsoleClient, ConsoleConfig, ConsoleEvent, ConsoleOutput,
    ConsoleRequest, ConsoleTransport,
};

/// Console bridge - JSON-lines console protocol over stdin/stdout
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Treat every input line as console input instead of a JSON request
    #[arg(long)]
    raw: bool,

    /// Maximum number of messages per catch-up response (0 = unlimited)
    #[arg(long, default_value = "0")]
    batch_limit: usize,

    /// Do not echo console output to the process log
    #[arg(long)]
    no_echo: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn console_config(&self) -> ConsoleConfig {
        ConsoleConfig::new()
            .with_echo_to_log(!self.no_echo)
            .with_batch_limit(self.batch_limit)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr; stdout carries the protocol.
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Console bridge v{}", env!("CARGO_PKG_VERSION"));

    let (transport, mut events) = ChannelTransport::channel();
    let transport = Arc::new(transport);
    let output = ConsoleOutput::new(transport.clone(), args.console_config());
    let engine = BoaEngine::new(output.clone())?;
    let mut client = ConsoleClient::new(engine, output)?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        if args.raw {
            client.handle_input(&line);
        } else {
            match ConsoleRequest::from_json(&line) {
                Ok(request) => {
                    debug!("Request: {:?}", request);
                    client.handle_request(request);
                }
                Err(err) => transport.did_misbehave(&err.to_string()),
            }
        }

        client.engine_mut().run_pending_jobs();
        flush_events(&mut events, &mut stdout).await?;
    }

    info!("Console bridge shutdown complete");
    Ok(())
}

/// Write every queued event to stdout as one JSON line each.
async fn flush_events(
    events: &mut UnboundedReceiver<ConsoleEvent>,
    stdout: &mut tokio::io::Stdout,
) -> Result<()> {
    while let Ok(event) = events.try_recv() {
        let mut line = event.to_json()?;
        line.push('\n');
        stdout.write_all(line.as_bytes()).await?;
    }
    stdout.flush().await?;
    Ok(())
}
