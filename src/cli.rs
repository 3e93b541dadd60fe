use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::models::Session;
use crate::services::conversation::Assistant;

const SEPARATOR: &str = "-------------------------------------------";

/// House Whisper chat interface for managing appointments.
#[derive(Debug, Clone, Parser)]
#[command(name = "housewhisper", version)]
pub struct Args {
    /// Agent ID (default: 1)
    #[arg(long)]
    pub agent: Option<String>,

    /// Client ID (default: 1)
    #[arg(long)]
    pub client: Option<String>,

    /// OpenAI API key (falls back to API_KEY in the environment or .env)
    #[arg(long = "api-key")]
    pub api_key: Option<String>,

    /// Backend server URL (default: http://localhost:8000)
    #[arg(long)]
    pub server: Option<String>,

    /// Chat model to use
    #[arg(long)]
    pub model: Option<String>,
}

pub fn print_banner<W: Write>(output: &mut W, session: &Session) -> std::io::Result<()> {
    writeln!(output, "House Whisper Chat Interface")?;
    writeln!(output, "Agent ID: {}", session.agent_id())?;
    writeln!(output, "Client ID: {}", session.client_id())?;
    writeln!(output, "Type your message or 'exit' to quit")?;
    writeln!(output, "{SEPARATOR}")?;
    output.flush()
}

fn is_exit(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Reads one message per line until `exit` or end of input.
pub async fn run_chat<R, W>(
    assistant: &Assistant,
    session: &mut Session,
    input: R,
    output: &mut W,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        if is_exit(&line) {
            writeln!(output, "Goodbye!")?;
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }

        writeln!(output, "Processing...")?;
        output.flush()?;

        let reply = assistant.process_message(session, message).await;

        writeln!(output, "Assistant: {reply}")?;
        writeln!(output, "{SEPARATOR}")?;
        writeln!(output, "You:")?;
        output.flush()?;
    }

    tracing::debug!(turns = session.history().len(), "chat session ended");
    Ok(())
}
