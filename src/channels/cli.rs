//! CLI channel: stdin/stdout REPL for local testing.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::error;

use crate::guidance::CareerAgent;

/// A REPL around a single conversation.
///
/// Lines starting with `/` are commands: `/restart`, `/lang en|mr`, `/quit`.
/// Everything else is passed to the agent.
pub struct CliChannel {
    agent: CareerAgent,
}

impl CliChannel {
    pub fn new(agent: CareerAgent) -> Self {
        Self { agent }
    }

    /// Run on the process's stdin and stdout until EOF or `/quit`.
    pub async fn run(self) -> std::io::Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = tokio::io::stdout();
        self.run_with(reader, writer).await
    }

    pub async fn run_with<R, W>(mut self, reader: R, mut writer: W) -> std::io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        write_block(&mut writer, &self.agent.welcome_message()).await?;

        loop {
            eprint!("> ");
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    error!("Error reading stdin: {}", e);
                    break;
                }
            };
            let line = line.trim();

            if let Some(command) = line.strip_prefix('/') {
                let mut parts = command.split_whitespace();
                match (parts.next(), parts.next()) {
                    (Some("quit" | "exit"), _) => break,
                    (Some("restart"), _) => {
                        self.agent.reset();
                        write_block(&mut writer, &self.agent.welcome_message()).await?;
                    }
                    (Some("lang"), Some(code)) => {
                        let message = if self.agent.set_language(code) {
                            format!("Language set to {}", self.agent.language())
                        } else {
                            format!("Unsupported language: {code} (use en or mr)")
                        };
                        write_block(&mut writer, &message).await?;
                    }
                    _ => write_block(&mut writer, "Commands: /restart, /lang en|mr, /quit").await?,
                }
                continue;
            }

            let reply = self.agent.process_input(line).await;
            write_block(&mut writer, &reply.response).await?;
        }

        writer.flush().await
    }
}

async fn write_block<W: AsyncWrite + Unpin>(writer: &mut W, text: &str) -> std::io::Result<()> {
    writer.write_all(format!("\n{text}\n\n").as_bytes()).await?;
    writer.flush().await
}
