//! Main chat loop orchestration.
//!
//! Reads one line per iteration, ends on a termination keyword or EOF, and
//! otherwise sends the line through the [`ChatSession`] and prints the reply.
//! A failed request ends the loop with an error.

use std::io::Write;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use gemtalk_core::chat::input::{InputAction, classify_input};
use gemtalk_core::chat::session::{ChatOptions, ChatSession};
use gemtalk_infra::llm::create_provider;
use gemtalk_infra::secret::EnvCredentialSource;
use gemtalk_types::chat::Turn;
use gemtalk_types::config::GlobalConfig;

use super::input::{ChatInput, InputEvent, LineSource};

/// Prompt shown before each user line.
pub const PROMPT: &str = "User: ";

const REPLY_DIVIDER_WIDTH: usize = 100;

/// Presentation knobs for [`drive`].
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Pause between "Quitting ..." and "Bye-bye!".
    pub farewell_pause: Duration,
    /// Color the role label.
    pub styled: bool,
    /// Show a spinner on stderr while waiting for a reply.
    pub spinner: bool,
}

/// How the loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    Keyword,
    Eof,
}

/// Run the interactive chat against Gemini until the user leaves.
pub async fn run_chat_loop(config: &GlobalConfig, model: Option<String>) -> anyhow::Result<()> {
    let api_key = EnvCredentialSource::default().api_key()?;
    let model = model.unwrap_or_else(|| config.chat_model.clone());
    let provider = create_provider(config, &model, api_key)?;

    let options = ChatOptions {
        system: config.system_prompt.clone(),
        temperature: config.temperature,
        max_tokens: config.max_output_tokens,
        ..ChatOptions::new(model)
    };
    let mut session = ChatSession::new(provider, options);

    let (mut input, mut out) = ChatInput::open(PROMPT)
        .map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let interactive = input.is_terminal();
    let settings = LoopSettings {
        farewell_pause: Duration::from_millis(config.farewell_pause_ms),
        styled: interactive,
        spinner: interactive,
    };

    info!(
        model = session.model(),
        provider = session.provider_name(),
        interactive,
        "Starting chat session"
    );
    let result = drive(&mut session, &mut input, &mut *out, &settings).await;
    input.flush();

    let exit = result?;
    info!(turns = session.transcript().len(), ?exit, "Chat session ended");
    Ok(())
}

/// Drive the read/send/print cycle over any line source and writer.
pub async fn drive<S, W>(
    session: &mut ChatSession,
    input: &mut S,
    out: &mut W,
    settings: &LoopSettings,
) -> anyhow::Result<LoopExit>
where
    S: LineSource,
    W: Write + ?Sized,
{
    loop {
        let line = match input.read_line().await {
            InputEvent::Line(line) => line,
            InputEvent::Eof => {
                farewell(out, settings).await?;
                return Ok(LoopExit::Eof);
            }
            InputEvent::Interrupted => {
                writeln!(
                    out,
                    "{}",
                    style("(type exit, quit or bye to leave)").dim()
                )?;
                continue;
            }
        };

        let text = match classify_input(&line) {
            InputAction::Quit => {
                farewell(out, settings).await?;
                return Ok(LoopExit::Keyword);
            }
            InputAction::Skip => continue,
            InputAction::Send(text) => text,
        };

        let spinner = settings.spinner.then(thinking_spinner);
        let result = session.send(&text).await;
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }

        match result {
            Ok(turn) => print_reply(out, turn, settings.styled)?,
            Err(err) => {
                error!(error = %err, "Chat request failed");
                return Err(anyhow::Error::new(err).context("chat request failed"));
            }
        }
    }
}

fn print_reply<W: Write + ?Sized>(out: &mut W, turn: &Turn, styled: bool) -> std::io::Result<()> {
    let label = turn.role().label();
    if styled {
        writeln!(out, "{}: {}", style(label).cyan().bold(), turn.text())?;
    } else {
        writeln!(out, "{label}: {}", turn.text())?;
    }
    writeln!(out, "\n{}\n", "*".repeat(REPLY_DIVIDER_WIDTH))?;
    out.flush()
}

async fn farewell<W: Write + ?Sized>(out: &mut W, settings: &LoopSettings) -> std::io::Result<()> {
    writeln!(out, "Quitting ...")?;
    out.flush()?;
    tokio::time::sleep(settings.farewell_pause).await;
    writeln!(out, "Bye-bye!")?;
    out.flush()
}

fn thinking_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message("thinking...");
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}
