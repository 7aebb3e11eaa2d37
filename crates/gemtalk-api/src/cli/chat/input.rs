//! Line input for the chat loop.
//!
//! Interactive terminals get `rustyline_async` line editing. When stdin is
//! a pipe or file, lines are read with a plain buffered reader and the
//! prompt is written to stdout by hand.

use std::future::Future;
use std::io::{IsTerminal, Write};

use rustyline_async::{Readline, ReadlineError, ReadlineEvent};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Events produced by an input source.
#[derive(Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// A submitted line, without the trailing newline.
    Line(String),
    /// End of input (Ctrl+D or closed pipe).
    Eof,
    /// Interrupt signal (Ctrl+C).
    Interrupted,
}

/// Anything the chat loop can read user lines from.
pub trait LineSource {
    fn read_line(&mut self) -> impl Future<Output = InputEvent>;
}

/// Stdin-backed input for the chat loop.
pub enum ChatInput {
    Terminal(Readline),
    Piped {
        prompt: String,
        lines: Lines<BufReader<Stdin>>,
    },
}

impl ChatInput {
    /// Open stdin with the given prompt.
    ///
    /// Returns the input and the writer that chat output should go through.
    /// On a terminal that writer is a `SharedWriter`, which keeps printed
    /// text from clobbering the prompt line.
    pub fn open(prompt: &str) -> Result<(Self, Box<dyn Write + Send>), ReadlineError> {
        if std::io::stdin().is_terminal() {
            let (rl, writer) = Readline::new(prompt.to_string())?;
            Ok((Self::Terminal(rl), Box::new(writer)))
        } else {
            let lines = BufReader::new(tokio::io::stdin()).lines();
            let input = Self::Piped {
                prompt: prompt.to_string(),
                lines,
            };
            Ok((input, Box::new(std::io::stdout())))
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Flush anything still buffered by the line editor.
    pub fn flush(&mut self) {
        if let Self::Terminal(rl) = self {
            let _ = rl.flush();
        }
    }
}

impl LineSource for ChatInput {
    async fn read_line(&mut self) -> InputEvent {
        match self {
            Self::Terminal(rl) => match rl.readline().await {
                Ok(ReadlineEvent::Line(line)) => {
                    let _ = rl.add_history_entry(line.clone());
                    InputEvent::Line(line)
                }
                Ok(ReadlineEvent::Eof) => InputEvent::Eof,
                Ok(ReadlineEvent::Interrupted) => InputEvent::Interrupted,
                Err(err) => {
                    tracing::warn!(error = %err, "Line editor failed, ending input");
                    InputEvent::Eof
                }
            },
            Self::Piped { prompt, lines } => {
                {
                    let mut stdout = std::io::stdout().lock();
                    let _ = write!(stdout, "{prompt}");
                    let _ = stdout.flush();
                }
                match lines.next_line().await {
                    Ok(Some(line)) => InputEvent::Line(line),
                    Ok(None) => InputEvent::Eof,
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to read stdin, ending input");
                        InputEvent::Eof
                    }
                }
            }
        }
    }
}
