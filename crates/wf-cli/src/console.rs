//! Line-oriented prompt over any reader/writer pair

use std::fmt::Display;
use std::io::{self, BufRead, Write};

use wf_core::error::WfError;
use wf_core::result::WfResult;

/// Reads answers from `input` and writes prompts to `output`
pub struct Prompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Print one line
    pub fn say(&mut self, line: impl Display) -> io::Result<()> {
        writeln!(self.output, "{line}")
    }

    pub fn blank(&mut self) -> io::Result<()> {
        writeln!(self.output)
    }

    pub fn heading(&mut self, title: &str) -> io::Result<()> {
        let rule = "=".repeat(60);
        self.blank()?;
        writeln!(self.output, "{rule}")?;
        writeln!(self.output, "{title:^60}")?;
        writeln!(self.output, "{rule}")
    }

    /// Trimmed answer; end of input is an `UnexpectedEof` error
    pub fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// `None` for an empty answer
    pub fn ask_optional(&mut self, label: &str) -> io::Result<Option<String>> {
        let answer = self.ask(label)?;
        Ok((!answer.is_empty()).then_some(answer))
    }

    /// Keep `current` on an empty answer
    pub fn ask_or_keep(&mut self, label: &str, current: &str) -> io::Result<String> {
        let answer = self.ask(&format!("{label} [{current}]"))?;
        Ok(if answer.is_empty() {
            current.to_string()
        } else {
            answer
        })
    }

    /// Parse an answer, reporting unparseable input as a validation error on `field`
    pub fn ask_parsed<T: std::str::FromStr>(&mut self, label: &str, field: &str) -> WfResult<T> {
        let answer = self.ask(label)?;
        answer
            .parse()
            .map_err(|_| WfError::invalid(field, format!("is not valid: '{answer}'")))
    }

    pub fn confirm(&mut self, label: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{label} (y/n)"))?;
        Ok(matches!(answer.to_lowercase().as_str(), "y" | "yes" | "s" | "si" | "sí"))
    }

    /// Render an error for the user
    pub fn error(&mut self, err: &WfError) -> io::Result<()> {
        match err {
            WfError::Validation(errors) => {
                for message in errors.full_messages() {
                    writeln!(self.output, "[ERROR] {message}")?;
                }
                Ok(())
            }
            other => writeln!(self.output, "[ERROR] {other}"),
        }
    }

    pub fn ok(&mut self, message: impl Display) -> io::Result<()> {
        writeln!(self.output, "[OK] {message}")
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

/// Whether the error means the input stream is gone
pub fn is_end_of_input(err: &WfError) -> bool {
    matches!(err, WfError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
}
