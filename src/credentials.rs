//! Username/password acquisition for the data pool.
//!
//! Credentials are obtained exactly once, before any product is attempted, through a
//! [`CredentialSource`]. Two sources exist: a two-line settings file and an
//! interactive prompt on the terminal.

use crate::errors::{AppError, AppResult};
use std::fmt;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Account used to log in to the data pool.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

// Keep the password out of logs.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

pub trait CredentialSource {
    fn obtain(&self) -> AppResult<Credentials>;
}

/// Settings file whose first line is the username and second line the password.
#[derive(Debug, Clone)]
pub struct SettingsFile {
    path: PathBuf,
}

impl SettingsFile {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl CredentialSource for SettingsFile {
    fn obtain(&self) -> AppResult<Credentials> {
        let contents = fs::read_to_string(&self.path).map_err(|e| {
            AppError::Credentials(format!(
                "Failed to read settings file {}: {e}",
                self.path.display()
            ))
        })?;
        parse_settings(&contents).ok_or_else(|| {
            AppError::Credentials(format!(
                "Settings file {} must contain a non-empty username line and a password line",
                self.path.display()
            ))
        })
    }
}

/// Parses the two-line settings format. Surrounding whitespace is trimmed.
///
/// Returns `None` when either line is missing or the username is blank.
pub fn parse_settings(contents: &str) -> Option<Credentials> {
    let mut lines = contents.lines();
    let username = lines.next()?.trim();
    let password = lines.next()?.trim();
    if username.is_empty() {
        return None;
    }
    Some(Credentials::new(username, password))
}

/// Asks for the username and password on the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct InteractivePrompt;

impl CredentialSource for InteractivePrompt {
    fn obtain(&self) -> AppResult<Credentials> {
        let stdin = io::stdin();
        let mut stderr = io::stderr();
        prompt_credentials(&mut stdin.lock(), &mut stderr)
    }
}

/// Prompts on `output` and reads one line for each field from `input`.
pub fn prompt_credentials<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
) -> AppResult<Credentials> {
    let username = prompt_line(input, output, "Insert username (usually anonymous): ")?;
    let password = prompt_line(input, output, "Insert password (your mail): ")?;
    Ok(Credentials::new(&username, &password))
}

fn prompt_line<R: BufRead, W: Write>(input: &mut R, output: &mut W, label: &str) -> AppResult<String> {
    write!(output, "{label}")?;
    output.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(AppError::Credentials(
            "Input closed before credentials were entered".to_string(),
        ));
    }
    Ok(line.trim().to_string())
}
