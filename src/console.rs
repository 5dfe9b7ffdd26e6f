//! Helpers shared by the console programs.

use crate::llm::LlmGateway;
use std::io::{self, BufRead, Write};
use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Log to stderr, filtered by `RUST_LOG` (default `warn`), so the chat stays readable
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Ask the backend for its models and describe the result for the console
///
/// A failure is reported with remediation hints; the caller keeps going either way.
pub async fn check_backend(gateway: &dyn LlmGateway, model: &str) -> String {
    match gateway.get_available_models().await {
        Ok(models) if models.is_empty() => {
            "Connected, but the server reports no loaded models.".to_string()
        }
        Ok(models) => {
            let mut report = format!("Connected. Available models: {}", models.join(", "));
            if !models.iter().any(|m| m == model) {
                report.push_str(&format!(
                    "\nNote: '{}' is not in that list; the server may substitute its loaded model.",
                    model
                ));
            }
            report
        }
        Err(e) => {
            warn!(error = %e, "Model server probe failed");
            format!(
                "Could not reach the model server: {}\n\
                 Make sure:\n\
                 1. LM Studio is running\n\
                 2. Server is started in LM Studio\n\
                 3. Port 1234 is correct",
                e
            )
        }
    }
}

/// Print `prompt` and read one line; `None` at end of input
pub fn read_line<R: BufRead>(reader: &mut R, prompt: &str) -> io::Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}
