//! Runtime configuration resolved once at startup.
//!
//! Values come from the process environment (after `.env` is loaded by the binaries),
//! but resolution goes through a lookup function so it can be exercised without
//! touching global state.

use crate::error::{Result, TeamError};
use crate::llm::gateway::CompletionConfig;
use crate::llm::gateways::openai::{OpenAIConfig, DEFAULT_BASE_URL, PLACEHOLDER_API_KEY};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "local-model";
pub const DEFAULT_TRACE_PROJECT: &str = "default";
pub const DEFAULT_TRACE_ENDPOINT: &str = "https://api.smith.langchain.com";
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Credentials and destination for the run-trace sink
#[derive(Debug, Clone, PartialEq)]
pub struct TraceSettings {
    pub api_key: String,
    pub project: String,
    pub endpoint: String,
}

/// Whether run traces are published, decided once at startup
#[derive(Debug, Clone, PartialEq)]
pub enum TraceConfig {
    Disabled { reason: String },
    Enabled(TraceSettings),
}

impl TraceConfig {
    /// Resolve trace settings from `LANGSMITH_*` variables
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(api_key) = non_empty(lookup("LANGSMITH_API_KEY")) else {
            return TraceConfig::Disabled {
                reason: "LangSmith environment variables not set.".to_string(),
            };
        };

        let flag = lookup("LANGSMITH_TRACING").unwrap_or_default();
        if !flag.trim().eq_ignore_ascii_case("true") {
            return TraceConfig::Disabled {
                reason: "LANGSMITH_TRACING is not set to \"true\".".to_string(),
            };
        }

        TraceConfig::Enabled(TraceSettings {
            api_key,
            project: non_empty(lookup("LANGSMITH_PROJECT"))
                .unwrap_or_else(|| DEFAULT_TRACE_PROJECT.to_string()),
            endpoint: non_empty(lookup("LANGSMITH_ENDPOINT"))
                .unwrap_or_else(|| DEFAULT_TRACE_ENDPOINT.to_string()),
        })
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, TraceConfig::Enabled(_))
    }

    pub fn settings(&self) -> Option<&TraceSettings> {
        match self {
            TraceConfig::Enabled(settings) => Some(settings),
            TraceConfig::Disabled { .. } => None,
        }
    }
}

impl fmt::Display for TraceConfig {
    /// Console banner describing the trace setup
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceConfig::Enabled(settings) => {
                writeln!(f, "=== LANGSMITH TRACING ENABLED ===")?;
                writeln!(f, "Project: {}", settings.project)?;
                write!(f, "View traces at: https://smith.langchain.com/")
            }
            TraceConfig::Disabled { reason } => {
                writeln!(f, "=== LANGSMITH SETUP INFORMATION ===")?;
                writeln!(f, "{} To enable tracing:", reason)?;
                writeln!(f, "1. Sign up at https://smith.langchain.com/")?;
                writeln!(f, "2. Set these environment variables:")?;
                writeln!(f, "   export LANGSMITH_TRACING=\"true\"")?;
                writeln!(f, "   export LANGSMITH_API_KEY=\"your-api-key\"")?;
                writeln!(f, "   export LANGSMITH_PROJECT=\"default\" # or any project name")?;
                write!(f, "\nRunning without LangSmith tracing...")
            }
        }
    }
}

/// Everything the console programs need to talk to the backend
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub backend: OpenAIConfig,
    pub model: String,
    pub completion: CompletionConfig,
    pub tracing: TraceConfig,
}

impl AppConfig {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs: u64 = parse_or(&lookup, "LLM_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let temperature: f32 =
            parse_or(&lookup, "LLM_TEMPERATURE", CompletionConfig::default().temperature)?;

        let backend = OpenAIConfig {
            api_key: non_empty(lookup("OPENAI_API_KEY"))
                .unwrap_or_else(|| PLACEHOLDER_API_KEY.to_string()),
            base_url: non_empty(lookup("OPENAI_API_ENDPOINT"))
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            timeout: (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs)),
        };

        Ok(Self {
            backend,
            model: non_empty(lookup("LLM_MODEL")).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            completion: CompletionConfig {
                temperature,
                ..Default::default()
            },
            tracing: TraceConfig::from_lookup(&lookup),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match non_empty(lookup(key)) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| TeamError::ConfigError(format!("{} has invalid value '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.backend.base_url, "http://localhost:1234/v1");
        assert_eq!(config.backend.api_key, "not-needed");
        assert_eq!(config.backend.timeout, Some(Duration::from_secs(120)));
        assert_eq!(config.model, "local-model");
        assert_eq!(config.completion.temperature, 0.7);
        assert!(!config.tracing.is_enabled());
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("OPENAI_API_ENDPOINT", "http://gpu-box:8080/v1"),
            ("OPENAI_API_KEY", "sk-test"),
            ("LLM_MODEL", "qwen2.5-7b-instruct"),
            ("LLM_TEMPERATURE", "0.2"),
            ("LLM_TIMEOUT_SECS", "30"),
        ]))
        .unwrap();

        assert_eq!(config.backend.base_url, "http://gpu-box:8080/v1");
        assert_eq!(config.backend.api_key, "sk-test");
        assert_eq!(config.backend.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.model, "qwen2.5-7b-instruct");
        assert_eq!(config.completion.temperature, 0.2);
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = AppConfig::from_lookup(lookup_from(&[("LLM_TIMEOUT_SECS", "0")])).unwrap();
        assert_eq!(config.backend.timeout, None);
    }

    #[test]
    fn test_invalid_number_is_config_error() {
        let result = AppConfig::from_lookup(lookup_from(&[("LLM_TEMPERATURE", "warm")]));

        match result {
            Err(TeamError::ConfigError(msg)) => assert!(msg.contains("LLM_TEMPERATURE")),
            other => panic!("Expected ConfigError, got {:?}", other),
        }
    }

    #[test]
    fn test_tracing_disabled_without_api_key() {
        let config = TraceConfig::from_lookup(lookup_from(&[("LANGSMITH_TRACING", "true")]));

        match &config {
            TraceConfig::Disabled { reason } => assert!(reason.contains("not set")),
            other => panic!("Expected Disabled, got {:?}", other),
        }
        assert!(config.to_string().contains("Running without LangSmith tracing..."));
    }

    #[test]
    fn test_tracing_disabled_without_flag() {
        let config = TraceConfig::from_lookup(lookup_from(&[("LANGSMITH_API_KEY", "ls-key")]));

        assert!(!config.is_enabled());
        assert!(config.settings().is_none());
    }

    #[test]
    fn test_tracing_enabled_with_defaults() {
        let config = TraceConfig::from_lookup(lookup_from(&[
            ("LANGSMITH_TRACING", "TRUE"),
            ("LANGSMITH_API_KEY", "ls-key"),
        ]));

        let settings = config.settings().unwrap();
        assert_eq!(settings.api_key, "ls-key");
        assert_eq!(settings.project, "default");
        assert_eq!(settings.endpoint, "https://api.smith.langchain.com");
        assert!(config.to_string().contains("Project: default"));
    }

    #[test]
    fn test_tracing_custom_project_and_endpoint() {
        let config = TraceConfig::from_lookup(lookup_from(&[
            ("LANGSMITH_TRACING", "true"),
            ("LANGSMITH_API_KEY", "ls-key"),
            ("LANGSMITH_PROJECT", "agent-team-dev"),
            ("LANGSMITH_ENDPOINT", "http://localhost:1984"),
        ]));

        let settings = config.settings().unwrap();
        assert_eq!(settings.project, "agent-team-dev");
        assert_eq!(settings.endpoint, "http://localhost:1984");
    }
}
