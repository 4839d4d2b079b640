//! Configuration for the finance assistant

use crate::error::{FinanceError, Result};
use agent_llm::LLMProvider;
use agent_llm::providers::{GROQ_API_BASE, OpenAIConfig, OpenAIProvider};
use agent_utils::{var_opt, var_or, var_parse};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Default dispatch endpoint base URL
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5001";
/// Default chat model
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_SERVER_PORT: u16 = 5001;
const DEFAULT_DASHBOARD_PORT: u16 = 8501;
const DEFAULT_LLM_TIMEOUT: Duration = Duration::from_secs(60);

/// Runtime configuration shared by the server, dashboard and CLI
#[derive(Debug, Clone)]
pub struct FinanceConfig {
    /// Base URL of the dispatch endpoint
    pub server_url: String,

    /// Port the dispatch server binds to
    pub server_port: u16,

    /// Port the dashboard binds to
    pub dashboard_port: u16,

    /// Groq credential; only required by components that call the model
    pub api_key: Option<String>,

    /// OpenAI-compatible API base
    pub api_base: String,

    /// Chat model identifier
    pub model: String,

    /// Timeout for language-model requests
    pub llm_timeout: Duration,
}

impl Default for FinanceConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            dashboard_port: DEFAULT_DASHBOARD_PORT,
            api_key: None,
            api_base: GROQ_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            llm_timeout: DEFAULT_LLM_TIMEOUT,
        }
    }
}

impl FinanceConfig {
    /// Create a new configuration builder
    pub fn builder() -> FinanceConfigBuilder {
        FinanceConfigBuilder::default()
    }

    /// Read configuration from the process environment
    ///
    /// Call [`agent_utils::load_dotenv`] first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        FinanceConfigBuilder::from_env()?.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.server_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FinanceError::Config(format!(
                "server URL must be http(s), got '{}'",
                self.server_url
            )));
        }

        if self.model.trim().is_empty() {
            return Err(FinanceError::Config("model must not be empty".to_string()));
        }

        Ok(())
    }

    /// Build the language-model client
    ///
    /// Fails when no credential is configured.
    pub fn llm_provider(&self) -> Result<Arc<dyn LLMProvider>> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            FinanceError::Config("GROQ_API_KEY not found in environment variables".to_string())
        })?;

        let config = OpenAIConfig::new(key)
            .with_api_base(self.api_base.clone())
            .with_timeout(self.llm_timeout.as_secs());

        Ok(Arc::new(OpenAIProvider::with_config(config)?))
    }
}

/// Builder for FinanceConfig
#[derive(Debug, Default)]
pub struct FinanceConfigBuilder {
    server_url: Option<String>,
    server_port: Option<u16>,
    dashboard_port: Option<u16>,
    api_key: Option<String>,
    api_base: Option<String>,
    model: Option<String>,
    llm_timeout: Option<Duration>,
}

impl FinanceConfigBuilder {
    /// Builder seeded from the process environment, not yet validated
    ///
    /// Callers may override fields before [`build`](Self::build).
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::default()
            .server_url(var_or("FINANCE_SERVER_URL", DEFAULT_SERVER_URL))
            .server_port(var_parse("PORT", DEFAULT_SERVER_PORT)?)
            .dashboard_port(var_parse("DASHBOARD_PORT", DEFAULT_DASHBOARD_PORT)?)
            .api_base(var_or("GROQ_API_BASE", GROQ_API_BASE))
            .model(var_or("GROQ_MODEL", DEFAULT_MODEL));

        if let Some(key) = var_opt("GROQ_API_KEY") {
            builder = builder.api_key(key);
        }

        Ok(builder)
    }

    /// Set the dispatch endpoint base URL
    pub fn server_url(mut self, url: impl Into<String>) -> Self {
        self.server_url = Some(url.into());
        self
    }

    /// Set the dispatch server port
    pub fn server_port(mut self, port: u16) -> Self {
        self.server_port = Some(port);
        self
    }

    /// Set the dashboard port
    pub fn dashboard_port(mut self, port: u16) -> Self {
        self.dashboard_port = Some(port);
        self
    }

    /// Set the Groq API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }

    /// Set the chat model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the language-model request timeout
    pub fn llm_timeout(mut self, timeout: Duration) -> Self {
        self.llm_timeout = Some(timeout);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<FinanceConfig> {
        let defaults = FinanceConfig::default();

        let config = FinanceConfig {
            server_url: self
                .server_url
                .map_or(defaults.server_url, |url| url.trim().to_string()),
            server_port: self.server_port.unwrap_or(defaults.server_port),
            dashboard_port: self.dashboard_port.unwrap_or(defaults.dashboard_port),
            api_key: self.api_key.filter(|k| !k.trim().is_empty()),
            api_base: self.api_base.unwrap_or(defaults.api_base),
            model: self.model.unwrap_or(defaults.model),
            llm_timeout: self.llm_timeout.unwrap_or(defaults.llm_timeout),
        };

        config.validate()?;
        Ok(config)
    }
}
