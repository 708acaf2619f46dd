//! Configuration types for the cleanup pipeline.
//!
//! All pipeline behaviour is controlled through [`CleanupConfig`], built via
//! its [`CleanupConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs across calls and to diff two runs to understand
//! why their outputs differ.
//!
//! The LLM polish stage is an *explicit* opt-in: `llm_cleanup` is a plain
//! boolean on the config, and credential discovery is the caller's problem
//! (the CLI maps `OPENAI_API_KEY` presence onto this flag). The library
//! never silently changes behaviour based on hidden environment state.

use crate::error::Pdf2TextError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use std::fmt;
use std::sync::Arc;

/// Input-size limit sent to the external service per request, in characters.
pub const DEFAULT_CHUNK_CHARS: usize = 4000;

/// Configuration for a PDF cleanup run.
///
/// Built via [`CleanupConfig::builder()`] or using
/// [`CleanupConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf2text::CleanupConfig;
///
/// let config = CleanupConfig::builder()
///     .llm_cleanup(true)
///     .model("gpt-4.1-nano")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct CleanupConfig {
    /// Run the optional LLM polish stage. Default: false.
    ///
    /// When false the stage is skipped entirely: the content-filter output
    /// passes through byte-identical and no `after_llm_cleanup` statistic is
    /// recorded.
    pub llm_cleanup: bool,

    /// LLM model identifier, e.g. "gpt-4.1-nano".
    /// If None, uses provider default.
    pub model: Option<String>,

    /// LLM provider name (e.g. "openai", "anthropic", "ollama").
    /// If None along with `provider`, uses `ProviderFactory::from_env()`.
    pub provider_name: Option<String>,

    /// Pre-constructed LLM provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Characters per request sent to the external service. Default: 4000.
    ///
    /// Pages longer than this are split into non-overlapping chunks; the
    /// final chunk may be shorter. 4000 chars stays comfortably inside every
    /// supported provider's input limit while keeping request counts low.
    pub chunk_chars: usize,

    /// Maximum tokens the LLM may generate per chunk. Default: 4096.
    ///
    /// The polish prompt asks the model to *remove* content, so output is
    /// normally shorter than input; too small a cap would silently truncate
    /// a chunk mid-sentence.
    pub max_tokens: usize,

    /// Optional progress callback fired at stage boundaries and per
    /// polished page.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for CleanupConfig {
    fn default() -> Self {
        Self {
            llm_cleanup: false,
            model: None,
            provider_name: None,
            provider: None,
            chunk_chars: DEFAULT_CHUNK_CHARS,
            max_tokens: 4096,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for CleanupConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupConfig")
            .field("llm_cleanup", &self.llm_cleanup)
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("chunk_chars", &self.chunk_chars)
            .field("max_tokens", &self.max_tokens)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn callback>"),
            )
            .finish()
    }
}

impl CleanupConfig {
    /// Create a new builder for `CleanupConfig`.
    pub fn builder() -> CleanupConfigBuilder {
        CleanupConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`CleanupConfig`].
#[derive(Debug)]
pub struct CleanupConfigBuilder {
    config: CleanupConfig,
}

impl CleanupConfigBuilder {
    pub fn llm_cleanup(mut self, v: bool) -> Self {
        self.config.llm_cleanup = v;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn chunk_chars(mut self, n: usize) -> Self {
        self.config.chunk_chars = n.max(1);
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<CleanupConfig, Pdf2TextError> {
        let c = &self.config;
        if c.chunk_chars == 0 {
            return Err(Pdf2TextError::InvalidConfig(
                "chunk_chars must be ≥ 1".into(),
            ));
        }
        if c.max_tokens == 0 {
            return Err(Pdf2TextError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}
