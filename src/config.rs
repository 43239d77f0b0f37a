#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Judge credentials, read once from the environment and passed explicitly
//! into evaluation. Rules-based runs never touch this module.

use typed_builder::TypedBuilder;

/// Environment variable holding the judge API key.
pub const API_KEY_VAR: &str = "OPENAI_KEY";

/// Optional environment variable overriding the API base URL.
pub const API_BASE_VAR: &str = "OPENAI_BASE_URL";

/// Grading model used when no override is given.
pub const DEFAULT_JUDGE_MODEL: &str = "gpt-4o-mini-2024-07-18";

/// A credential the API judge needs was absent from the environment.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("missing credential: set `{0}` to use the API judge")]
pub struct MissingCredential(pub &'static str);

/// Validated judge credentials and model choice.
#[derive(Debug, Clone, TypedBuilder)]
#[builder(doc)]
pub struct JudgeConfig {
    /// API key sent with every request.
    #[builder(setter(into))]
    api_key:  String,

    /// Optional OpenAI-compatible endpoint override.
    #[builder(default, setter(into, strip_option))]
    api_base: Option<String>,

    /// Model identifier for grading requests.
    #[builder(default = DEFAULT_JUDGE_MODEL.to_string(), setter(into))]
    model:    String,
}

impl JudgeConfig {
    /// Reads credentials from the environment. Fails when the API key is
    /// missing or blank so a misconfigured run stops before any grading.
    ///
    /// `model` overrides [`DEFAULT_JUDGE_MODEL`] when given.
    pub fn from_env(model: Option<String>) -> Result<Self, MissingCredential> {
        let api_key = std::env::var(API_KEY_VAR)
            .ok()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .ok_or(MissingCredential(API_KEY_VAR))?;

        let api_base = std::env::var(API_BASE_VAR)
            .ok()
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty());

        let model = model
            .map(|s| s.trim().to_owned())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_JUDGE_MODEL.to_string());

        Ok(Self {
            api_key,
            api_base,
            model,
        })
    }

    /// Returns the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the endpoint override, if any.
    pub fn api_base(&self) -> Option<&str> {
        self.api_base.as_deref()
    }

    /// Returns the grading model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }
}
