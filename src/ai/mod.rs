//! Generation gateway.
//!
//! Turns wizard inputs into prompts, sends them to a hosted model and
//! validates what comes back.
//!
//! ## Layers
//!
//! - [`AIProvider`]: one vendor endpoint (Gemini, Ollama), raw text in and out
//! - [`Gateway`]: provider chain with fallback, prompt rendering and JSON validation
//! - [`GenerationGateway`]: the operation-level contract the step controller depends on

mod gemini;
mod ollama;
pub mod prompts;
mod schema;

pub use gemini::{GeminiProvider, DEFAULT_MODEL as GEMINI_DEFAULT_MODEL};
pub use ollama::OllamaProvider;
pub use schema::{parse_records, FaqItem, Record, RecordSchema, SchemaFlavor, VocItem};

use async_trait::async_trait;

use crate::core::AiConfig;
use crate::wizard::Language;

/// Trait for AI providers.
#[async_trait]
pub trait AIProvider: Send + Sync {
    /// Send a free-text prompt and return the raw reply.
    async fn complete(&self, prompt: &str) -> Result<String, AIError>;

    /// Send a prompt constrained to a JSON array of records.
    async fn complete_json(&self, prompt: &str, schema: &RecordSchema) -> Result<String, AIError>;

    /// Get the provider name.
    fn name(&self) -> &str;

    /// Check if the provider is available.
    async fn is_available(&self) -> bool;
}

/// AI error types.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("Provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("Missing API key: set {0}")]
    MissingCredentials(String),

    #[error("API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Rate limited, retry after {0}s")]
    RateLimited(u64),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model returned invalid JSON: {0}")]
    InvalidJson(String),

    #[error("No response from AI")]
    NoResponse,
}

/// Which prompt to build, with its interpolated inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Template {
    Mission { feeling: String, goal: String, problem: String },
    JourneyAudit { channels: String, tools: String, example_response: String },
    Manifesto { adjectives: String, form: String, forbidden: String, preferred: String },
    VocAnalysis { raw_messages: String },
    Faq { questions: String },
    ProactiveStrategy { context: String },
    Suggestion { field_label: String, context: String },
}

impl Template {
    /// Operation name, for logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Mission { .. } => "generate_mission",
            Self::JourneyAudit { .. } => "analyze_journey",
            Self::Manifesto { .. } => "generate_manifesto",
            Self::VocAnalysis { .. } => "analyze_voc",
            Self::Faq { .. } => "generate_faq",
            Self::ProactiveStrategy { .. } => "generate_proactive_strategy",
            Self::Suggestion { .. } => "generate_suggestion",
        }
    }
}

/// A single call into the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub template: Template,
    pub language: Language,
}

impl GenerationRequest {
    pub fn new(template: Template, language: Language) -> Self {
        Self { template, language }
    }

    /// Rendered prompt text.
    pub fn prompt(&self) -> String {
        prompts::render(self)
    }
}

/// What a generation call produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationResult {
    Text(String),
    Voc(Vec<VocItem>),
    Faq(Vec<FaqItem>),
}

impl GenerationResult {
    /// True for blank text or an empty record list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(text) => text.trim().is_empty(),
            Self::Voc(items) => items.is_empty(),
            Self::Faq(items) => items.is_empty(),
        }
    }
}

/// Operation-level contract of the generation gateway.
#[async_trait]
pub trait GenerationGateway: Send + Sync {
    async fn generate_mission(
        &self,
        feeling: &str,
        goal: &str,
        problem: &str,
        language: Language,
    ) -> Result<String, AIError>;

    async fn analyze_journey(
        &self,
        channels: &str,
        tools: &str,
        example_response: &str,
        language: Language,
    ) -> Result<String, AIError>;

    async fn generate_manifesto(
        &self,
        adjectives: &str,
        form: &str,
        forbidden: &str,
        preferred: &str,
        language: Language,
    ) -> Result<String, AIError>;

    async fn analyze_voc(
        &self,
        raw_messages: &str,
        language: Language,
    ) -> Result<Vec<VocItem>, AIError>;

    async fn generate_faq(&self, questions: &str, language: Language)
        -> Result<Vec<FaqItem>, AIError>;

    async fn generate_proactive_strategy(
        &self,
        context: &str,
        language: Language,
    ) -> Result<String, AIError>;

    /// Suggest a value for one form field. Wrapping quotes are stripped.
    async fn generate_suggestion(
        &self,
        field_label: &str,
        context: &str,
        language: Language,
    ) -> Result<String, AIError>;

    /// Dispatch a request to the matching operation.
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, AIError> {
        let lang = request.language;
        match &request.template {
            Template::Mission { feeling, goal, problem } => {
                self.generate_mission(feeling, goal, problem, lang)
                    .await
                    .map(GenerationResult::Text)
            }
            Template::JourneyAudit { channels, tools, example_response } => self
                .analyze_journey(channels, tools, example_response, lang)
                .await
                .map(GenerationResult::Text),
            Template::Manifesto { adjectives, form, forbidden, preferred } => self
                .generate_manifesto(adjectives, form, forbidden, preferred, lang)
                .await
                .map(GenerationResult::Text),
            Template::VocAnalysis { raw_messages } => {
                self.analyze_voc(raw_messages, lang).await.map(GenerationResult::Voc)
            }
            Template::Faq { questions } => {
                self.generate_faq(questions, lang).await.map(GenerationResult::Faq)
            }
            Template::ProactiveStrategy { context } => self
                .generate_proactive_strategy(context, lang)
                .await
                .map(GenerationResult::Text),
            Template::Suggestion { field_label, context } => self
                .generate_suggestion(field_label, context, lang)
                .await
                .map(GenerationResult::Text),
        }
    }
}

/// Quote characters a model likes to wrap short answers in.
const WRAPPING_QUOTES: &[char] = &['"', '\'', '„', '“', '”', '«', '»', '`'];

/// Strip surrounding whitespace and quote characters from a short answer.
pub fn strip_wrapping_quotes(raw: &str) -> String {
    raw.trim().trim_matches(WRAPPING_QUOTES).trim().to_string()
}

/// Gateway over a chain of providers with fallback support.
///
/// Providers are tried in order; the first successful reply wins.
pub struct Gateway {
    providers: Vec<Box<dyn AIProvider>>,
    lenient_json: bool,
}

impl Gateway {
    /// Create a gateway over an explicit provider chain.
    pub fn new(providers: Vec<Box<dyn AIProvider>>) -> Self {
        Self { providers, lenient_json: false }
    }

    /// Build the provider chain described by the configuration.
    ///
    /// `api_key` is the credential resolved once at startup; it is only
    /// required when the chain contains a hosted provider.
    pub fn from_config(config: &AiConfig, api_key: Option<String>) -> Result<Self, AIError> {
        let mut providers: Vec<Box<dyn AIProvider>> = Vec::new();

        for name in &config.providers {
            match name.as_str() {
                "gemini" => {
                    let key = api_key
                        .clone()
                        .filter(|k| !k.trim().is_empty())
                        .ok_or_else(|| AIError::MissingCredentials(config.api_key_env.clone()))?;
                    providers.push(Box::new(
                        GeminiProvider::new(key)
                            .with_model(&config.model)
                            .with_timeout(config.timeout()),
                    ));
                }
                "ollama" => {
                    providers.push(Box::new(
                        OllamaProvider::new(&config.ollama.base_url, &config.ollama.model)
                            .with_timeout(config.timeout()),
                    ));
                }
                other => {
                    tracing::warn!(provider = other, "Unknown AI provider in config, skipping");
                }
            }
        }

        if providers.is_empty() {
            return Err(AIError::ProviderNotAvailable("no provider configured".to_string()));
        }

        Ok(Self { providers, lenient_json: config.lenient_json })
    }

    /// Substitute an empty list when a JSON reply cannot be parsed.
    pub fn with_lenient_json(mut self, lenient: bool) -> Self {
        self.lenient_json = lenient;
        self
    }

    /// Get the active provider name.
    pub fn active_provider(&self) -> Option<&str> {
        self.providers.first().map(|p| p.name())
    }

    /// Check that every provider in the chain answers.
    pub async fn availability(&self) -> Vec<(String, bool)> {
        let mut report = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            report.push((provider.name().to_string(), provider.is_available().await));
        }
        report
    }

    async fn complete_text(&self, request: &GenerationRequest) -> Result<String, AIError> {
        let prompt = request.prompt();
        let operation = request.template.operation();
        let mut last_error = None;

        for provider in &self.providers {
            tracing::info!(provider = provider.name(), operation, "Generating text");
            match provider.complete(&prompt).await {
                Ok(text) if !text.trim().is_empty() => return Ok(text.trim().to_string()),
                Ok(_) => {
                    tracing::warn!(provider = provider.name(), operation, "Empty reply, trying next");
                    last_error = Some(AIError::NoResponse);
                }
                Err(e) => {
                    tracing::warn!(provider = provider.name(), operation, error = %e, "Provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            AIError::ProviderNotAvailable("No AI provider available".to_string())
        }))
    }

    async fn complete_records<R: Record>(
        &self,
        request: &GenerationRequest,
    ) -> Result<Vec<R>, AIError> {
        let prompt = request.prompt();
        let operation = request.template.operation();
        let schema = RecordSchema::of::<R>();
        let mut last_error = None;

        for provider in &self.providers {
            tracing::info!(provider = provider.name(), operation, "Generating records");
            let outcome = match provider.complete_json(&prompt, &schema).await {
                Ok(raw) => parse_records::<R>(&raw),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(records) => return Ok(records),
                Err(e) => {
                    tracing::warn!(provider = provider.name(), operation, error = %e, "Provider failed, trying next");
                    last_error = Some(e);
                }
            }
        }

        match last_error {
            Some(AIError::InvalidJson(reason)) if self.lenient_json => {
                tracing::warn!(operation, reason = %reason, "Unparseable JSON reply, substituting empty list");
                Ok(Vec::new())
            }
            Some(e) => Err(e),
            None => Err(AIError::ProviderNotAvailable("No AI provider available".to_string())),
        }
    }
}

#[async_trait]
impl GenerationGateway for Gateway {
    async fn generate_mission(
        &self,
        feeling: &str,
        goal: &str,
        problem: &str,
        language: Language,
    ) -> Result<String, AIError> {
        let template = Template::Mission {
            feeling: feeling.to_string(),
            goal: goal.to_string(),
            problem: problem.to_string(),
        };
        self.complete_text(&GenerationRequest::new(template, language)).await
    }

    async fn analyze_journey(
        &self,
        channels: &str,
        tools: &str,
        example_response: &str,
        language: Language,
    ) -> Result<String, AIError> {
        let template = Template::JourneyAudit {
            channels: channels.to_string(),
            tools: tools.to_string(),
            example_response: example_response.to_string(),
        };
        self.complete_text(&GenerationRequest::new(template, language)).await
    }

    async fn generate_manifesto(
        &self,
        adjectives: &str,
        form: &str,
        forbidden: &str,
        preferred: &str,
        language: Language,
    ) -> Result<String, AIError> {
        let template = Template::Manifesto {
            adjectives: adjectives.to_string(),
            form: form.to_string(),
            forbidden: forbidden.to_string(),
            preferred: preferred.to_string(),
        };
        self.complete_text(&GenerationRequest::new(template, language)).await
    }

    async fn analyze_voc(
        &self,
        raw_messages: &str,
        language: Language,
    ) -> Result<Vec<VocItem>, AIError> {
        let template = Template::VocAnalysis { raw_messages: raw_messages.to_string() };
        self.complete_records(&GenerationRequest::new(template, language)).await
    }

    async fn generate_faq(
        &self,
        questions: &str,
        language: Language,
    ) -> Result<Vec<FaqItem>, AIError> {
        let template = Template::Faq { questions: questions.to_string() };
        self.complete_records(&GenerationRequest::new(template, language)).await
    }

    async fn generate_proactive_strategy(
        &self,
        context: &str,
        language: Language,
    ) -> Result<String, AIError> {
        let template = Template::ProactiveStrategy { context: context.to_string() };
        self.complete_text(&GenerationRequest::new(template, language)).await
    }

    async fn generate_suggestion(
        &self,
        field_label: &str,
        context: &str,
        language: Language,
    ) -> Result<String, AIError> {
        let template = Template::Suggestion {
            field_label: field_label.to_string(),
            context: context.to_string(),
        };
        let raw = self.complete_text(&GenerationRequest::new(template, language)).await?;
        let suggestion = strip_wrapping_quotes(&raw);
        if suggestion.is_empty() {
            return Err(AIError::NoResponse);
        }
        Ok(suggestion)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Provider that replays a fixed reply and records prompts.
    struct CannedProvider {
        name: &'static str,
        reply: Result<String, ()>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl CannedProvider {
        fn ok(name: &'static str, reply: &str) -> Self {
            Self { name, reply: Ok(reply.to_string()), prompts: Arc::default() }
        }

        fn failing(name: &'static str) -> Self {
            Self { name, reply: Err(()), prompts: Arc::default() }
        }
    }

    #[async_trait]
    impl AIProvider for CannedProvider {
        async fn complete(&self, prompt: &str) -> Result<String, AIError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .map_err(|()| AIError::ApiError { status: 503, body: "unavailable".to_string() })
        }

        async fn complete_json(
            &self,
            prompt: &str,
            _schema: &RecordSchema,
        ) -> Result<String, AIError> {
            self.complete(prompt).await
        }

        fn name(&self) -> &str {
            self.name
        }

        async fn is_available(&self) -> bool {
            self.reply.is_ok()
        }
    }

    #[test]
    fn test_strip_wrapping_quotes() {
        assert_eq!(strip_wrapping_quotes("\"Spokój\""), "Spokój");
        assert_eq!(strip_wrapping_quotes("  „Zaufanie”\n"), "Zaufanie");
        assert_eq!(strip_wrapping_quotes("Don't panic"), "Don't panic");
    }

    #[tokio::test]
    async fn test_mission_returns_trimmed_text() {
        let gateway = Gateway::new(vec![Box::new(CannedProvider::ok("canned", "  Naszą misją jest...\n"))]);
        let mission = gateway.generate_mission("spokój", "wzrost", "brak", Language::Pl).await.unwrap();
        assert_eq!(mission, "Naszą misją jest...");
    }

    #[tokio::test]
    async fn test_empty_reply_is_an_error() {
        let gateway = Gateway::new(vec![Box::new(CannedProvider::ok("canned", "   "))]);
        let err = gateway.analyze_journey("email", "zendesk", "ok", Language::En).await.unwrap_err();
        assert!(matches!(err, AIError::NoResponse));
    }

    #[tokio::test]
    async fn test_falls_back_to_next_provider() {
        let gateway = Gateway::new(vec![
            Box::new(CannedProvider::failing("down")),
            Box::new(CannedProvider::ok("up", "1. Be kind")),
        ]);
        let manifesto = gateway
            .generate_manifesto("warm", "ty", "nie wiem", "sprawdzę", Language::Pl)
            .await
            .unwrap();
        assert_eq!(manifesto, "1. Be kind");
    }

    #[tokio::test]
    async fn test_all_providers_failing_surfaces_last_error() {
        let gateway = Gateway::new(vec![Box::new(CannedProvider::failing("down"))]);
        let err = gateway.generate_proactive_strategy("{}", Language::De).await.unwrap_err();
        assert!(matches!(err, AIError::ApiError { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_voc_parses_records() {
        let reply = r#"[{"problem":"A","cause":"B","response":"C","systemAction":"D"}]"#;
        let gateway = Gateway::new(vec![Box::new(CannedProvider::ok("canned", reply))]);
        let items = gateway.analyze_voc("where is my parcel", Language::En).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].system_action, "D");
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error_by_default() {
        let gateway = Gateway::new(vec![Box::new(CannedProvider::ok("canned", "not json"))]);
        let err = gateway.generate_faq("Q1", Language::En).await.unwrap_err();
        assert!(matches!(err, AIError::InvalidJson(_)));
    }

    #[tokio::test]
    async fn test_lenient_mode_substitutes_empty_list() {
        let gateway = Gateway::new(vec![Box::new(CannedProvider::ok("canned", "not json"))])
            .with_lenient_json(true);
        let items = gateway.generate_faq("Q1", Language::En).await.unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_lenient_mode_still_propagates_transport_errors() {
        let gateway =
            Gateway::new(vec![Box::new(CannedProvider::failing("down"))]).with_lenient_json(true);
        assert!(gateway.analyze_voc("x", Language::En).await.is_err());
    }

    #[tokio::test]
    async fn test_suggestion_strips_quotes() {
        let gateway = Gateway::new(vec![Box::new(CannedProvider::ok("canned", "\"Spokój\""))]);
        let value = gateway.generate_suggestion("Customer Feeling", "{}", Language::Pl).await.unwrap();
        assert_eq!(value, "Spokój");
    }

    #[tokio::test]
    async fn test_language_reaches_the_prompt() {
        let provider = CannedProvider::ok("canned", "ok");
        let prompts = Arc::clone(&provider.prompts);
        let gateway = Gateway::new(vec![Box::new(provider)]);

        gateway.generate_mission("a", "b", "c", Language::De).await.unwrap();
        assert!(prompts.lock().unwrap()[0].contains("German"));
    }

    #[tokio::test]
    async fn test_generate_dispatches_by_template() {
        let gateway = Gateway::new(vec![Box::new(CannedProvider::ok("canned", "text"))]);
        let request = GenerationRequest::new(
            Template::ProactiveStrategy { context: "{}".to_string() },
            Language::En,
        );
        let result = gateway.generate(&request).await.unwrap();
        assert_eq!(result, GenerationResult::Text("text".to_string()));
    }

    #[test]
    fn test_from_config_requires_key_for_gemini() {
        let config = AiConfig::default();
        let err = Gateway::from_config(&config, None).err().unwrap();
        assert!(matches!(err, AIError::MissingCredentials(_)));
    }

    #[test]
    fn test_from_config_ollama_needs_no_key() {
        let mut config = AiConfig::default();
        config.providers = vec!["ollama".to_string()];
        let gateway = Gateway::from_config(&config, None).unwrap();
        assert_eq!(gateway.active_provider(), Some("ollama"));
    }
}
