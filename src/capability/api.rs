//! Host-backed capability provider over an OpenAI-compatible API.
//!
//! [`ApiProvider`] calls any `/v1/chat/completions` endpoint (Ollama in
//! OpenAI mode, OpenAI, Groq, LM Studio, vLLM …) and exposes summarization,
//! language detection and translation on top of it.  All connection details
//! come from [`ProviderConfig`]; nothing is hardcoded.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::capability::prompt;
use crate::capability::provider::{
    Capability, CapabilityProvider, Detection, LanguageDetector, ProviderError, Summarizer,
    SummarizerOptions, Translator, TranslatorOptions, LATEST_MODEL,
};
use crate::config::{CapabilityConfig, ProviderBackend, ProviderConfig};

// ---------------------------------------------------------------------------
// ApiClient
// ---------------------------------------------------------------------------

/// Shared HTTP client + connection settings.  One per provider; every
/// instance handle holds an `Arc` to it.
struct ApiClient {
    client: reqwest::Client,
    config: ProviderConfig,
}

impl ApiClient {
    /// Send one chat request and return the trimmed assistant message.
    ///
    /// The `Authorization: Bearer …` header is attached only when
    /// `config.api_key` is a non-empty string.
    async fn chat(&self, model: &str, system: &str, user: &str) -> Result<String, ProviderError> {
        let url = format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model":       model,
            "messages": [
                { "role": "system", "content": system },
                { "role": "user",   "content": user   }
            ],
            "stream":      false,
            "temperature": self.config.temperature
        });

        log::debug!("provider: POST {url} (model={model}, len={})", user.len());

        let mut req = self.client.post(&url).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::Rejected(format!("HTTP {status}: {detail}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ProviderError::EmptyResponse)?
            .trim()
            .to_string();

        if content.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(content)
    }

    /// Map the `"latest"` model alias to the configured model name.
    fn resolve_model(&self, requested: &str) -> String {
        if requested.is_empty() || requested == LATEST_MODEL {
            self.config.model.clone()
        } else {
            requested.to_string()
        }
    }
}

// ---------------------------------------------------------------------------
// ApiProvider
// ---------------------------------------------------------------------------

/// [`CapabilityProvider`] backed by an OpenAI-compatible chat endpoint.
///
/// ```rust
/// use text_processor::capability::{ApiProvider, Capability, CapabilityProvider};
/// use text_processor::config::AppConfig;
///
/// let config = AppConfig::default();
/// let provider = ApiProvider::from_config(&config.provider, &config.capabilities);
/// assert!(provider.probe(Capability::Summarizer));
/// ```
pub struct ApiProvider {
    client: Arc<ApiClient>,
    capabilities: CapabilityConfig,
}

impl ApiProvider {
    /// Build an `ApiProvider` from application config.
    ///
    /// The HTTP client is pre-configured with the per-request timeout from
    /// `config.timeout_secs`.  A default (no-timeout) client is used if the
    /// builder fails.
    pub fn from_config(config: &ProviderConfig, capabilities: &CapabilityConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client: Arc::new(ApiClient {
                client,
                config: config.clone(),
            }),
            capabilities: capabilities.clone(),
        }
    }

    fn ensure(&self, capability: Capability) -> Result<(), ProviderError> {
        if self.probe(capability) {
            Ok(())
        } else {
            Err(ProviderError::Unavailable(capability))
        }
    }
}

#[async_trait]
impl CapabilityProvider for ApiProvider {
    fn probe(&self, capability: Capability) -> bool {
        self.client.config.backend != ProviderBackend::Disabled
            && self.capabilities.is_enabled(capability)
    }

    async fn create_summarizer(
        &self,
        options: SummarizerOptions,
    ) -> Result<Box<dyn Summarizer>, ProviderError> {
        self.ensure(Capability::Summarizer)?;
        Ok(Box::new(ApiSummarizer {
            model: self.client.resolve_model(&options.model),
            client: Arc::clone(&self.client),
        }))
    }

    async fn create_language_detector(&self) -> Result<Box<dyn LanguageDetector>, ProviderError> {
        self.ensure(Capability::LanguageDetector)?;
        Ok(Box::new(ApiLanguageDetector {
            model: self.client.config.model.clone(),
            client: Arc::clone(&self.client),
        }))
    }

    async fn create_translator(
        &self,
        options: TranslatorOptions,
    ) -> Result<Box<dyn Translator>, ProviderError> {
        self.ensure(Capability::Translator)?;
        if options.source_language.is_empty() || options.target_language.is_empty() {
            return Err(ProviderError::Rejected(
                "translator needs both a source and a target language".into(),
            ));
        }
        Ok(Box::new(ApiTranslator {
            model: self.client.resolve_model(&options.model),
            source: options.source_language,
            target: options.target_language,
            client: Arc::clone(&self.client),
        }))
    }
}

// ---------------------------------------------------------------------------
// Instance handles
// ---------------------------------------------------------------------------

struct ApiSummarizer {
    client: Arc<ApiClient>,
    model: String,
}

#[async_trait]
impl Summarizer for ApiSummarizer {
    async fn summarize(&self, text: &str) -> Result<String, ProviderError> {
        let (system, user) = prompt::summarize(text);
        self.client.chat(&self.model, &system, &user).await
    }
}

struct ApiLanguageDetector {
    client: Arc<ApiClient>,
    model: String,
}

#[async_trait]
impl LanguageDetector for ApiLanguageDetector {
    async fn detect(&self, text: &str) -> Result<Vec<Detection>, ProviderError> {
        let (system, user) = prompt::detect(text);
        let reply = self.client.chat(&self.model, &system, &user).await?;
        parse_detections(&reply)
    }
}

struct ApiTranslator {
    client: Arc<ApiClient>,
    model: String,
    source: String,
    target: String,
}

#[async_trait]
impl Translator for ApiTranslator {
    async fn translate(&self, text: &str) -> Result<String, ProviderError> {
        let (system, user) = prompt::translate(text, &self.source, &self.target);
        self.client.chat(&self.model, &system, &user).await
    }
}

// ---------------------------------------------------------------------------
// Detection parsing
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct RawDetection {
    language: String,
    #[serde(default)]
    confidence: f32,
}

/// Parse the detector's JSON reply into candidates ordered best first.
///
/// Accepts a bare JSON array or one wrapped in a Markdown code fence.
/// Codes are trimmed and lower-cased; blank codes are dropped.
fn parse_detections(reply: &str) -> Result<Vec<Detection>, ProviderError> {
    let body = strip_code_fence(reply);

    let raw: Vec<RawDetection> =
        serde_json::from_str(body).map_err(|e| ProviderError::Parse(e.to_string()))?;

    let mut detections: Vec<Detection> = raw
        .into_iter()
        .map(|r| Detection::new(r.language.trim().to_lowercase(), r.confidence))
        .filter(|d| !d.language_code.is_empty())
        .collect();

    // Stable: equal confidences keep the model's order.
    detections.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    Ok(detections)
}

fn strip_code_fence(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    // Drop an optional language tag on the opening fence, which may share
    // its line with the body.
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphabetic()),
    };
    rest.trim()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::{TcpListener, TcpStream};
    use tokio::sync::oneshot;

    fn make_config(backend: ProviderBackend, api_key: Option<&str>) -> ProviderConfig {
        ProviderConfig {
            backend,
            base_url: "http://localhost:11434".into(),
            api_key: api_key.map(|s| s.to_string()),
            model: "qwen2.5:3b".into(),
            temperature: 0.2,
            timeout_secs: 10,
        }
    }

    #[test]
    fn probe_follows_capability_switches() {
        let caps = CapabilityConfig {
            summarizer: true,
            language_detector: false,
            translator: true,
        };
        let provider = ApiProvider::from_config(&make_config(ProviderBackend::Ollama, None), &caps);

        assert!(provider.probe(Capability::Summarizer));
        assert!(!provider.probe(Capability::LanguageDetector));
        assert!(provider.probe(Capability::Translator));
    }

    #[test]
    fn disabled_backend_probes_nothing() {
        let provider = ApiProvider::from_config(
            &make_config(ProviderBackend::Disabled, None),
            &CapabilityConfig::default(),
        );
        assert!(!provider.probe(Capability::Summarizer));
        assert!(!provider.probe(Capability::LanguageDetector));
        assert!(!provider.probe(Capability::Translator));
    }

    #[tokio::test]
    async fn create_fails_for_disabled_capability() {
        let caps = CapabilityConfig {
            summarizer: false,
            ..CapabilityConfig::default()
        };
        let provider = ApiProvider::from_config(&make_config(ProviderBackend::Ollama, None), &caps);

        let err = provider
            .create_summarizer(SummarizerOptions::default())
            .await
            .err()
            .expect("summarizer is disabled");
        assert_eq!(err, ProviderError::Unavailable(Capability::Summarizer));
    }

    #[tokio::test]
    async fn translator_requires_both_languages() {
        let provider = ApiProvider::from_config(
            &make_config(ProviderBackend::OpenAiCompatible, Some("sk-test")),
            &CapabilityConfig::default(),
        );
        let result = provider
            .create_translator(TranslatorOptions {
                model: LATEST_MODEL.into(),
                source_language: String::new(),
                target_language: "fr".into(),
            })
            .await;
        assert!(matches!(result, Err(ProviderError::Rejected(_))));
    }

    #[test]
    fn latest_resolves_to_configured_model() {
        let provider = ApiProvider::from_config(
            &make_config(ProviderBackend::Ollama, Some("")),
            &CapabilityConfig::default(),
        );
        assert_eq!(provider.client.resolve_model(LATEST_MODEL), "qwen2.5:3b");
        assert_eq!(provider.client.resolve_model(""), "qwen2.5:3b");
        assert_eq!(provider.client.resolve_model("llama3.2"), "llama3.2");
    }

    #[test]
    fn provider_is_object_safe() {
        let provider: Box<dyn CapabilityProvider> = Box::new(ApiProvider::from_config(
            &make_config(ProviderBackend::Ollama, None),
            &CapabilityConfig::default(),
        ));
        drop(provider);
    }

    // ---- parse_detections ---

    #[test]
    fn parses_bare_array_best_first() {
        let reply = r#"[{"language":"en","confidence":0.1},{"language":"fr","confidence":0.9}]"#;
        let detections = parse_detections(reply).unwrap();
        assert_eq!(detections[0].language_code, "fr");
        assert_eq!(detections[1].language_code, "en");
    }

    #[test]
    fn parses_fenced_reply() {
        let reply = "```json\n[{\"language\": \"ES\", \"confidence\": 0.8}]\n```";
        let detections = parse_detections(reply).unwrap();
        assert_eq!(detections, vec![Detection::new("es", 0.8)]);
    }

    #[test]
    fn parses_single_line_fenced_reply() {
        let reply = r#"```json [{"language":"fr","confidence":0.6}]```"#;
        let detections = parse_detections(reply).unwrap();
        assert_eq!(detections, vec![Detection::new("fr", 0.6)]);

        let untagged = r#"```[{"language":"ru"}]```"#;
        assert_eq!(parse_detections(untagged).unwrap()[0].language_code, "ru");
    }

    #[test]
    fn empty_array_is_no_candidates() {
        assert!(parse_detections("[]").unwrap().is_empty());
    }

    #[test]
    fn blank_codes_are_dropped() {
        let reply = r#"[{"language":"  ","confidence":0.7},{"language":"pt"}]"#;
        let detections = parse_detections(reply).unwrap();
        assert_eq!(detections.len(), 1);
        assert_eq!(detections[0].language_code, "pt");
    }

    #[test]
    fn equal_confidence_keeps_model_order() {
        let reply = r#"[{"language":"tr","confidence":0.5},{"language":"ru","confidence":0.5}]"#;
        let detections = parse_detections(reply).unwrap();
        assert_eq!(detections[0].language_code, "tr");
    }

    #[test]
    fn prose_reply_is_a_parse_error() {
        let result = parse_detections("The text is French.");
        assert!(matches!(result, Err(ProviderError::Parse(_))));
    }

    // -----------------------------------------------------------------------
    // HTTP exchange against a local listener
    // -----------------------------------------------------------------------

    /// Read one request: headers plus a `content-length` body.
    async fn read_request(socket: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let n = socket.read(&mut chunk).await.unwrap();
            if n == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..n]);
            let text = String::from_utf8_lossy(&buf);
            if let Some(end) = text.find("\r\n\r\n") {
                let length = text[..end]
                    .lines()
                    .filter_map(|line| line.split_once(':'))
                    .find(|(name, _)| name.eq_ignore_ascii_case("content-length"))
                    .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                    .unwrap_or(0);
                if buf.len() >= end + 4 + length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Answer a single request with `status` and `body`.  Returns the base
    /// URL (with a trailing slash) and the raw request once it has arrived.
    async fn serve_once(
        status: &'static str,
        body: String,
    ) -> (String, oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = oneshot::channel();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let request = read_request(&mut socket).await;
            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            let _ = tx.send(request);
        });

        (format!("http://{addr}/"), rx)
    }

    fn chat_reply(content: &str) -> String {
        serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    fn local_provider(base_url: String, api_key: Option<&str>, timeout_secs: u64) -> ApiProvider {
        let config = ProviderConfig {
            base_url,
            timeout_secs,
            ..make_config(ProviderBackend::OpenAiCompatible, api_key)
        };
        ApiProvider::from_config(&config, &CapabilityConfig::default())
    }

    async fn summarize_with(provider: &ApiProvider) -> Result<String, ProviderError> {
        provider
            .create_summarizer(SummarizerOptions::default())
            .await
            .unwrap()
            .summarize("some long text")
            .await
    }

    #[tokio::test]
    async fn chat_posts_to_completions_with_bearer_key() {
        let (base_url, request) = serve_once("200 OK", chat_reply(" Bonjour \n")).await;
        let provider = local_provider(base_url, Some("sk-x"), 5);

        let summary = summarize_with(&provider).await.unwrap();
        let request = request.await.unwrap();

        assert_eq!(summary, "Bonjour");
        assert!(request.starts_with("POST /v1/chat/completions HTTP/1.1"));
        assert!(request.to_lowercase().contains("authorization: bearer sk-x"));
        assert!(request.contains("\"model\":\"qwen2.5:3b\""));
    }

    #[tokio::test]
    async fn empty_key_sends_no_authorization() {
        let (base_url, request) = serve_once("200 OK", chat_reply("ok")).await;
        let provider = local_provider(base_url, Some(""), 5);

        summarize_with(&provider).await.unwrap();
        let request = request.await.unwrap();

        assert!(!request.to_lowercase().contains("authorization:"));
    }

    #[tokio::test]
    async fn error_status_is_rejected() {
        let (base_url, _request) =
            serve_once("500 Internal Server Error", "model crashed".into()).await;
        let provider = local_provider(base_url, None, 5);

        match summarize_with(&provider).await {
            Err(ProviderError::Rejected(detail)) => {
                assert!(detail.starts_with("HTTP 500"));
                assert!(detail.contains("model crashed"));
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn empty_content_is_empty_response() {
        let (base_url, _request) = serve_once("200 OK", chat_reply("")).await;
        let provider = local_provider(base_url, None, 5);

        assert_eq!(
            summarize_with(&provider).await,
            Err(ProviderError::EmptyResponse)
        );
    }

    #[tokio::test]
    async fn missing_choices_is_empty_response() {
        let (base_url, _request) = serve_once("200 OK", "{}".into()).await;
        let provider = local_provider(base_url, None, 5);

        assert_eq!(
            summarize_with(&provider).await,
            Err(ProviderError::EmptyResponse)
        );
    }

    #[tokio::test]
    async fn detector_parses_fenced_reply_over_http() {
        let reply = chat_reply("```json [{\"language\":\"FR\",\"confidence\":0.9}]```");
        let (base_url, _request) = serve_once("200 OK", reply).await;
        let provider = local_provider(base_url, None, 5);

        let detector = provider.create_language_detector().await.unwrap();
        let detections = detector.detect("Bonjour tout le monde").await.unwrap();

        assert_eq!(detections, vec![Detection::new("fr", 0.9)]);
    }

    #[tokio::test]
    async fn stalled_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            tokio::time::sleep(std::time::Duration::from_secs(10)).await;
        });
        let provider = local_provider(format!("http://{addr}"), None, 1);

        assert_eq!(summarize_with(&provider).await, Err(ProviderError::Timeout));
    }
}
