//! End-to-end integration tests for AgentKata.
//!
//! These tests exercise the full pipeline from a config file and fixture
//! messages through classification, dispatch to the built-in handlers, and
//! validation, with a scripted provider standing in for the LLM.

use std::sync::{Arc, Mutex};

use agentkata_config::KataConfig;
use agentkata_core::error::{KataError, ProviderError, RoutingError};
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest, ProviderResponse, Usage};
use agentkata_core::text_message::TextMessage;
use agentkata_katas::{all_katas, find_kata, fixtures};
use agentkata_routing::{
    BatchRouter, CapabilityCatalog, CapabilityDescriptor, ClassificationInput, Classifier,
    DispatchMode, Router, validate,
};
use agentkata_tools::default_registry;

// ── Mock Provider ────────────────────────────────────────────────────────

/// A mock provider that returns scripted replies in sequence.
struct ScriptedProvider {
    replies: Vec<String>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<String>) -> Self {
        Self {
            replies,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "e2e_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let mut requests = self.requests.lock().unwrap();
        let call = requests.len();
        if call >= self.replies.len() {
            panic!(
                "ScriptedProvider exhausted: call #{}, have {}",
                call,
                self.replies.len()
            );
        }
        requests.push(request);
        Ok(ProviderResponse {
            message: Message::assistant(self.replies[call].clone()),
            usage: Some(Usage {
                prompt_tokens: 10,
                completion_tokens: 5,
                total_tokens: 15,
            }),
            model: "mock".into(),
        })
    }
}

fn classification(category: &str, confidence: f64, handler: &str) -> String {
    serde_json::json!({
        "category": category,
        "confidence": confidence,
        "handler": handler,
        "reasoning": format!("The message reads like a {category} request"),
    })
    .to_string()
}

/// Live router over the built-in handlers, plus the classifier feeding it.
fn live_pipeline(provider: Arc<ScriptedProvider>, config: &KataConfig) -> BatchRouter {
    let registry = Arc::new(default_registry(config, provider.clone()));
    let catalog = Arc::new(CapabilityCatalog::from_registry(&registry).unwrap());
    BatchRouter::new(
        Classifier::from_config(provider, config),
        Router::live(catalog, registry),
    )
}

fn mock_pipeline(provider: Arc<ScriptedProvider>, config: &KataConfig) -> BatchRouter {
    let registry = default_registry(config, provider.clone());
    let catalog = Arc::new(CapabilityCatalog::from_registry(&registry).unwrap());
    BatchRouter::new(
        Classifier::from_config(provider, config),
        Router::mock(catalog),
    )
}

// ── E2E: Config → Classifier ────────────────────────────────────────────

#[tokio::test]
async fn e2e_config_file_sets_retry_budget() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
default_model = "gpt-4o-mini"

[classifier]
max_retries = 2
timeout_secs = 30
"#,
    )
    .unwrap();

    let config = KataConfig::load_from(&path).unwrap();
    assert_eq!(config.classifier.max_retries, 2);

    let provider = Arc::new(ScriptedProvider::new(vec![
        "not json".into(),
        classification("identity", 4.0, "search_rolodex"),
    ]));
    let err = mock_pipeline(provider.clone(), &config)
        .route_one(&ClassificationInput::new("Who is this?"))
        .await
        .unwrap_err();

    assert_eq!(provider.calls(), 2);
    assert!(matches!(
        err,
        RoutingError::ClassificationFailure { attempts: 2, .. }
    ));
    assert_eq!(provider.requests()[0].model, "gpt-4o-mini");
}

// ── E2E: Mock dispatch ──────────────────────────────────────────────────

#[tokio::test]
async fn e2e_mock_route_who_is_this() {
    let provider = Arc::new(ScriptedProvider::new(vec![classification(
        "identity",
        0.94,
        "search_rolodex",
    )]));
    let routed = mock_pipeline(provider, &KataConfig::default())
        .route_one(&ClassificationInput::new("Who is this?"))
        .await
        .unwrap();

    assert_eq!(routed.route.handler, "search_rolodex");
    assert_eq!(routed.response, "Mock response from search_rolodex");
    assert!((0.0..=1.0).contains(&routed.route.confidence));
}

#[tokio::test]
async fn e2e_malformed_then_valid_reply_succeeds() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        "```\nsummarize_webpage\n```".into(),
        format!("```json\n{}\n```", classification("web", 0.9, "summarize_webpage")),
    ]));
    let routed = mock_pipeline(provider.clone(), &KataConfig::default())
        .route_one(&ClassificationInput::new("https://example.com/plumbus"))
        .await
        .unwrap();

    assert_eq!(provider.calls(), 2);
    assert_eq!(routed.route.handler, "summarize_webpage");
}

#[tokio::test]
async fn e2e_conversation_only_catalog_falls_back() {
    let provider = Arc::new(ScriptedProvider::new(vec![classification(
        "chat",
        0.5,
        "conversation",
    )]));
    let catalog = Arc::new(
        CapabilityCatalog::new(vec![CapabilityDescriptor::new(
            "conversation",
            "General chat",
        )])
        .unwrap(),
    );
    let pipeline = BatchRouter::new(
        Classifier::new(provider.clone(), "mock"),
        Router::mock(catalog),
    );

    let routed = pipeline
        .route_one(&ClassificationInput::new("Who is this?"))
        .await
        .unwrap();
    assert_eq!(routed.route.handler, "conversation");

    let requests = provider.requests();
    let prompt = &requests[0].messages[0].content;
    assert!(prompt.contains("1. Use conversation"));
    assert!(!prompt.contains("search_rolodex"));
}

// ── E2E: Live dispatch to built-in handlers ─────────────────────────────

#[tokio::test]
async fn e2e_live_add_then_search_rolodex() {
    let config = KataConfig::default();
    let provider = Arc::new(ScriptedProvider::new(vec![
        classification("contact", 0.9, "add_to_rolodex"),
        classification("identity", 0.95, "search_rolodex"),
    ]));
    let pipeline = live_pipeline(provider, &config);

    let saved = pipeline
        .route_one(
            &ClassificationInput::new("This is Sir Lancelot! My email is lancelot@camelot.org")
                .with_sender("+18015550201"),
        )
        .await
        .unwrap();
    assert!(saved.response.contains("Sir Lancelot"));

    let found = pipeline
        .route_one(&ClassificationInput::new("New phone, who dis?").with_sender("+18015550201"))
        .await
        .unwrap();
    assert_eq!(found.route.handler, "search_rolodex");
    assert!(found.response.contains("lancelot@camelot.org"));
}

#[tokio::test]
async fn e2e_live_report_goes_to_sender() {
    let provider = Arc::new(ScriptedProvider::new(vec![classification(
        "report",
        0.91,
        "generate_and_email_report",
    )]));
    let routed = live_pipeline(provider, &KataConfig::default())
        .route_one(
            &ClassificationInput::new("Please email me the quarterly report")
                .with_sender("+18015550301"),
        )
        .await
        .unwrap();

    assert_eq!(routed.route.handler, "generate_and_email_report");
    assert!(routed.response.contains("+18015550301"));
}

#[tokio::test]
async fn e2e_live_handler_failure_is_not_retried() {
    let provider = Arc::new(ScriptedProvider::new(vec![classification(
        "web",
        0.7,
        "summarize_webpage",
    )]));
    let err = live_pipeline(provider.clone(), &KataConfig::default())
        .route_one(&ClassificationInput::new("summarize that page for me"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RoutingError::HandlerExecutionError { ref handler, .. } if handler == "summarize_webpage"
    ));
    assert_eq!(provider.calls(), 1);
}

// ── E2E: Fixtures → Batch → Validation ──────────────────────────────────

#[tokio::test]
async fn e2e_batch_over_bundled_fixtures() {
    let messages = fixtures::flatten(&fixtures::bundled().unwrap());
    let replies = messages
        .iter()
        .map(|m| classification("fixture", 0.8, m.expected_handler.as_deref().unwrap()))
        .collect();
    let provider = Arc::new(ScriptedProvider::new(replies));

    let report = mock_pipeline(provider.clone(), &KataConfig::default())
        .run(messages.clone())
        .await;

    assert_eq!(report.len(), messages.len());
    assert_eq!(report.failures().count(), 0);
    assert_eq!(validate(&report.validation_cases()), Ok(true));
    assert_eq!(
        report.handler_counts().values().sum::<usize>(),
        messages.len()
    );

    for request in provider.requests() {
        let sent = serde_json::to_string(&request).unwrap();
        assert!(!sent.contains("expected_handler"));
    }
}

#[tokio::test]
async fn e2e_batch_mismatch_is_reported() {
    let messages = vec![
        TextMessage::new("+1", "+2", "https://example.com/space-beth").expecting("summarize_webpage"),
    ];
    let provider = Arc::new(ScriptedProvider::new(vec![classification(
        "chat",
        0.6,
        "conversation",
    )]));
    let report = mock_pipeline(provider, &KataConfig::default()).run(messages).await;

    assert_eq!(
        validate(&report.validation_cases()),
        Err(RoutingError::ValidationMismatch {
            input: "https://example.com/space-beth".into(),
            expected: "summarize_webpage".into(),
            actual: "conversation".into(),
        })
    );
}

// ── E2E: Katas ──────────────────────────────────────────────────────────

#[tokio::test]
async fn e2e_routing_kata_with_bundled_fixtures() {
    let empty = tempfile::tempdir().unwrap();
    let config = KataConfig {
        fixtures_dir: Some(empty.path().to_path_buf()),
        ..KataConfig::default()
    };
    let replies = fixtures::flatten(&fixtures::bundled().unwrap())
        .iter()
        .map(|m| classification("fixture", 0.85, m.expected_handler.as_deref().unwrap()))
        .collect();
    let provider: Arc<dyn Provider> = Arc::new(ScriptedProvider::new(replies));

    let kata = find_kata(all_katas(&config, provider), "3").unwrap();
    let output = kata.run().await.unwrap();

    assert_eq!(output.kata_id, "03");
    assert_eq!(output.data["mode"], serde_json::json!(DispatchMode::Mock));
    assert!(output.summary.contains("messages routed"));
}

#[tokio::test]
async fn e2e_setup_kata_koan() {
    let provider: Arc<dyn Provider> = Arc::new(ScriptedProvider::new(vec![
        r#"{"koan": "An agent without a loop is a prompt.", "master": "Abbot Gradient"}"#.into(),
    ]));
    let kata = find_kata(all_katas(&KataConfig::default(), provider), "00").unwrap();
    let output = kata.run().await.unwrap();
    assert_eq!(output.data["master"], "Abbot Gradient");
}

#[tokio::test]
async fn e2e_unbuilt_katas_report_unimplemented() {
    let provider: Arc<dyn Provider> = Arc::new(ScriptedProvider::new(vec![]));
    let katas = all_katas(&KataConfig::default(), provider);
    assert_eq!(katas.len(), 8);

    for kata in katas.iter().filter(|k| !["00", "01", "03"].contains(&k.id())) {
        let err = kata.run().await.unwrap_err();
        assert!(matches!(err, KataError::Unimplemented(_)), "kata {}", kata.id());
    }
}
