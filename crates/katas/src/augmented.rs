//! Kata 01: augmented LLM.
//!
//! A model that must look facts up before answering. Each turn is a small
//! loop: the model either asks for a `search_wikipedia` lookup or gives a
//! final answer, always as a JSON object. The second question is asked on
//! top of the first turn's message history, so it can lean on what was
//! already found.

use agentkata_config::KataConfig;
use agentkata_core::error::KataError;
use agentkata_core::message::Message;
use agentkata_core::provider::{Provider, ProviderRequest};
use agentkata_core::tool::Tool;
use agentkata_routing::json_object;
use agentkata_tools::{ColBertV2, PassageSearch, SearchWikipediaTool};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::kata::{Kata, KataOutput};

pub const CAPITAL_SIZE_QUESTION: &str =
    "Does the capital of France have more people than the capital of Germany?";
pub const DENSITY_QUESTION: &str = "Which is more densely populated?";

/// Passages per lookup.
const SEARCH_K: usize = 3;

const SYSTEM: &str = "You are a helpful assistant that uses tools to augment your knowledge. \
Always use the search_wikipedia tool to verify facts before answering. \
Be concise and reply with one or two sentences at most.\n\n\
Reply with only a JSON object, in one of two shapes:\n\
- {\"tool\": \"search_wikipedia\", \"query\": <search query>} to look something up. \
Search for one subject at a time.\n\
- {\"question\": <the question>, \"answer\": <a concise, one sentence answer>, \
\"context\": [<the passages you used>]} once you can answer.";

/// A question, the passages used to answer it, and the answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionAnswerWithContext {
    pub question: String,
    /// Concise, one sentence answer.
    pub answer: String,
    #[serde(default)]
    pub context: Vec<String>,
}

/// One question and how it got answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AugmentedTurn {
    pub answer: QuestionAnswerWithContext,
    /// `search_wikipedia` queries issued during this turn, in order.
    pub searches: Vec<String>,
    /// Size of the message history once the turn finished.
    pub messages: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AugmentedResult {
    /// Paris versus Berlin, by population.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capital_size: Option<AugmentedTurn>,

    /// Follow-up on population density, asked with the first turn's history.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<AugmentedTurn>,
}

fn mentions_any(text: &str, words: &[&str]) -> bool {
    let text = text.to_lowercase();
    words.iter().any(|w| text.contains(w))
}

impl AugmentedResult {
    pub fn validate(&self) -> Result<(), KataError> {
        let fail = |reason: &str| Err(KataError::Validation(reason.to_string()));

        let Some(size) = &self.capital_size else {
            return fail("capital size question was not answered");
        };
        if size.messages == 0 {
            return fail("capital size turn has no messages");
        }
        if size.searches.len() < 2 {
            return fail("capital size turn should search at least twice");
        }
        if !size.searches.iter().any(|q| q.contains("Paris")) {
            return fail("capital size turn should search for Paris");
        }
        if !size.searches.iter().any(|q| q.contains("Berlin")) {
            return fail("capital size turn should search for Berlin");
        }
        if !mentions_any(&size.answer.answer, &["population", "million", "inhabitants"]) {
            return fail("capital size answer should mention population numbers");
        }

        let Some(density) = &self.density else {
            return fail("density question was not answered");
        };
        if density.messages == 0 {
            return fail("density turn has no messages");
        }
        if density.answer.answer.trim().is_empty() {
            return fail("density answer is empty");
        }
        if !mentions_any(&density.answer.answer, &["densely", "density", "per", "area"]) {
            return fail("density answer should discuss density");
        }
        if mentions_any(&density.answer.answer, &["which city", "what city"]) {
            return fail("density answer lost the conversation context");
        }
        Ok(())
    }
}

/// What the model asked for in one step.
enum Step {
    Search(String),
    Answer(QuestionAnswerWithContext),
}

fn parse_step(raw: &str) -> Result<Step, String> {
    let object = json_object(raw).map_err(|e| e.to_string())?;

    if let Some(tool) = object.get("tool") {
        if tool.as_str() != Some("search_wikipedia") {
            return Err(format!("unknown tool {tool}, the only tool is search_wikipedia"));
        }
        let query = object
            .get("query")
            .and_then(|q| q.as_str())
            .map(str::trim)
            .unwrap_or_default();
        if query.is_empty() {
            return Err("field 'query' is missing or empty".into());
        }
        return Ok(Step::Search(query.to_string()));
    }

    let answer: QuestionAnswerWithContext =
        serde_json::from_value(serde_json::Value::Object(object)).map_err(|e| e.to_string())?;
    if answer.answer.trim().is_empty() {
        return Err("field 'answer' must not be empty".into());
    }
    Ok(Step::Answer(answer))
}

pub struct AugmentedKata {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: u32,
    search: SearchWikipediaTool,
    max_steps: usize,
}

impl AugmentedKata {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        retriever: Arc<dyn PassageSearch>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.7,
            max_tokens: 1024,
            search: SearchWikipediaTool::new(retriever, SEARCH_K),
            max_steps: 8,
        }
    }

    /// Searches the configured ColBERTv2 index with the config's sampling.
    pub fn from_config(provider: Arc<dyn Provider>, config: &KataConfig) -> Self {
        let mut kata = Self::new(
            provider,
            config.default_model.clone(),
            Arc::new(ColBertV2::from_config(&config.retriever)),
        );
        kata.temperature = config.default_temperature;
        kata.max_tokens = config.default_max_tokens;
        kata
    }

    /// Model replies allowed per question, searches and rejected replies included.
    pub fn with_max_steps(mut self, steps: usize) -> Self {
        self.max_steps = steps.max(1);
        self
    }

    async fn lookup(&self, query: &str) -> String {
        match self.search.execute(serde_json::json!({ "message": query })).await {
            Ok(result) => result.output,
            Err(e) => {
                warn!(query, error = %e, "Wikipedia search failed");
                format!("search failed: {e}")
            }
        }
    }

    /// Answer one question, extending `history` with every exchange.
    pub async fn ask(
        &self,
        history: &mut Vec<Message>,
        question: &str,
    ) -> Result<AugmentedTurn, KataError> {
        if history.is_empty() {
            history.push(Message::system(SYSTEM));
        }
        history.push(Message::user(question));
        let mut searches = Vec::new();

        for step in 1..=self.max_steps {
            let request = ProviderRequest::new(self.model.clone(), history.clone())
                .with_temperature(self.temperature)
                .with_max_tokens(self.max_tokens)
                .json();
            let reply = self.provider.complete(request).await?.message.content;
            history.push(Message::assistant(reply.clone()));

            match parse_step(&reply) {
                Ok(Step::Search(query)) => {
                    debug!(step, query = %query, "Model asked for a search");
                    let passages = self.lookup(&query).await;
                    history.push(Message::user(format!(
                        "search_wikipedia results for \"{query}\":\n{passages}"
                    )));
                    searches.push(query);
                }
                Ok(Step::Answer(answer)) => {
                    info!(step, searches = searches.len(), "Question answered");
                    return Ok(AugmentedTurn {
                        answer,
                        searches,
                        messages: history.len(),
                    });
                }
                Err(reason) => {
                    warn!(step, reason = %reason, "Rejected model reply");
                    history.push(Message::user(format!(
                        "Your previous reply was rejected: {reason}. \
                         Reply with only one of the two JSON objects described above."
                    )));
                }
            }
        }

        Err(KataError::Validation(format!(
            "no answer to '{question}' after {} steps",
            self.max_steps
        )))
    }

    /// Both questions, the second on top of the first one's history.
    pub async fn answer_both(&self) -> Result<AugmentedResult, KataError> {
        let mut history = Vec::new();
        let capital_size = self.ask(&mut history, CAPITAL_SIZE_QUESTION).await?;
        let density = self.ask(&mut history, DENSITY_QUESTION).await?;
        Ok(AugmentedResult {
            capital_size: Some(capital_size),
            density: Some(density),
        })
    }
}

#[async_trait]
impl Kata for AugmentedKata {
    fn id(&self) -> &str {
        "01"
    }

    fn title(&self) -> &str {
        "Augmented LLM"
    }

    fn description(&self) -> &str {
        "Ground LLM answers with retrieval, tools and conversation memory"
    }

    async fn run(&self) -> Result<KataOutput, KataError> {
        let result = self.answer_both().await?;
        result.validate()?;

        let summary = match (&result.capital_size, &result.density) {
            (Some(size), Some(density)) => {
                format!("{} {}", size.answer.answer, density.answer.answer)
            }
            _ => String::new(),
        };
        Ok(KataOutput::new(self.id(), summary, &result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::ScriptedProvider;
    use agentkata_tools::{Passage, RetrieverError};
    use std::sync::Mutex;

    /// Returns one canned passage per query and remembers the queries.
    #[derive(Default)]
    struct StubIndex {
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PassageSearch for StubIndex {
        async fn search(&self, query: &str, k: usize) -> Result<Vec<Passage>, RetrieverError> {
            assert_eq!(k, SEARCH_K);
            self.queries.lock().unwrap().push(query.to_string());
            let text = format!("{query} | a city with millions of inhabitants");
            Ok(vec![Passage {
                long_text: text.clone(),
                text,
                pid: Some(1),
                rank: Some(1),
                score: Some(20.5),
            }])
        }
    }

    fn search(query: &str) -> String {
        serde_json::json!({"tool": "search_wikipedia", "query": query}).to_string()
    }

    fn answer(question: &str, text: &str) -> String {
        serde_json::json!({
            "question": question,
            "answer": text,
            "context": ["Paris | ...", "Berlin | ..."],
        })
        .to_string()
    }

    fn scripted_run() -> Vec<String> {
        vec![
            search("Paris population"),
            search("Berlin population"),
            answer(
                CAPITAL_SIZE_QUESTION,
                "No, Paris has about 2.1 million people while Berlin has about 3.6 million.",
            ),
            format!(
                "```json\n{}\n```",
                answer(
                    DENSITY_QUESTION,
                    "Paris is far more densely populated, at roughly 20,000 people per square kilometre.",
                )
            ),
        ]
    }

    #[tokio::test]
    async fn answers_both_questions_with_shared_history() {
        let provider = Arc::new(ScriptedProvider::from_strings(scripted_run()));
        let index = Arc::new(StubIndex::default());
        let kata = AugmentedKata::new(provider.clone(), "gpt-4o", index.clone());

        let output = kata.run().await.unwrap();
        assert_eq!(output.kata_id, "01");
        assert!(output.summary.contains("densely"));

        assert_eq!(
            *index.queries.lock().unwrap(),
            vec!["Paris population", "Berlin population"]
        );

        let requests = provider.requests();
        assert_eq!(requests.len(), 4);
        assert!(requests.iter().all(|r| r.response_format
            == agentkata_core::provider::ResponseFormat::JsonObject));

        // Second search sees the first one's passages.
        assert!(requests[1].messages.iter().any(|m| m.content.contains("Paris population |")));

        // The density question is asked on top of the first turn.
        let density = &requests[3].messages;
        assert!(density.iter().any(|m| m.content == CAPITAL_SIZE_QUESTION));
        assert_eq!(density.last().unwrap().content, DENSITY_QUESTION);
    }

    #[tokio::test]
    async fn turns_record_searches_and_history() {
        let provider = Arc::new(ScriptedProvider::from_strings(scripted_run()));
        let kata = AugmentedKata::new(provider, "m", Arc::new(StubIndex::default()));

        let result = kata.answer_both().await.unwrap();
        let size = result.capital_size.as_ref().unwrap();
        let density = result.density.as_ref().unwrap();

        assert_eq!(size.searches.len(), 2);
        assert!(density.searches.is_empty());
        assert!(density.messages > size.messages);
        assert!(result.validate().is_ok());
    }

    #[tokio::test]
    async fn rejected_reply_gets_a_correction() {
        let mut replies = vec!["Paris is bigger, obviously.".to_string()];
        replies.extend(scripted_run());
        let provider = Arc::new(ScriptedProvider::from_strings(replies));
        let kata = AugmentedKata::new(provider.clone(), "m", Arc::new(StubIndex::default()));

        kata.answer_both().await.unwrap();

        let requests = provider.requests();
        let correction = requests[1].messages.last().unwrap();
        assert!(correction.content.starts_with("Your previous reply was rejected"));
    }

    #[tokio::test]
    async fn gives_up_after_step_budget() {
        let provider = Arc::new(ScriptedProvider::new(vec!["nope", "still nope"]));
        let kata = AugmentedKata::new(provider, "m", Arc::new(StubIndex::default())).with_max_steps(2);

        let err = kata.answer_both().await.unwrap_err();
        assert!(matches!(err, KataError::Validation(_)));
    }

    #[tokio::test]
    async fn single_search_fails_validation() {
        let provider = Arc::new(ScriptedProvider::from_strings(vec![
            search("Paris and Berlin population"),
            answer(CAPITAL_SIZE_QUESTION, "No, Berlin has more inhabitants."),
            answer(DENSITY_QUESTION, "Paris has the higher density."),
        ]));
        let kata = AugmentedKata::new(provider, "m", Arc::new(StubIndex::default()));

        let err = kata.run().await.unwrap_err();
        assert!(err.to_string().contains("at least twice"));
    }

    fn turn(answer: &str, searches: &[&str]) -> AugmentedTurn {
        AugmentedTurn {
            answer: QuestionAnswerWithContext {
                question: "q".into(),
                answer: answer.into(),
                context: vec![],
            },
            searches: searches.iter().map(|s| s.to_string()).collect(),
            messages: 4,
        }
    }

    #[test]
    fn density_answer_asking_which_city_fails() {
        let result = AugmentedResult {
            capital_size: Some(turn("Berlin has 3.6 million people.", &["Paris", "Berlin"])),
            density: Some(turn("Which city do you mean? Density varies per area.", &[])),
        };
        assert!(result.validate().is_err());
    }

    #[test]
    fn missing_berlin_search_fails() {
        let result = AugmentedResult {
            capital_size: Some(turn("Berlin has 3.6 million people.", &["Paris", "France"])),
            density: Some(turn("Paris is denser per square kilometre.", &[])),
        };
        let err = result.validate().unwrap_err();
        assert!(err.to_string().contains("Berlin"));
    }

    #[test]
    fn unknown_tool_is_rejected() {
        let err = parse_step(r#"{"tool": "calculator", "query": "2+2"}"#).err().unwrap();
        assert!(err.contains("search_wikipedia"));
    }
}
