use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use quiz_core::model::Verdict;

use super::VerdictClassifier;
use super::config::ClassifierConfig;
use crate::error::ClassifierError;

/// Classifier backed by an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct ChatCompletionClassifier {
    client: Client,
    config: ClassifierConfig,
}

impl ChatCompletionClassifier {
    /// Build a classifier whose requests time out after `config.timeout`.
    ///
    /// # Errors
    ///
    /// Returns `ClassifierError::Http` if the HTTP client cannot be constructed.
    pub fn new(config: ClassifierConfig) -> Result<Self, ClassifierError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl VerdictClassifier for ChatCompletionClassifier {
    async fn classify(&self, question: &str, answer: &str) -> Result<String, ClassifierError> {
        let payload = ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_instruction(),
                },
                ChatMessage {
                    role: "user",
                    content: user_message(question, answer),
                },
            ],
            temperature: self.config.temperature,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ClassifierError::HttpStatus(response.status()));
        }

        let body: ChatResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(ClassifierError::EmptyResponse)?;

        Ok(content)
    }
}

/// Instruction sent ahead of every judgement.
#[must_use]
pub fn system_instruction() -> String {
    let labels: Vec<String> = Verdict::ALL
        .iter()
        .map(|verdict| format!("'{}'", verdict.label()))
        .collect();
    format!(
        "You are a lie detector. Judge the honesty of the answer from its tone, \
         logic, and emotion. Respond with only one verdict: {}, or {}.",
        labels[..labels.len() - 1].join(", "),
        labels[labels.len() - 1],
    )
}

fn user_message(question: &str, answer: &str) -> String {
    format!("Question: {question}\nAnswer: {answer}")
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
