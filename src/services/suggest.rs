//! Category suggester
//!
//! Asks an Ollama-compatible chat endpoint to map an expense description to
//! one of the default categories. Suggestions are advisory: whatever label
//! comes back is returned trimmed, and any failure yields an empty string.

use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::config::ClassifierSettings;
use crate::error::{TallyError, TallyResult};
use crate::models::{is_known_category, DEFAULT_CATEGORIES};

/// What a suggestion attempt produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Suggestion {
    /// Trimmed label from the service, possibly outside the vocabulary
    Label(String),
    /// Blank description; nothing was asked
    Blank,
    /// Service disabled or its liveness probe failed
    Unavailable,
    /// The chat call failed or returned nothing usable
    Failed,
}

impl Suggestion {
    /// The label, or an empty string when there is none
    pub fn into_label(self) -> String {
        match self {
            Suggestion::Label(label) => label,
            _ => String::new(),
        }
    }
}

/// Client for the classification service
pub struct CategorySuggester {
    client: Client,
    base_url: String,
    model: String,
    enabled: bool,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message>,
    stream: bool,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl CategorySuggester {
    pub fn new(settings: &ClassifierSettings) -> TallyResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            enabled: settings.enabled,
        })
    }

    /// Whether the service answers its liveness probe
    pub fn is_available(&self) -> bool {
        if !self.enabled {
            return false;
        }

        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send() {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                debug!("classifier probe failed: {}", e);
                false
            }
        }
    }

    /// Suggest a category label for a description
    ///
    /// Returns an empty string for a blank description (no call is made),
    /// when the service is disabled or down, or when the call fails.
    pub fn suggest_category(&self, description: &str) -> String {
        self.suggest(description).into_label()
    }

    /// Like [`suggest_category`](Self::suggest_category), but says why no
    /// label came back. The liveness probe runs at most once.
    pub fn suggest(&self, description: &str) -> Suggestion {
        let description = description.trim();
        if description.is_empty() {
            return Suggestion::Blank;
        }
        if !self.is_available() {
            return Suggestion::Unavailable;
        }

        match self.try_suggest(description) {
            Ok(label) if label.is_empty() => {
                warn!("category suggestion came back empty");
                Suggestion::Failed
            }
            Ok(label) => Suggestion::Label(label),
            Err(e) => {
                warn!("category suggestion failed: {}", e);
                Suggestion::Failed
            }
        }
    }

    fn try_suggest(&self, description: &str) -> TallyResult<String> {
        let system_prompt = build_system_prompt();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt.clone(),
                },
                Message {
                    role: "user",
                    content: build_user_prompt(&system_prompt, description),
                },
            ],
            stream: false,
        };

        let url = format!("{}/api/chat", self.base_url);
        let response = self.client.post(&url).json(&request).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(TallyError::Classifier(format!(
                "chat request failed with status {}",
                status
            )));
        }

        let chat: ChatResponse = response
            .json()
            .map_err(|e| TallyError::Classifier(format!("unexpected chat response: {}", e)))?;

        let label = chat.message.content.trim().to_string();
        debug!("suggested '{}' for '{}'", label, description);
        Ok(label)
    }
}

/// Whether a suggested label is in the default vocabulary
///
/// For display only; out-of-vocabulary suggestions are still returned.
pub fn matches_vocabulary(label: &str) -> bool {
    is_known_category(label.trim())
}

fn build_system_prompt() -> String {
    let labels = DEFAULT_CATEGORIES
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "You are a helpful assistant that classifies expense descriptions into one of the following categories:\n[{}]\n\nReturn only the category name that best matches the description.",
        labels
    )
}

fn build_user_prompt(system_prompt: &str, description: &str) -> String {
    format!("{}\n\nDescription: {}\nCategory:", system_prompt, description)
}
