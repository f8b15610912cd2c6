//! HTTP generator backed by an LLM completion API
//!
//! Speaks both the Anthropic messages format and the OpenAI-compatible chat
//! format; which one is picked from the endpoint URL.

use super::{FighterGenerator, FighterProfile, GenerationError};
use crate::types::Side;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const DEFAULT_API_URL: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_MODEL: &str = "claude-3-haiku-20240307";
const MAX_TOKENS: u32 = 1024;

const PROFILE_SYSTEM_PROMPT: &str = "You design vegetable warriors for a turn-based battle game. \
Answer with a single JSON object and nothing else, using exactly these fields: \
name (string), description (string, one fierce sentence), emoji (a single emoji), \
hp (integer 50-200, from water content and bulk), attack (integer 10-50, from spice, acid or hardness), \
defense (integer 5-30, from skin thickness or density), speed (integer 1-20, from size or ease of digestion), \
ultimateName (string, a special move named after a nutrient), ultimateDesc (string), \
highlight (string, one key nutritional fact), imageKeyword (string, a simple English keyword such as 'carrot').";

const NAME_PROMPT: &str = "Return a single string: the name of a random vegetable warrior \
(for example 'Spicy Jalapeno' or 'Iron Spinach'). Do not include markdown or quotes.";

/// Request format of the completion endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiFormat {
    Anthropic,
    OpenAI,
}

impl ApiFormat {
    /// Anthropic for anthropic.com endpoints, OpenAI-compatible otherwise
    pub fn detect(url: &str) -> ApiFormat {
        if url.contains("anthropic.com") {
            ApiFormat::Anthropic
        } else {
            ApiFormat::OpenAI
        }
    }
}

/// Fighter generator calling a remote LLM
pub struct LlmFighterGenerator {
    client: Client,
    api_key: String,
    api_url: String,
    model: String,
    api_format: ApiFormat,
}

impl LlmFighterGenerator {
    pub fn new(api_key: String, api_url: String, model: String) -> Self {
        let api_format = ApiFormat::detect(&api_url);
        LlmFighterGenerator {
            client: Client::new(),
            api_key,
            api_url,
            model,
            api_format,
        }
    }

    /// Configure from `LLM_API_KEY` (required), `LLM_API_URL` and `LLM_MODEL`
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = std::env::var("LLM_API_KEY").map_err(|_| GenerationError::MissingKey("LLM_API_KEY"))?;
        let api_url = std::env::var("LLM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let model = std::env::var("LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Ok(Self::new(api_key, api_url, model))
    }

    pub fn api_format(&self) -> ApiFormat {
        self.api_format
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one completion request and return the reply text
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError> {
        let messages = match self.api_format {
            ApiFormat::Anthropic => vec![Message::new("user", user)],
            ApiFormat::OpenAI => vec![Message::new("system", system), Message::new("user", user)],
        };
        let request = CompletionRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            system: match self.api_format {
                ApiFormat::Anthropic => Some(system),
                ApiFormat::OpenAI => None,
            },
            messages,
        };

        let builder = self
            .client
            .post(&self.api_url)
            .header("content-type", "application/json");
        let builder = match self.api_format {
            ApiFormat::Anthropic => builder
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01"),
            ApiFormat::OpenAI => builder.bearer_auth(&self.api_key),
        };

        let response = builder.json(&request).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let text = match self.api_format {
            ApiFormat::Anthropic => {
                let completion: AnthropicResponse = response.json().await?;
                completion.content.into_iter().next().map(|c| c.text)
            }
            ApiFormat::OpenAI => {
                let completion: OpenAIResponse = response.json().await?;
                completion.choices.into_iter().next().map(|c| c.message.content)
            }
        };

        text.ok_or_else(|| GenerationError::Parse("empty completion".to_string()))
    }
}

#[async_trait]
impl FighterGenerator for LlmFighterGenerator {
    async fn generate(&self, seed: &str, side: Side) -> Result<FighterProfile, GenerationError> {
        let prompt = format!(
            "Create a battle profile for a vegetable warrior based on the input \"{}\". \
             Base the stats roughly on its real-world nutritional properties \
             (high fiber means high defense, spicy means high attack).",
            seed
        );
        tracing::debug!(seed, ?side, model = %self.model, "requesting fighter profile");

        let reply = self.complete(PROFILE_SYSTEM_PROMPT, &prompt).await?;
        let json = extract_json(&reply)?;
        serde_json::from_str(json).map_err(|e| GenerationError::Parse(e.to_string()))
    }

    async fn suggest_name(&self) -> Result<String, GenerationError> {
        self.complete("You name vegetable warriors.", NAME_PROMPT).await
    }
}

/// The outermost `{...}` span of a reply
pub fn extract_json(reply: &str) -> Result<&str, GenerationError> {
    let start = reply
        .find('{')
        .ok_or_else(|| GenerationError::Parse("no JSON object in reply".to_string()))?;
    let end = reply
        .rfind('}')
        .ok_or_else(|| GenerationError::Parse("unterminated JSON object in reply".to_string()))?;
    if end < start {
        return Err(GenerationError::Parse("malformed JSON object in reply".to_string()));
    }
    Ok(&reply[start..=end])
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

impl<'a> Message<'a> {
    fn new(role: &'static str, content: &'a str) -> Self {
        Message { role, content }
    }
}

#[derive(Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    text: String,
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}
