//! Gemini `generateContent` client.
//!
//! Structured calls send a response schema and ask for JSON; the model's text
//! part is then parsed into the matching suggestion type.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{Result, TickitError};
use crate::suggest::{SearchFilters, SuggestionService, TaskBreakdown, TaskSuggestion};
use crate::task::Task;

const BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// HTTP client for the Gemini API.
pub struct GeminiClient {
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: api_key.into(),
            client: reqwest::Client::new(),
        }
    }

    async fn generate(&self, prompt: String, schema: Option<Value>) -> Result<String> {
        let url = format!(
            "{BASE_URL}/v1beta/models/{}:generateContent",
            self.model
        );
        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if let Some(schema) = schema {
            body["generationConfig"] = json!({
                "responseMimeType": "application/json",
                "responseSchema": schema
            });
        }
        debug!(model = %self.model, "gemini request");
        let res = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(TickitError::Suggestion(format!("gemini error {status}: {text}")));
        }
        response_text(&text)
    }

    async fn generate_json<T: DeserializeOwned>(&self, prompt: String, schema: Value) -> Result<T> {
        let raw = self.generate(prompt, Some(schema)).await?;
        parse_json_reply(&raw)
    }
}

/// Extract the first text part from a `generateContent` response body.
fn response_text(body: &str) -> Result<String> {
    let parsed: GenerateResponse = serde_json::from_str(body)?;
    parsed
        .candidates
        .into_iter()
        .filter_map(|c| c.content)
        .flat_map(|c| c.parts)
        .find_map(|p| p.text)
        .ok_or_else(|| TickitError::Suggestion("response contained no text".into()))
}

/// Parse a model reply as JSON, tolerating a surrounding markdown code fence.
fn parse_json_reply<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|s| s.strip_suffix("```"))
        .unwrap_or(trimmed);
    Ok(serde_json::from_str(inner.trim())?)
}

fn breakdown_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "subtasks": {
                "type": "ARRAY",
                "items": {
                    "type": "OBJECT",
                    "properties": { "title": { "type": "STRING" } },
                    "required": ["title"]
                }
            },
            "suggestedPriority": {
                "type": "STRING",
                "description": "Suggest one of: LOW, MEDIUM, HIGH, URGENT"
            },
            "motivationalQuote": { "type": "STRING" }
        },
        "required": ["subtasks", "suggestedPriority", "motivationalQuote"]
    })
}

fn suggestion_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "suggestion": { "type": "STRING" },
            "reasoning": { "type": "STRING" },
            "priority": { "type": "STRING" }
        },
        "required": ["suggestion", "reasoning", "priority"]
    })
}

fn search_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "status": { "type": "STRING", "description": "TODO, COMPLETED, or ALL" },
            "priority": { "type": "STRING", "description": "LOW, MEDIUM, HIGH, URGENT, or ALL" },
            "timeRange": { "type": "STRING", "description": "today, week, or all" }
        },
        "required": ["status", "priority", "timeRange"]
    })
}

#[async_trait]
impl SuggestionService for GeminiClient {
    async fn task_breakdown(&self, title: &str, description: &str) -> Result<TaskBreakdown> {
        let prompt = format!(
            "Break down this task into 3-5 actionable subtasks: \"{title}\". \
             Description: {description}"
        );
        self.generate_json(prompt, breakdown_schema()).await
    }

    async fn productivity_insight(&self, total: usize, completed_today: usize) -> Result<String> {
        let prompt = format!(
            "I have {total} tasks total and I completed {completed_today} today. \
             Give me one short, punchy sentence of productivity advice."
        );
        self.generate(prompt, None).await
    }

    async fn suggest_task(&self, recent: &[Task]) -> Result<TaskSuggestion> {
        let tasks = serde_json::to_string(recent)?;
        let prompt = format!(
            "Based on these tasks: {tasks}, suggest one new task the user might need to do today \
             based on their activity patterns or common habits."
        );
        self.generate_json(prompt, suggestion_schema()).await
    }

    async fn parse_search(&self, query: &str) -> Result<SearchFilters> {
        let prompt = format!(
            "Translate this natural language search query into filter parameters: \"{query}\"."
        );
        self.generate_json(prompt, search_schema()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_text_takes_first_part() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"hello"},{"text":"ignored"}]}}]}"#;
        assert_eq!(response_text(body).unwrap(), "hello");
    }

    #[test]
    fn test_response_without_text_is_an_error() {
        assert!(matches!(response_text(r#"{"candidates":[]}"#), Err(TickitError::Suggestion(_))));
        assert!(matches!(response_text(r#"{"candidates":[{}]}"#), Err(TickitError::Suggestion(_))));
        assert!(matches!(response_text("not json"), Err(TickitError::Serde(_))));
    }

    #[test]
    fn test_parse_json_reply_strips_fence() {
        let raw = "```json\n{\"status\":\"TODO\",\"priority\":\"HIGH\",\"timeRange\":\"today\"}\n```";
        let f: SearchFilters = parse_json_reply(raw).unwrap();
        assert_eq!(f.priority, "HIGH");
        assert_eq!(f.time_range, "today");

        let plain = r#"{"suggestion":"Stretch","reasoning":"long day","priority":"LOW"}"#;
        let s: TaskSuggestion = parse_json_reply(plain).unwrap();
        assert_eq!(s.suggestion, "Stretch");
    }

    #[test]
    fn test_schemas_require_every_field() {
        let b = breakdown_schema();
        assert_eq!(b["required"].as_array().unwrap().len(), 3);
        assert_eq!(search_schema()["properties"]["timeRange"]["type"], "STRING");
        assert_eq!(suggestion_schema()["required"][0], "suggestion");
    }
}
