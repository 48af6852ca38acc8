/// Gemini `generateContent` client
///
/// Sends one prompt per call and returns the first candidate's text. The
/// HTTP client carries a request timeout so a hung generation service cannot
/// hold requests open past the configured bound.
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::services::explain::GenerativeClient;

#[derive(Clone)]
pub struct GeminiClient {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    model: String,
}

impl GeminiClient {
    pub fn new(
        api_key: String,
        api_url: String,
        model: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url,
            model,
        })
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
}

impl GenerateRequest {
    fn from_prompt(prompt: &str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompt.to_string(),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

impl GenerateResponse {
    /// Concatenated text of the first candidate, if any
    fn into_text(self) -> Option<String> {
        let parts = self.candidates.into_iter().next()?.content?.parts;
        let text: String = parts.into_iter().map(|part| part.text).collect();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait::async_trait]
impl GenerativeClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> AppResult<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_url, self.model
        );

        let response = self
            .http_client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&GenerateRequest::from_prompt(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "Generation API returned status {}: {}",
                status, body
            )));
        }

        let generated: GenerateResponse = response.json().await?;
        let text = generated.into_text().ok_or_else(|| {
            AppError::ExternalApi("Generation API response contained no text".to_string())
        })?;

        tracing::debug!(chars = text.len(), model = %self.model, "Generated explanation text");

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = GenerateRequest::from_prompt("why this product");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "why this product");
    }

    #[test]
    fn test_response_text_extraction() {
        let json = r#"{
            "candidates": [
                {
                    "content": {
                        "parts": [
                            {"text": "Because you liked gadgets, "},
                            {"text": "this one sings."}
                        ]
                    }
                }
            ]
        }"#;

        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.into_text().unwrap(),
            "Because you liked gadgets, this one sings."
        );
    }

    #[test]
    fn test_response_without_candidates_has_no_text() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_text().is_none());
    }

    #[test]
    fn test_response_with_empty_content_has_no_text() {
        let json = r#"{"candidates": [{"content": {"parts": []}}]}"#;
        let response: GenerateResponse = serde_json::from_str(json).unwrap();
        assert!(response.into_text().is_none());
    }
}
