use async_trait::async_trait;
use log::debug;
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION } };
use serde::{ Deserialize, Serialize };

use super::{ ChatClient, LlmError };
use crate::llm::{ LlmConfig, DEFAULT_BASE_URL, DEFAULT_CHAT_MODEL };
use crate::models::chat::PromptSegment;

/// Client for OpenAI-compatible `/v1/chat/completions` endpoints.
pub struct OpenAIChatClient {
    http: HttpClient,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
struct OpenAIChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptSegment],
}

#[derive(Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

impl OpenAIChatClient {
    pub fn new(
        api_key: Option<String>,
        model: Option<String>,
        base_url: Option<String>
    ) -> Result<Self, LlmError> {
        let model = model.unwrap_or_else(|| DEFAULT_CHAT_MODEL.to_string());
        let base_url = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(|e|
                LlmError::InvalidApiKey(e.to_string())
            )?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = HttpClient::builder().default_headers(headers).build()?;

        Ok(Self { http, model, base_url })
    }

    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        Self::new(config.api_key.clone(), config.completion_model.clone(), config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn completions_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if base.ends_with("/v1/chat/completions") {
            base.to_string()
        } else if base.ends_with("/v1") {
            format!("{}/chat/completions", base)
        } else {
            format!("{}/v1/chat/completions", base)
        }
    }
}

#[async_trait]
impl ChatClient for OpenAIChatClient {
    async fn complete(&self, prompt: &[PromptSegment]) -> Result<String, LlmError> {
        let url = self.completions_url();
        debug!("Pinging {} with {} prompt segments: {:#?}", url, prompt.len(), prompt);

        let req = OpenAIChatRequest {
            model: &self.model,
            messages: prompt,
        };

        let resp = self.http.post(&url).json(&req).send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(LlmError::Status { status: status.as_u16(), body });
        }

        let parsed: OpenAIResponse = serde_json::from_str(&body)?;
        parsed.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .ok_or(LlmError::EmptyResponse)
    }

    fn get_model(&self) -> String {
        self.model.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_url_accepts_common_base_forms() {
        for (base, expected) in [
            ("https://api.openai.com", "https://api.openai.com/v1/chat/completions"),
            ("https://api.openai.com/", "https://api.openai.com/v1/chat/completions"),
            ("http://localhost:8000/v1", "http://localhost:8000/v1/chat/completions"),
            ("http://proxy/v1/chat/completions", "http://proxy/v1/chat/completions"),
        ] {
            let client = OpenAIChatClient::new(None, None, Some(base.into())).unwrap();
            assert_eq!(client.completions_url(), expected);
        }
    }

    #[test]
    fn defaults_to_gpt5_on_openai() {
        let client = OpenAIChatClient::from_config(&LlmConfig::default()).unwrap();
        assert_eq!(client.get_model(), "gpt-5");
        assert_eq!(client.base_url(), "https://api.openai.com");
    }

    #[test]
    fn rejects_api_key_with_control_characters() {
        let result = OpenAIChatClient::new(Some("bad\nkey".into()), None, None);
        assert!(matches!(result, Err(LlmError::InvalidApiKey(_))));
    }

    #[test]
    fn request_body_uses_role_content_pairs() {
        let prompt = vec![PromptSegment::system("sys"), PromptSegment::user("hi")];
        let body = serde_json
            ::to_value(OpenAIChatRequest { model: "gpt-5", messages: &prompt })
            .unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "gpt-5",
                "messages": [
                    { "role": "system", "content": "sys" },
                    { "role": "user", "content": "hi" }
                ]
            })
        );
    }
}
