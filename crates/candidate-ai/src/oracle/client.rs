use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{OracleClient, OracleError, OracleRequest};
use crate::config::{ConfigError, OracleConfig};

/// Production oracle client speaking an OpenAI-compatible chat dialect.
///
/// The credential is checked at construction so a misconfigured service
/// fails at startup, not on the first grading call.
pub struct HttpOracleClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
    vision_model: String,
}

impl HttpOracleClient {
    pub fn new(config: &OracleConfig) -> Result<Self, ConfigError> {
        if config.api_key.trim().is_empty() {
            return Err(ConfigError::MissingOracleApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|_| ConfigError::InvalidOracleTimeout)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            vision_model: config.vision_model.clone(),
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }

    fn wire_request(&self, request: &OracleRequest) -> ChatCompletionRequest {
        let mut messages = Vec::new();

        if let Some(system) = &request.system {
            messages.push(ChatMessage {
                role: "system",
                content: MessageContent::Text(system.clone()),
            });
        }

        let content = if request.images_png_base64.is_empty() {
            MessageContent::Text(request.user.clone())
        } else {
            let mut parts = vec![ContentPart::Text {
                text: request.user.clone(),
            }];
            for image in &request.images_png_base64 {
                parts.push(ContentPart::ImageUrl {
                    image_url: ImageUrl {
                        url: format!("data:image/png;base64,{image}"),
                    },
                });
            }
            MessageContent::Parts(parts)
        };
        messages.push(ChatMessage {
            role: "user",
            content,
        });

        let model = if request.images_png_base64.is_empty() {
            self.model.clone()
        } else {
            self.vision_model.clone()
        };

        ChatCompletionRequest {
            model,
            messages,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

impl OracleClient for HttpOracleClient {
    async fn complete(&self, request: OracleRequest) -> Result<String, OracleError> {
        let body = self.wire_request(&request);
        let url = self.completions_url();

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    OracleError::Unavailable(format!("request to {url} timed out"))
                } else {
                    OracleError::Unavailable(err.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Unavailable(format!(
                "oracle endpoint returned {status}"
            )));
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|err| OracleError::Unavailable(err.to_string()))?;

        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(OracleError::EmptyResponse)?;

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: MessageContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Serialize)]
struct ImageUrl {
    url: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> OracleConfig {
        OracleConfig {
            api_key: "test-key".to_string(),
            base_url: "https://oracle.example.com/v1/".to_string(),
            model: "grader-1".to_string(),
            vision_model: "grader-1-vision".to_string(),
            request_timeout_secs: 30,
        }
    }

    #[test]
    fn construction_requires_credential() {
        let mut bad = config();
        bad.api_key = "   ".to_string();
        assert!(matches!(
            HttpOracleClient::new(&bad),
            Err(ConfigError::MissingOracleApiKey)
        ));
    }

    #[test]
    fn trailing_slash_is_normalized() {
        let client = HttpOracleClient::new(&config()).expect("client builds");
        assert_eq!(
            client.completions_url(),
            "https://oracle.example.com/v1/chat/completions"
        );
    }

    #[test]
    fn vision_model_selected_when_images_present() {
        let client = HttpOracleClient::new(&config()).expect("client builds");
        let text_only = client.wire_request(&OracleRequest::text("sys", "user"));
        assert_eq!(text_only.model, "grader-1");

        let with_image = client.wire_request(
            &OracleRequest::text("sys", "user").with_images(vec!["QUJD".to_string()]),
        );
        assert_eq!(with_image.model, "grader-1-vision");
    }

    #[test]
    fn image_parts_serialize_as_data_urls() {
        let client = HttpOracleClient::new(&config()).expect("client builds");
        let request = client.wire_request(
            &OracleRequest::text("sys", "read this").with_images(vec!["QUJD".to_string()]),
        );
        let wire = serde_json::to_value(&request).expect("serializes");
        let parts = wire["messages"][1]["content"]
            .as_array()
            .expect("content is an array when images ride along");
        assert_eq!(parts[0]["type"], "text");
        assert_eq!(parts[1]["type"], "image_url");
        assert_eq!(
            parts[1]["image_url"]["url"],
            "data:image/png;base64,QUJD"
        );
    }
}
