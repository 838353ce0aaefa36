//! `OpenAI`-compatible chat completions decision service
//!
//! Works against any endpoint that speaks the chat completions dialect with
//! function tools (OpenAI, Gemini's compatibility layer, local gateways).

use super::types::{DecisionRequest, DecisionResponse, Usage};
use super::{LlmError, LlmService};
use crate::message::{AiDecision, Message, ToolCall};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";

/// OpenAI-compatible service implementation
pub struct OpenAIService {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAIService {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| LlmError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: model.into(),
        })
    }

    fn translate_request(&self, request: &DecisionRequest) -> OpenAIRequest {
        let mut messages = Vec::with_capacity(request.messages.len() + 1);

        if !request.system.is_empty() {
            messages.push(OpenAIMessage {
                role: "system".to_string(),
                content: Some(Value::String(request.system.clone())),
                tool_calls: None,
                tool_call_id: None,
            });
        }

        messages.extend(request.messages.iter().map(Self::translate_message));

        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|t| OpenAITool {
                        r#type: "function".to_string(),
                        function: OpenAIFunction {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: t.input_schema.clone(),
                        },
                    })
                    .collect(),
            )
        };

        let tool_choice = tools.as_ref().map(|_| "required".to_string());

        OpenAIRequest {
            model: self.model.clone(),
            messages,
            tools,
            tool_choice,
            temperature: request.temperature,
            stream: false,
        }
    }

    /// Translate a conversation message to `OpenAI` format
    fn translate_message(msg: &Message) -> OpenAIMessage {
        match msg {
            Message::Human { text, images } => {
                let content = if images.is_empty() {
                    Value::String(text.clone())
                } else {
                    let mut parts = vec![json!({ "type": "text", "text": text })];
                    parts.extend(
                        images
                            .iter()
                            .map(|url| json!({ "type": "image_url", "image_url": { "url": url } })),
                    );
                    Value::Array(parts)
                };
                OpenAIMessage {
                    role: "user".to_string(),
                    content: Some(content),
                    tool_calls: None,
                    tool_call_id: None,
                }
            }
            Message::Ai(decision) => {
                let content = if decision.content.is_empty() {
                    None
                } else {
                    Some(Value::String(decision.content.clone()))
                };
                let tool_calls = if decision.tool_calls.is_empty() {
                    None
                } else {
                    Some(
                        decision
                            .tool_calls
                            .iter()
                            .map(|call| OpenAIToolCall {
                                id: call.id.clone(),
                                r#type: "function".to_string(),
                                function: OpenAIFunctionCall {
                                    name: call.name.clone(),
                                    arguments: serde_json::to_string(&call.args)
                                        .unwrap_or_else(|_| "{}".to_string()),
                                },
                            })
                            .collect(),
                    )
                };
                OpenAIMessage {
                    role: "assistant".to_string(),
                    // Chat completions rejects an assistant turn with neither
                    content: if content.is_none() && tool_calls.is_none() {
                        Some(Value::String(String::new()))
                    } else {
                        content
                    },
                    tool_calls,
                    tool_call_id: None,
                }
            }
            Message::Tool(result) => OpenAIMessage {
                role: "tool".to_string(),
                content: Some(Value::String(result.content.clone())),
                tool_calls: None,
                tool_call_id: Some(result.tool_call_id.clone()),
            },
        }
    }

    fn normalize_response(resp: OpenAIResponse) -> Result<DecisionResponse, LlmError> {
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed("No choices in response".to_string()))?;

        let content = match choice.message.content {
            Some(Value::String(text)) => text,
            _ => String::new(),
        };

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter(|tc| !tc.function.name.is_empty())
            .map(|tc| {
                let args = serde_json::from_str(&tc.function.arguments).unwrap_or_else(|e| {
                    tracing::warn!(tool = %tc.function.name, error = %e, "Unparseable tool arguments");
                    json!({})
                });
                // Some compatible endpoints omit call ids
                let id = if tc.id.is_empty() {
                    format!("call_{}", uuid::Uuid::new_v4().simple())
                } else {
                    tc.id
                };
                ToolCall::new(id, tc.function.name, args)
            })
            .collect();

        let usage = resp.usage.map_or_else(Usage::default, |u| Usage {
            input_tokens: u64::from(u.prompt_tokens),
            output_tokens: u64::from(u.completion_tokens),
        });

        Ok(DecisionResponse {
            decision: AiDecision {
                content,
                tool_calls,
            },
            usage,
        })
    }
}

#[async_trait]
impl LlmService for OpenAIService {
    async fn decide(&self, request: &DecisionRequest) -> Result<DecisionResponse, LlmError> {
        let openai_request = self.translate_request(request);

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&openai_request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Transport(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    LlmError::Transport(format!("Connection failed: {e}"))
                } else {
                    LlmError::Transport(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| LlmError::Transport(format!("Failed to read response: {e}")))?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<OpenAIErrorResponse>(&body) {
                return Err(LlmError::from_status(status.as_u16(), &error_resp.error.message));
            }
            return Err(LlmError::from_status(status.as_u16(), &body));
        }

        let openai_response: OpenAIResponse = serde_json::from_str(&body).map_err(|e| {
            LlmError::Malformed(format!("{e} - body: {body}"))
        })?;

        Self::normalize_response(openai_response)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

// OpenAI API types

#[derive(Debug, Serialize)]
struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<OpenAITool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIMessage {
    role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OpenAIToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

#[derive(Debug, Serialize)]
struct OpenAITool {
    r#type: String,
    function: OpenAIFunction,
}

#[derive(Debug, Serialize)]
struct OpenAIFunction {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIToolCall {
    #[serde(default)]
    id: String,
    #[serde(default = "function_type")]
    r#type: String,
    function: OpenAIFunctionCall,
}

fn function_type() -> String {
    "function".to_string()
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAIFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
    #[serde(default)]
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
}

#[derive(Debug, Deserialize)]
#[allow(clippy::struct_field_names)]
struct OpenAIUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolDefinition;
    use crate::message::RESPOND_TOOL;

    fn service() -> OpenAIService {
        OpenAIService::new("key", DEFAULT_BASE_URL, "gemini-2.5-flash").unwrap()
    }

    #[test]
    fn test_request_requires_tool_call() {
        let request = DecisionRequest::new(
            "system",
            vec![Message::human("hi")],
            vec![ToolDefinition {
                name: RESPOND_TOOL.to_string(),
                description: "respond".to_string(),
                input_schema: json!({"type": "object"}),
            }],
        )
        .with_temperature(0.1);

        let body = serde_json::to_value(service().translate_request(&request)).unwrap();
        assert_eq!(body["tool_choice"], "required");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "hi");
        assert_eq!(body["tools"][0]["function"]["name"], RESPOND_TOOL);
    }

    #[test]
    fn test_no_tools_omits_tool_choice() {
        let request = DecisionRequest::new("", vec![Message::human("hi")], vec![]);
        let body = serde_json::to_value(service().translate_request(&request)).unwrap();
        assert!(body.get("tool_choice").is_none());
        assert_eq!(body["messages"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn test_images_become_parts() {
        let msg = OpenAIService::translate_message(&Message::human_with_images(
            "what is this",
            vec!["https://cdn.example/a.png".to_string()],
        ));
        let content = msg.content.unwrap();
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[1]["image_url"]["url"], "https://cdn.example/a.png");
    }

    #[test]
    fn test_tool_calls_round_trip_through_wire_format() {
        let decision = Message::ai_calls(vec![ToolCall::new(
            "c1",
            RESPOND_TOOL,
            json!({"message": "Hi!"}),
        )]);
        let wire = OpenAIService::translate_message(&decision);
        assert_eq!(wire.role, "assistant");
        assert!(wire.content.is_none());

        let response = OpenAIResponse {
            choices: vec![OpenAIChoice { message: wire }],
            usage: None,
        };
        let normalized = OpenAIService::normalize_response(response).unwrap();
        assert_eq!(decision.as_decision(), Some(&normalized.decision));
    }

    #[test]
    fn test_normalize_fills_missing_ids_and_bad_args() {
        let response: OpenAIResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "function": { "name": "search_products", "arguments": "{not json" }
                    }]
                }
            }],
            "usage": { "prompt_tokens": 10, "completion_tokens": 3 }
        }))
        .unwrap();

        let normalized = OpenAIService::normalize_response(response).unwrap();
        let call = &normalized.decision.tool_calls[0];
        assert!(call.id.starts_with("call_"));
        assert_eq!(call.args, json!({}));
        assert_eq!(normalized.usage.input_tokens, 10);
    }

    #[test]
    fn test_empty_choices_is_error() {
        let response = OpenAIResponse {
            choices: vec![],
            usage: None,
        };
        assert!(OpenAIService::normalize_response(response).is_err());
    }
}
