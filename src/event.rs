//! Orchestrator event and response envelopes.
//!
//! Two mutually exclusive inbound shapes are accepted:
//! - **function call**: `{ function, actionGroup, parameters: [{name, value}] }`
//! - **API path**: `{ apiPath, httpMethod, actionGroup, requestBody: { content: { "application/json": { properties: [{name, value}] } } } }`
//!
//! Each is answered in its own envelope family. [`ResponseTarget`] is read
//! leniently from the raw event so that even a malformed event is answered
//! in the best-guess shape.

use crate::config::RouteConfig;
use crate::error::ActionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version string carried by every response envelope.
pub const MESSAGE_VERSION: &str = "1.0";

/// A `{name, value}` pair from `parameters` or `properties`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NamedValue {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl NamedValue {
    /// The value as text. Strings are returned as-is, other scalars in JSON form.
    pub fn text(&self) -> Option<String> {
        match &self.value {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// Look up a named value, first occurrence wins.
pub fn find_value(values: &[NamedValue], name: &str) -> Option<String> {
    values.iter().find(|v| v.name == name).and_then(NamedValue::text)
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCallEvent {
    pub function: String,
    #[serde(default)]
    pub action_group: Option<String>,
    #[serde(default)]
    pub parameters: Vec<NamedValue>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiPathEvent {
    pub api_path: String,
    pub http_method: String,
    #[serde(default)]
    pub action_group: Option<String>,
    #[serde(default)]
    pub request_body: Option<RequestBody>,
}

impl ApiPathEvent {
    /// Properties of the JSON request body, empty when there is none.
    pub fn properties(&self) -> &[NamedValue] {
        self.request_body
            .as_ref()
            .and_then(|body| body.content.json.as_ref())
            .map(|json| json.properties.as_slice())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub content: RequestContent,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RequestContent {
    #[serde(rename = "application/json", default)]
    pub json: Option<PropertyList>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PropertyList {
    #[serde(default)]
    pub properties: Vec<NamedValue>,
}

/// An inbound event of either shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEvent {
    FunctionCall(FunctionCallEvent),
    ApiPath(ApiPathEvent),
}

impl ActionEvent {
    /// Determine the shape and parse it. `apiPath` takes precedence over `function`.
    pub fn detect(raw: &Value) -> Result<Self, ActionError> {
        let Some(object) = raw.as_object() else {
            return Err(ActionError::MalformedEvent(
                "event is not a JSON object".to_string(),
            ));
        };

        if object.contains_key("apiPath") {
            ApiPathEvent::deserialize(raw)
                .map(Self::ApiPath)
                .map_err(|e| ActionError::MalformedEvent(format!("API path event: {}", e)))
        } else if object.contains_key("function") {
            FunctionCallEvent::deserialize(raw)
                .map(Self::FunctionCall)
                .map_err(|e| ActionError::MalformedEvent(format!("function call event: {}", e)))
        } else {
            Err(ActionError::MalformedEvent(
                "event carries neither 'function' nor 'apiPath'".to_string(),
            ))
        }
    }
}

/// Where and how a response is addressed, echoing the inbound event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseTarget {
    Function {
        action_group: String,
        function: String,
    },
    Api {
        action_group: String,
        api_path: String,
        http_method: String,
    },
}

impl ResponseTarget {
    /// Best-guess target for `raw`, never failing. Non-objects and events of
    /// unknown shape get the function-call shape with configured defaults.
    pub fn from_raw(raw: &Value, routes: &RouteConfig) -> Self {
        let field = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
        let action_group =
            field("actionGroup").unwrap_or_else(|| routes.default_action_group.clone());

        if raw.get("apiPath").is_some() {
            Self::Api {
                action_group,
                api_path: field("apiPath").unwrap_or_default(),
                http_method: field("httpMethod").unwrap_or_default(),
            }
        } else {
            Self::Function {
                action_group,
                function: field("function").unwrap_or_else(|| routes.function_name.clone()),
            }
        }
    }

    pub fn fallback(routes: &RouteConfig) -> Self {
        Self::from_raw(&Value::Null, routes)
    }

    /// Wrap a JSON body string in this target's envelope.
    pub fn envelope(&self, status: u16, body: String) -> ActionResponse {
        let response = match self.clone() {
            Self::Function {
                action_group,
                function,
            } => ResponsePayload::Function(FunctionResponse {
                action_group,
                function,
                function_response: FunctionResponseBody {
                    response_state: response_state(status),
                    response_body: TextBody {
                        text: BodyText { body },
                    },
                },
            }),
            Self::Api {
                action_group,
                api_path,
                http_method,
            } => ResponsePayload::Api(ApiResponse {
                action_group,
                api_path,
                http_method,
                http_status_code: status,
                response_body: JsonBody {
                    json: BodyText { body },
                },
            }),
        };

        ActionResponse {
            message_version: MESSAGE_VERSION.to_string(),
            response,
        }
    }
}

/// Function-call responses have no status code; failures are flagged instead.
const fn response_state(status: u16) -> Option<ResponseState> {
    match status {
        0..=399 => None,
        400..=499 => Some(ResponseState::Reprompt),
        _ => Some(ResponseState::Failure),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseState {
    Failure,
    Reprompt,
}

/// Outbound envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionResponse {
    pub message_version: String,
    pub response: ResponsePayload,
}

impl ActionResponse {
    /// The JSON body string carried inside the envelope.
    pub fn body(&self) -> &str {
        match &self.response {
            ResponsePayload::Function(f) => &f.function_response.response_body.text.body,
            ResponsePayload::Api(a) => &a.response_body.json.body,
        }
    }

    /// HTTP status for API path responses.
    pub const fn http_status_code(&self) -> Option<u16> {
        match &self.response {
            ResponsePayload::Function(_) => None,
            ResponsePayload::Api(a) => Some(a.http_status_code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ResponsePayload {
    Function(FunctionResponse),
    Api(ApiResponse),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub action_group: String,
    pub function: String,
    pub function_response: FunctionResponseBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_state: Option<ResponseState>,
    pub response_body: TextBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TextBody {
    #[serde(rename = "TEXT")]
    pub text: BodyText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub action_group: String,
    pub api_path: String,
    pub http_method: String,
    pub http_status_code: u16,
    pub response_body: JsonBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonBody {
    #[serde(rename = "application/json")]
    pub json: BodyText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BodyText {
    pub body: String,
}
