//! Action server: the single entry point from raw event to response envelope.

use crate::config::{Config, RouteConfig};
use crate::error::ActionError;
use crate::event::{ActionEvent, ActionResponse, ResponseTarget};
use crate::format::{CourseView, ErrorBody};
use crate::search::SearchEngine;
use crate::store::RecordStore;
use crate::tools::search::{SearchRequest, handle_search};
use anyhow::Context;
use futures::FutureExt;
use serde_json::Value;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Serves course search actions for either event shape.
///
/// Every call yields a well-formed envelope; failures become error bodies with
/// a 400- or 500-class status in the shape the event was detected as.
#[derive(Debug, Clone)]
pub struct ActionServer {
    engine: SearchEngine,
    routes: RouteConfig,
    description_budget: usize,
    include_traces: bool,
}

impl ActionServer {
    pub fn new(store: Arc<dyn RecordStore>, config: &Config) -> Self {
        Self {
            engine: SearchEngine::new(store, config),
            routes: config.routes.clone(),
            description_budget: config.search.description_budget,
            include_traces: config.search.include_traces,
        }
    }

    /// Serve newline-delimited events from `reader` until end of input.
    ///
    /// Blank lines are skipped. Every other line, parseable or not, gets exactly one
    /// compact JSON envelope line on `writer`, flushed immediately. Returns the number
    /// of responses written.
    pub async fn serve_lines<R, W>(&self, reader: R, mut writer: W) -> anyhow::Result<usize>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = reader.lines();
        let mut served = 0;

        while let Some(line) = lines.next_line().await.context("Failed to read event")? {
            if line.trim().is_empty() {
                continue;
            }

            let response = self.handle_str(&line).await;
            let mut encoded =
                serde_json::to_string(&response).context("Failed to encode response")?;
            encoded.push('\n');
            writer
                .write_all(encoded.as_bytes())
                .await
                .context("Failed to write response")?;
            writer.flush().await.context("Failed to flush response")?;
            served += 1;
        }

        Ok(served)
    }

    /// Handle one event serialized as JSON text.
    pub async fn handle_str(&self, event: &str) -> ActionResponse {
        match serde_json::from_str::<Value>(event) {
            Ok(raw) => self.handle(&raw).await,
            Err(e) => {
                let error = ActionError::MalformedEvent(format!("not valid JSON: {}", e));
                tracing::warn!("{}", error);
                failure(&ResponseTarget::fallback(&self.routes), &error)
            }
        }
    }

    /// Handle one event.
    pub async fn handle(&self, raw: &Value) -> ActionResponse {
        let target = ResponseTarget::from_raw(raw, &self.routes);

        let result = match AssertUnwindSafe(self.dispatch(raw)).catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(ActionError::Internal(panic_message(panic.as_ref()))),
        };

        match result {
            Ok(body) => target.envelope(200, body),
            Err(error) => {
                if error.is_client_error() {
                    tracing::warn!("Rejected event: {}", error);
                } else {
                    tracing::error!("Search failed: {}", error);
                }
                failure(&target, &error)
            }
        }
    }

    async fn dispatch(&self, raw: &Value) -> Result<String, ActionError> {
        let (request, view) = match ActionEvent::detect(raw)? {
            ActionEvent::FunctionCall(call) => {
                tracing::debug!("Function call event: {}", call.function);
                if call.function != self.routes.function_name {
                    return Err(ActionError::UnknownFunction {
                        function: call.function,
                    });
                }
                (
                    SearchRequest::from_parameters(&call.parameters),
                    CourseView::Full,
                )
            }
            ActionEvent::ApiPath(api) => {
                tracing::debug!("API path event: {} {}", api.http_method, api.api_path);
                if api.api_path != self.routes.api_path
                    || !api.http_method.eq_ignore_ascii_case(&self.routes.http_method)
                {
                    return Err(ActionError::UnknownRoute {
                        api_path: api.api_path,
                        http_method: api.http_method,
                    });
                }
                (
                    SearchRequest::from_properties(api.properties()),
                    CourseView::Public {
                        description_budget: self.description_budget,
                    },
                )
            }
        };

        handle_search(&self.engine, request, view, self.include_traces).await
    }
}

fn failure(target: &ResponseTarget, error: &ActionError) -> ActionResponse {
    let body = serde_json::to_string(&ErrorBody::new(error))
        .unwrap_or_else(|_| r#"{"error":"internal error"}"#.to_string());
    target.envelope(error.status_code(), body)
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "search panicked".to_string()
    }
}
