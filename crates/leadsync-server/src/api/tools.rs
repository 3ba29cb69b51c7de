use axum::{
    body::Bytes,
    extract::{Path, State},
    response::IntoResponse,
    Extension, Json,
};
use leadsync_flow::Tool;
use serde::Serialize;
use serde_json::Value;

use super::{ApiError, ApiResponse, AppState, ResponseMeta};
use crate::middleware::RequestId;

#[derive(Debug, Serialize)]
pub(super) struct ToolDescriptor {
    name: &'static str,
    description: &'static str,
}

pub(super) async fn list_tools(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    let data: Vec<ToolDescriptor> = Tool::ALL
        .into_iter()
        .map(|tool| ToolDescriptor {
            name: tool.name(),
            description: tool.description(),
        })
        .collect();

    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    })
}

/// `POST /mcp/tools/{tool}`: runs a tool and returns its result object.
///
/// The body is the tool payload, optionally wrapped as `{"lead": payload}`.
/// Tool-level failures are still HTTP 200; the `status` field carries them.
pub(super) async fn call_tool(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(tool_name): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let tool: Tool = tool_name
        .parse()
        .map_err(|e: leadsync_flow::UnknownTool| ApiError::new(&req_id.0, "not_found", e.to_string()))?;

    let payload: Value = serde_json::from_slice(&body).map_err(|e| {
        ApiError::new(
            &req_id.0,
            "bad_request",
            format!("request body is not valid JSON: {e}"),
        )
    })?;

    let result = tool.invoke(&state.flow, unwrap_lead(&payload)).await;
    tracing::info!(tool = %tool, status = ?result.status, request_id = %req_id.0, "tool call finished");
    Ok(Json(result))
}

/// Unwraps the `{"lead": payload}` envelope sent by MCP clients.
fn unwrap_lead(payload: &Value) -> &Value {
    match payload.as_object() {
        Some(object) if object.len() == 1 => object.get("lead").unwrap_or(payload),
        _ => payload,
    }
}
