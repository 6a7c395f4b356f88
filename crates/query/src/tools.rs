#![forbid(unsafe_code)]

use cg_core::ids::LearningId;
use cg_storage::{LearningRow, SqliteStore};
use serde_json::{Value, json};

pub(crate) fn tool_definitions() -> Value {
    json!([
        {
            "name": "get_learning",
            "description": "Exact lookup of a learning by its id.",
            "inputSchema": {
                "type": "object",
                "properties": { "id": { "type": "string" } },
                "required": ["id"],
            },
        },
        {
            "name": "search_learnings",
            "description": "Case-sensitive substring search over learning title and content, newest first.",
            "inputSchema": {
                "type": "object",
                "properties": {
                    "query": { "type": "string" },
                    "limit": { "type": "integer", "default": 10 },
                },
                "required": ["query"],
            },
        },
    ])
}

fn learning_to_json(row: &LearningRow) -> Value {
    json!({
        "id": row.id.as_str(),
        "conversationId": row.conversation_id.as_str(),
        "category": row.category,
        "title": row.title,
        "content": row.content,
        "createdAt": row.created_at,
    })
}

#[derive(Debug)]
pub(crate) enum ToolError {
    InvalidParams(&'static str),
    UnknownTool(String),
    Internal(String),
}

pub(crate) fn dispatch_tool(
    store: &SqliteStore,
    name: &str,
    arguments: &Value,
) -> Result<Value, ToolError> {
    match name {
        "get_learning" => {
            let id_str = arguments
                .get("id")
                .and_then(Value::as_str)
                .ok_or(ToolError::InvalidParams("id must be a string"))?;
            let id = LearningId::try_new(id_str.to_string())
                .map_err(|_| ToolError::InvalidParams("id is not a valid learning id"))?;
            let row = store
                .learning_get(&id)
                .map_err(|err| ToolError::Internal(err.to_string()))?;
            Ok(match row {
                Some(row) => learning_to_json(&row),
                None => Value::Null,
            })
        }
        "search_learnings" => {
            let query = arguments
                .get("query")
                .and_then(Value::as_str)
                .ok_or(ToolError::InvalidParams("query must be a string"))?;
            let limit = arguments.get("limit").and_then(Value::as_i64);
            let rows = store
                .learning_search(query, limit)
                .map_err(|err| ToolError::Internal(err.to_string()))?;
            Ok(Value::Array(rows.iter().map(learning_to_json).collect()))
        }
        other => Err(ToolError::UnknownTool(other.to_string())),
    }
}
