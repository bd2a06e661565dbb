//! Decoding of `FT.SEARCH` and `JSON.GET` replies.
//!
//! `FT.SEARCH` over a JSON index answers
//! `[total, key1, ["$", json1], key2, ["$", json2], ...]`; with `LIMIT 0 0`
//! only `[total]` comes back.

use crate::document::TodoDocument;
use redis::Value;
use todo_service_core::{StoreError, Todo};

fn unexpected(what: &str, value: &Value) -> StoreError {
    StoreError::UnexpectedReply(format!("{what}: {value:?}"))
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::BulkString(bytes) => String::from_utf8(bytes.clone()).ok(),
        Value::SimpleString(s) => Some(s.clone()),
        _ => None,
    }
}

fn total(value: &Value) -> Result<u64, StoreError> {
    match value {
        Value::Int(n) => u64::try_from(*n).map_err(|_| unexpected("negative total", value)),
        _ => text(value)
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| unexpected("search total", value)),
    }
}

/// JSON body of one hit's field list (`["$", json]`).
fn hit_json(fields: &Value) -> Result<String, StoreError> {
    let pairs: Vec<(&Value, &Value)> = match fields {
        Value::Array(items) => items
            .chunks_exact(2)
            .map(|pair| (&pair[0], &pair[1]))
            .collect(),
        Value::Map(entries) => entries.iter().map(|(k, v)| (k, v)).collect(),
        _ => return Err(unexpected("search hit fields", fields)),
    };

    pairs
        .into_iter()
        .find(|(name, _)| text(name).as_deref() == Some("$"))
        .and_then(|(_, json)| text(json))
        .ok_or_else(|| unexpected("search hit without '$' field", fields))
}

/// Total hit count of an `FT.SEARCH` reply.
///
/// # Errors
///
/// [`StoreError::UnexpectedReply`] for any other shape.
pub fn search_total(reply: &Value) -> Result<u64, StoreError> {
    match reply {
        Value::Array(items) => match items.first() {
            Some(first) => total(first),
            None => Err(unexpected("empty search reply", reply)),
        },
        _ => Err(unexpected("search reply", reply)),
    }
}

/// Records of an `FT.SEARCH` reply.
///
/// # Errors
///
/// [`StoreError::UnexpectedReply`] for malformed replies,
/// [`StoreError::Serialization`] for malformed documents.
pub fn search_todos(reply: &Value) -> Result<Vec<Todo>, StoreError> {
    let Value::Array(items) = reply else {
        return Err(unexpected("search reply", reply));
    };
    let Some((first, hits)) = items.split_first() else {
        return Err(unexpected("empty search reply", reply));
    };
    total(first)?;

    if hits.len() % 2 != 0 {
        return Err(unexpected("odd number of search hit entries", reply));
    }

    hits.chunks_exact(2)
        .map(|hit| {
            let json = hit_json(&hit[1])?;
            TodoDocument::from_json(&json)?.into_todo()
        })
        .collect()
}

/// Number of matches the store counted but did not return, if any.
///
/// A search reply carries the full match count even when `LIMIT` cut the
/// hit list short.
#[must_use]
pub fn truncated(total: u64, returned: usize) -> Option<u64> {
    let returned = u64::try_from(returned).unwrap_or(u64::MAX);
    (total > returned).then(|| total - returned)
}

/// Record of a `JSON.GET key $` reply. `Nil` means the key is absent.
///
/// # Errors
///
/// [`StoreError::UnexpectedReply`] or [`StoreError::Serialization`].
pub fn json_get(reply: &Value) -> Result<Option<Todo>, StoreError> {
    if matches!(reply, Value::Nil) {
        return Ok(None);
    }

    let json = text(reply).ok_or_else(|| unexpected("JSON.GET reply", reply))?;
    let docs: Vec<TodoDocument> =
        serde_json::from_str(&json).map_err(|e| StoreError::Serialization(e.to_string()))?;

    docs.into_iter().next().map(TodoDocument::into_todo).transpose()
}
