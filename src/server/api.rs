//! API handlers: JSON payloads over the data store's collaborator
//! operations. Validation failures answer 400 with a per-field error list;
//! commit conflicts answer 409; nothing here panics.

use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::data::commits::CommitError;
use crate::data::companion::Row;
use crate::data::datastore::DataStore;
use crate::data::export::ExportError;
use crate::data::mutator::{Mutator, MutatorDraft};
use crate::data::roster::{Champion, RosterFilter};
use crate::data::tag::TagData;
use crate::server::routes::HttpResponse;

pub fn health_payload(store: &DataStore) -> HttpResponse {
    json_ok(json!({
        "status": "ok",
        "mutators": store.mutators().len(),
        "tags": store.tags().len(),
        "roster": store.roster().len(),
        "commits": store.commits().len(),
    }))
}

pub fn mutators_payload(store: &DataStore) -> HttpResponse {
    json_ok(serde_json::to_value(store.mutators()).unwrap_or_else(|_| json!([])))
}

pub fn add_mutator_payload(store: &mut DataStore, body: &str) -> HttpResponse {
    let draft: MutatorDraft = match serde_json::from_str(body) {
        Ok(draft) => draft,
        Err(_) => return json_error(400, "Bad Request", "Invalid request body"),
    };

    let mut errors = Vec::new();
    if draft.name.trim().is_empty() {
        errors.push(("name", "must not be empty"));
    }
    if draft.description.trim().is_empty() {
        errors.push(("description", "must not be empty"));
    }
    if !errors.is_empty() {
        return validation_failed(errors);
    }

    match store.add_mutator(draft) {
        Some(mutator) => json_ok(json!({ "status": "ok", "mutator": mutator })),
        None => json_error(400, "Bad Request", "mutator was not added"),
    }
}

pub fn edit_mutator_payload(store: &mut DataStore, body: &str) -> HttpResponse {
    let updated: Mutator = match serde_json::from_str(body) {
        Ok(mutator) => mutator,
        Err(_) => return json_error(400, "Bad Request", "Invalid request body"),
    };
    let applied = store.edit_mutator(updated);
    json_ok(json!({ "status": "ok", "updated": applied }))
}

pub fn delete_mutator_payload(store: &mut DataStore, raw_id: &str) -> HttpResponse {
    let deleted = store.delete_mutator(&percent_decode(raw_id));
    json_ok(json!({ "status": "ok", "deleted": deleted }))
}

pub fn tags_payload(store: &DataStore) -> HttpResponse {
    json_ok(serde_json::to_value(store.tags()).unwrap_or_else(|_| json!({})))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagUpdateRequest {
    #[serde(default)]
    name: String,
    #[serde(default)]
    good_champions: String,
    #[serde(default)]
    bad_champions: String,
}

pub fn update_tag_payload(store: &mut DataStore, body: &str) -> HttpResponse {
    let request: TagUpdateRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(_) => return json_error(400, "Bad Request", "Invalid request body"),
    };
    if request.name.trim().is_empty() {
        return validation_failed(vec![("name", "must not be empty")]);
    }
    store.update_tag(
        &request.name,
        TagData {
            good_champions: request.good_champions,
            bad_champions: request.bad_champions,
        },
    );
    json_ok(json!({ "status": "ok", "tag": request.name.trim() }))
}

pub fn tag_payload(store: &DataStore, raw_name: &str) -> HttpResponse {
    let name = percent_decode(raw_name);
    match store.tag_data(&name) {
        Some(data) => json_ok(serde_json::to_value(data).unwrap_or_else(|_| json!({}))),
        None => json_error(404, "Not Found", &format!("no tag named '{name}'")),
    }
}

pub fn roster_payload(store: &DataStore, query: &str) -> HttpResponse {
    let filter = filter_from_query(query);
    let rows: Vec<Value> = store
        .roster()
        .iter()
        .filter(|champion| filter.matches(champion))
        .map(|champion| Value::Object(champion.to_row()))
        .collect();
    json_ok(Value::Array(rows))
}

pub fn update_champion_payload(store: &mut DataStore, body: &str) -> HttpResponse {
    let row: Row = match serde_json::from_str(body) {
        Ok(row) => row,
        Err(_) => return json_error(400, "Bad Request", "Invalid request body"),
    };
    let Some(champion) = Champion::from_row(&row) else {
        return validation_failed(vec![("Champion_name", "must not be empty")]);
    };
    let updated = store.update_champion(&champion);
    json_ok(json!({ "status": "ok", "updated": updated }))
}

pub fn commits_payload(store: &DataStore) -> HttpResponse {
    json_ok(serde_json::to_value(store.commits()).unwrap_or_else(|_| json!([])))
}

pub fn available_champions_payload(store: &DataStore) -> HttpResponse {
    let rows: Vec<Value> = store
        .available_champions()
        .iter()
        .map(|champion| Value::Object(champion.to_row()))
        .collect();
    json_ok(Value::Array(rows))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommitRequest {
    #[serde(default)]
    stage: u32,
    #[serde(default)]
    champion_name: String,
}

pub fn commit_payload(store: &mut DataStore, body: &str) -> HttpResponse {
    let request: CommitRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(_) => return json_error(400, "Bad Request", "Invalid request body"),
    };
    let champion = request.champion_name.trim();
    if champion.is_empty() {
        return validation_failed(vec![("championName", "must not be empty")]);
    }
    match store.commit_champion(request.stage, champion) {
        Ok(()) => json_ok(json!({
            "status": "ok",
            "stage": request.stage,
            "championName": champion,
        })),
        Err(err) => commit_error_response(err),
    }
}

pub fn stage_action_payload(store: &mut DataStore, rest: &str) -> HttpResponse {
    let mut parts = rest.splitn(2, '/');
    let stage_part = parts.next().unwrap_or("");
    let action = parts.next().unwrap_or("");
    let Ok(stage) = stage_part.parse::<u32>() else {
        return json_error(400, "Bad Request", "stage must be a number");
    };
    let result = match action {
        "victory" => store.record_victory(stage),
        "defeat" => store.record_defeat(stage),
        "clear" => store.clear_commit(stage),
        _ => return json_error(404, "Not Found", "unknown stage action"),
    };
    match result {
        Ok(commit) => json_ok(json!({ "status": "ok", "commit": commit })),
        Err(err) => commit_error_response(err),
    }
}

#[derive(Debug, Deserialize)]
struct ImportRequest {
    path: String,
}

pub fn import_payload(store: &mut DataStore, body: &str) -> HttpResponse {
    let request: ImportRequest = match serde_json::from_str(body) {
        Ok(request) => request,
        Err(_) => return json_error(400, "Bad Request", "Invalid request body"),
    };
    let path = Path::new(&request.path);
    let result = if request.path.to_lowercase().ends_with(".csv") {
        store.import_mutators_csv(path)
    } else {
        store.import_workbook(path)
    };
    match result {
        Ok(report) => json_ok(json!({ "status": "ok", "report": report })),
        Err(err) => json_error(400, "Bad Request", &err.to_string()),
    }
}

#[derive(Debug, Default, Deserialize)]
struct ExportRequest {
    #[serde(default)]
    dir: Option<String>,
}

pub fn export_payload(store: &mut DataStore, body: &str) -> HttpResponse {
    let request: ExportRequest = if body.trim().is_empty() {
        ExportRequest::default()
    } else {
        match serde_json::from_str(body) {
            Ok(request) => request,
            Err(_) => return json_error(400, "Bad Request", "Invalid request body"),
        }
    };
    let dir = request.dir.unwrap_or_else(|| ".".to_string());
    match store.export_workbook(Path::new(&dir)) {
        Ok(path) => json_ok(json!({ "status": "ok", "path": path.display().to_string() })),
        Err(err @ ExportError::Empty) => json_error(400, "Bad Request", &err.to_string()),
        Err(err) => json_error(500, "Internal Server Error", &err.to_string()),
    }
}

pub fn clear_payload(store: &mut DataStore) -> HttpResponse {
    store.clear_all();
    json_ok(json!({ "status": "ok" }))
}

fn json_response(status_code: u16, status_text: &'static str, body: &Value) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(body).unwrap_or_else(|_| "{}".to_string()),
    }
}

fn json_ok(body: Value) -> HttpResponse {
    json_response(200, "OK", &body)
}

pub fn json_error(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    json_response(
        status_code,
        status_text,
        &json!({ "status": "error", "message": message }),
    )
}

fn commit_error_response(err: CommitError) -> HttpResponse {
    json_error(409, "Conflict", &err.to_string())
}

fn validation_failed(errors: Vec<(&str, &str)>) -> HttpResponse {
    let errors: Vec<Value> = errors
        .into_iter()
        .map(|(field, message)| json!({ "field": field, "messages": [message] }))
        .collect();
    json_response(
        400,
        "Bad Request",
        &json!({
            "status": "error",
            "message": "Validation failed",
            "errors": errors,
        }),
    )
}

fn filter_from_query(query: &str) -> RosterFilter {
    let mut filter = RosterFilter::default();
    for (key, value) in parse_query(query) {
        match key.as_str() {
            "search" => filter.search = value,
            "region" => {
                if !value.is_empty() && value != "All" {
                    filter.region = Some(value);
                }
            }
            "min_level" => filter.min_level = value.parse().unwrap_or(0),
            "stars" => {
                filter.star_ranks = value
                    .split(',')
                    .filter_map(|part| part.trim().parse().ok())
                    .collect();
            }
            _ => {}
        }
    }
    filter
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (percent_decode(key), percent_decode(value))
        })
        .collect()
}

fn percent_decode(raw: &str) -> String {
    let bytes = raw.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut index = 0;
    while index < bytes.len() {
        match bytes[index] {
            b'%' if index + 2 < bytes.len() => {
                match (hex_value(bytes[index + 1]), hex_value(bytes[index + 2])) {
                    (Some(high), Some(low)) => {
                        decoded.push(high * 16 + low);
                        index += 3;
                    }
                    _ => {
                        decoded.push(b'%');
                        index += 1;
                    }
                }
            }
            b'+' => {
                decoded.push(b' ');
                index += 1;
            }
            byte => {
                decoded.push(byte);
                index += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::percent_decode;

    #[test]
    fn percent_decoding_handles_spaces_and_escapes() {
        assert_eq!(percent_decode("Shadow%20Isles"), "Shadow Isles");
        assert_eq!(percent_decode("Bandle+City"), "Bandle City");
        assert_eq!(percent_decode("plain"), "plain");
        assert_eq!(percent_decode("bad%2"), "bad%2");
    }
}
