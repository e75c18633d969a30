//! Route table: maps (method, path) onto API handlers. Pure with respect to
//! the network, so tests exercise it directly.

use crate::data::datastore::DataStore;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }
}

pub fn route_request(
    store: &mut DataStore,
    method: &str,
    raw_path: &str,
    body: &str,
) -> HttpResponse {
    let (path, query) = match raw_path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (raw_path, ""),
    };

    match (method, path) {
        ("GET", "/") => HttpResponse {
            status_code: 200,
            status_text: "OK",
            content_type: "text/html; charset=utf-8",
            body: index_html(),
        },
        ("GET", "/api/health") => api::health_payload(store),
        ("GET", "/api/mutators") => api::mutators_payload(store),
        ("POST", "/api/mutators") => api::add_mutator_payload(store, body),
        ("PUT", "/api/mutators") => api::edit_mutator_payload(store, body),
        ("DELETE", path) if path.starts_with("/api/mutators/") => {
            api::delete_mutator_payload(store, &path["/api/mutators/".len()..])
        }
        ("GET", "/api/tags") => api::tags_payload(store),
        ("POST", "/api/tags") => api::update_tag_payload(store, body),
        ("GET", path) if path.starts_with("/api/tags/") => {
            api::tag_payload(store, &path["/api/tags/".len()..])
        }
        ("GET", "/api/roster") => api::roster_payload(store, query),
        ("PUT", "/api/roster") => api::update_champion_payload(store, body),
        ("GET", "/api/commits") => api::commits_payload(store),
        ("GET", "/api/commits/available") => api::available_champions_payload(store),
        ("POST", "/api/commits") => api::commit_payload(store, body),
        ("POST", path) if path.starts_with("/api/commits/") => {
            api::stage_action_payload(store, &path["/api/commits/".len()..])
        }
        ("POST", "/api/import") => api::import_payload(store, body),
        ("POST", "/api/export") => api::export_payload(store, body),
        ("POST", "/api/clear") => api::clear_payload(store),
        _ => api::json_error(404, "Not Found", "no such route"),
    }
}

fn index_html() -> String {
    "<!doctype html>\n<html>\n<head><title>lorekeeper</title></head>\n<body>\n\
<h1>lorekeeper</h1>\n\
<p>Companion data API. Endpoints under <code>/api</code>:</p>\n\
<ul>\n\
<li>GET /api/health</li>\n\
<li>GET | POST | PUT /api/mutators, DELETE /api/mutators/&lt;id&gt;</li>\n\
<li>GET | POST /api/tags, GET /api/tags/&lt;name&gt;</li>\n\
<li>GET | PUT /api/roster</li>\n\
<li>GET /api/commits, GET /api/commits/available, POST /api/commits, \
POST /api/commits/&lt;stage&gt;/victory|defeat|clear</li>\n\
<li>POST /api/import, /api/export, /api/clear</li>\n\
</ul>\n</body>\n</html>\n"
        .to_string()
}
