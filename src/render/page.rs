//! HTML rendering of the recorded request log.

use std::sync::Arc;

use crate::capture::snapshot::{RecordedBody, RequestSnapshot};

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Webhook Inspector</title>
  <style>
    body { font-family: monospace; margin: 20px; background: #f5f5f5; }
    .container { max-width: 1200px; margin: 0 auto; }
    .header { background: #333; color: white; padding: 20px; margin-bottom: 20px; }
    .request { background: white; margin: 10px 0; padding: 15px; border-left: 4px solid #007acc; }
    .method { font-weight: bold; color: #007acc; }
    .timestamp { color: #666; font-size: 12px; }
    .headers, .body { margin: 10px 0; }
    .json { background: #f8f8f8; padding: 10px; border-radius: 4px; overflow-x: auto; }
    .clear-btn { background: #dc3545; color: white; border: none; padding: 10px 20px; cursor: pointer; }
    .reload-btn { background: #28a745; color: white; border: none; padding: 10px 20px; cursor: pointer; margin-left: 10px; }
  </style>
  <script>
    function clearRequests() {
      fetch('/clear', { method: 'POST' }).then(() => location.reload());
    }
    function refreshPage() {
      location.reload();
    }
  </script>
</head>
<body>
  <div class="container">
    <div class="header">
      <h1>Webhook Inspector</h1>
      <p>Send requests to <strong>/webhook</strong> to see them here.</p>
      <button class="clear-btn" onclick="clearRequests()">Clear All Requests</button>
      <button class="reload-btn" onclick="refreshPage()">Refresh</button>
    </div>
"#;

const PAGE_FOOT: &str = r#"  </div>
</body>
</html>
"#;

/// Render the current log view as a complete HTML document.
///
/// Pure function: the caller passes the newest-first view from
/// [`crate::capture::RequestLog::read_all`] and gets back a string.
pub fn render_page(entries: &[Arc<RequestSnapshot>]) -> String {
    let mut html = String::with_capacity(4096 + entries.len() * 1024);
    html.push_str(PAGE_HEAD);

    html.push_str("    <div>\n      <h2>Recent Requests (");
    html.push_str(&entries.len().to_string());
    html.push_str(")</h2>\n");

    for entry in entries {
        render_entry(&mut html, entry);
    }

    html.push_str("    </div>\n");
    html.push_str(PAGE_FOOT);
    html
}

fn render_entry(html: &mut String, entry: &RequestSnapshot) {
    html.push_str("      <div class=\"request\">\n        <div>\n          <span class=\"method\">");
    html.push_str(&escape_html(&entry.method));
    html.push_str("</span>\n          <strong>");
    html.push_str(&escape_html(&entry.url));
    html.push_str("</strong>\n          <span class=\"timestamp\">");
    html.push_str(&escape_html(&entry.timestamp));
    html.push_str("</span>\n        </div>\n");

    html.push_str("        <div class=\"headers\">\n          <strong>Headers:</strong>\n          <div class=\"json\">");
    html.push_str(&escape_html(&pretty_json(&entry.headers)));
    html.push_str("</div>\n        </div>\n");

    if !entry.query.is_empty() {
        html.push_str("        <div>\n          <strong>Query:</strong>\n          <div class=\"json\">");
        html.push_str(&escape_html(&pretty_json(&entry.query)));
        html.push_str("</div>\n        </div>\n");
    }

    if let Some(body) = &entry.body {
        html.push_str("        <div class=\"body\">\n          <strong>Body:</strong>\n          <div class=\"json\">");
        let rendered = match body {
            // raw text verbatim, structured bodies pretty-printed
            RecordedBody::Text(text) => text.clone(),
            RecordedBody::Json(value) => pretty_json(value),
            RecordedBody::Form(form) => pretty_json(form),
        };
        html.push_str(&escape_html(&rendered));
        html.push_str("</div>\n        </div>\n");
    }

    html.push_str("      </div>\n");
}

fn pretty_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Minimal HTML escaping; keeps the document well-formed when recorded
/// content contains markup-significant characters.
fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue, Method, Uri};

    fn snapshot(path: &str, body: &[u8]) -> Arc<RequestSnapshot> {
        let uri: Uri = path.parse().unwrap();
        Arc::new(RequestSnapshot::capture(
            &Method::POST,
            &uri,
            &HeaderMap::new(),
            "127.0.0.1:4000".parse().unwrap(),
            body,
        ))
    }

    #[test]
    fn test_empty_log_renders_zero_count() {
        let html = render_page(&[]);
        assert!(html.contains("Recent Requests (0)"));
        assert!(html.contains("<strong>/webhook</strong>"));
    }

    #[test]
    fn test_entries_render_in_given_order() {
        let entries = vec![snapshot("/webhook/b", b""), snapshot("/webhook/a", b"")];
        let html = render_page(&entries);
        let pos_b = html.find("/webhook/b").unwrap();
        let pos_a = html.find("/webhook/a").unwrap();
        assert!(pos_b < pos_a, "newest entry must render first");
        assert!(html.contains("Recent Requests (2)"));
    }

    #[test]
    fn test_hostile_body_is_escaped() {
        let entries = vec![snapshot("/webhook", b"<script>alert(1)</script>")];
        let html = render_page(&entries);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn test_hostile_header_is_escaped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            "x-evil",
            HeaderValue::from_static("\"/><img src=x onerror=alert(1)>"),
        );
        let uri: Uri = "/webhook".parse().unwrap();
        let entry = Arc::new(RequestSnapshot::capture(
            &Method::POST,
            &uri,
            &headers,
            "127.0.0.1:4000".parse().unwrap(),
            b"",
        ));
        let html = render_page(&[entry]);
        assert!(!html.contains("<img src=x"));
    }

    #[test]
    fn test_json_body_pretty_printed() {
        let entries = vec![snapshot("/webhook", br#"{"a":1}"#)];
        let html = render_page(&entries);
        assert!(html.contains("&quot;a&quot;: 1"));
    }

    #[test]
    fn test_query_section_only_when_present() {
        let without = render_page(&[snapshot("/webhook", b"")]);
        assert!(!without.contains("<strong>Query:</strong>"));

        let with = render_page(&[snapshot("/webhook?foo=bar", b"")]);
        assert!(with.contains("<strong>Query:</strong>"));
        assert!(with.contains("&quot;foo&quot;: &quot;bar&quot;"));
    }
}
