// HTML rendering for the activity pages.

use std::fmt::Write;

use axum::http::StatusCode;
use url::form_urlencoded;

use crate::error::PulseError;
use crate::github::EventRecord;

const STYLE: &str = "body{font-family:system-ui,sans-serif;margin:2rem;max-width:60rem}\
table{border-collapse:collapse;width:100%}\
td,th{border-bottom:1px solid #ddd;padding:.4rem;text-align:left}\
.muted{color:#777}";

/// Escape text for use in HTML element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Encode a query parameter value, then escape it for an HTML attribute.
fn query_attr(value: &str) -> String {
    escape(&form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>())
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>{}</title>\
         <style>{}</style></head><body>{}</body></html>\n",
        escape(title),
        STYLE,
        body
    )
}

/// Render a user's activity as a table, newest first.
pub fn render_events_page(user: &str, events: &[&EventRecord], event_type: Option<&str>) -> String {
    let user_html = escape(user);
    let mut body = String::new();

    let _ = write!(body, "<h1>Public activity for {}</h1>", user_html);
    if let Some(t) = event_type {
        let _ = write!(
            body,
            "<p>Showing <strong>{}</strong> only. <a href=\"/u/{}\">Show all</a></p>",
            escape(t),
            user_html
        );
    }

    let chart_src = match event_type {
        Some(t) => format!("/u/{}/chart.svg?type={}", user_html, query_attr(t)),
        None => format!("/u/{}/chart.svg", user_html),
    };
    let _ = write!(
        body,
        "<p><img src=\"{}\" alt=\"Events per day\"></p>",
        chart_src
    );

    if events.is_empty() {
        body.push_str("<p class=\"muted\">No public events.</p>");
        return page(&format!("{} activity", user), &body);
    }

    let _ = write!(
        body,
        "<p class=\"muted\">{} events</p><table><thead><tr>\
         <th>When (UTC)</th><th>Type</th><th>Repository</th></tr></thead><tbody>",
        events.len()
    );
    for event in events {
        let repo = event.repo_name().unwrap_or("-");
        let _ = write!(
            body,
            "<tr><td>{}</td><td><a href=\"/u/{}?type={}\">{}</a></td><td>{}</td></tr>",
            event.created_at.format("%Y-%m-%d %H:%M"),
            user_html,
            query_attr(&event.event_type),
            escape(&event.event_type),
            escape(repo)
        );
    }
    body.push_str("</tbody></table>");

    page(&format!("{} activity", user), &body)
}

/// Render a failed fetch for a human.
pub fn render_error(status: StatusCode, error: &PulseError) -> String {
    let heading = match error {
        PulseError::NotFound(_) => "User not found",
        PulseError::InvalidSubject(_) => "Missing username",
        PulseError::UpstreamRejected { .. } => "GitHub rate limit reached",
        _ => "Could not load activity",
    };
    let body = format!(
        "<h1>{}</h1><p>{}</p><p class=\"muted\">HTTP {}</p>",
        heading,
        escape(&error.to_string()),
        status.as_u16()
    );
    page(heading, &body)
}
