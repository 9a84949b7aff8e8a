use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde_json::Value;
use viet_migrate_catalog::Record;
use viet_migrate_db::Destination;

use crate::credentials::SupabaseConfig;
use crate::error::SupabaseError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PREFER_MINIMAL: &str = "return=minimal";
const PREFER_REPRESENTATION: &str = "return=representation";
const MAX_ERROR_TEXT: usize = 200;
const PREFER_MERGE: &str = "resolution=merge-duplicates,return=minimal";

/// Blocking PostgREST client for a Supabase project.
///
/// The connection is created once and reused for the whole run.
pub struct SupabaseClient {
    http: Client,
    rest_url: String,
}

/// Error body returned by PostgREST.
#[derive(Debug, serde::Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    details: Option<String>,
}

impl SupabaseClient {
    /// Create a client. No request is made until the first write.
    pub fn new(config: &SupabaseConfig) -> Result<Self, SupabaseError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(auth_headers(&config.service_key)?)
            .build()?;

        Ok(Self {
            http,
            rest_url: format!("{}/rest/v1", config.url),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Send a request and turn non-success statuses into [`SupabaseError::Api`].
    fn send(&self, request: RequestBuilder) -> Result<reqwest::blocking::Response, SupabaseError> {
        let resp = request.send()?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let text = resp.text()?;
        Err(api_error(status.as_u16(), &text))
    }
}

fn auth_headers(key: &str) -> Result<HeaderMap, SupabaseError> {
    let invalid = |_| SupabaseError::Config("service key contains invalid characters".to_string());

    let mut headers = HeaderMap::new();
    headers.insert("apikey", HeaderValue::from_str(key).map_err(invalid)?);
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", key)).map_err(invalid)?;
    bearer.set_sensitive(true);
    headers.insert(AUTHORIZATION, bearer);
    Ok(headers)
}

/// Build an API error from a failed response body.
fn api_error(status: u16, text: &str) -> SupabaseError {
    let message = match serde_json::from_str::<ApiErrorBody>(text) {
        Ok(ApiErrorBody {
            message: Some(message),
            details: Some(details),
        }) => format!("{} ({})", message, details),
        Ok(ApiErrorBody {
            message: Some(message),
            ..
        }) => message,
        _ => truncate(text, MAX_ERROR_TEXT).to_string(),
    };
    SupabaseError::Api { status, message }
}

/// At most `max_chars` characters of `text`, cut on a char boundary.
fn truncate(text: &str, max_chars: usize) -> &str {
    text.char_indices()
        .nth(max_chars)
        .map_or(text, |(end, _)| &text[..end])
}

/// Fail with [`SupabaseError::NotFound`] when a PATCH body lists no rows.
fn ensure_matched(table: &str, id: &Value, body: &str) -> Result<(), SupabaseError> {
    let rows: Vec<Value> = serde_json::from_str(body)?;
    if rows.is_empty() {
        return Err(SupabaseError::NotFound {
            table: table.to_string(),
            id: id.to_string(),
        });
    }
    Ok(())
}

/// PostgREST filter value for an id.
fn id_filter(id: &Value) -> String {
    match id {
        Value::String(s) => format!("eq.{}", s),
        other => format!("eq.{}", other),
    }
}

impl Destination for SupabaseClient {
    type Error = SupabaseError;

    fn insert(&self, table: &str, row: &Record) -> Result<(), SupabaseError> {
        log::debug!("POST {} ({} field(s))", table, row.len());
        self.send(
            self.http
                .post(self.table_url(table))
                .header("Prefer", PREFER_MINIMAL)
                .json(row),
        )?;
        Ok(())
    }

    fn upsert(&self, table: &str, row: &Record, key: &str) -> Result<(), SupabaseError> {
        log::debug!("UPSERT {} on {}", table, key);
        self.send(
            self.http
                .post(self.table_url(table))
                .query(&[("on_conflict", key)])
                .header("Prefer", PREFER_MERGE)
                .json(row),
        )?;
        Ok(())
    }

    fn first_id(&self, table: &str) -> Result<Option<Value>, SupabaseError> {
        let resp = self.send(
            self.http
                .get(self.table_url(table))
                .query(&[("select", "id"), ("order", "id.asc"), ("limit", "1")]),
        )?;
        let rows: Vec<Record> = serde_json::from_str(&resp.text()?)?;
        Ok(rows.into_iter().next().and_then(|mut row| row.remove("id")))
    }

    fn update(&self, table: &str, id: &Value, row: &Record) -> Result<(), SupabaseError> {
        log::debug!("PATCH {} id={}", table, id);
        let resp = self.send(
            self.http
                .patch(self.table_url(table))
                .query(&[("id", id_filter(id)), ("select", "id".to_string())])
                .header("Prefer", PREFER_REPRESENTATION)
                .json(row),
        )?;
        ensure_matched(table, id, &resp.text()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client() -> SupabaseClient {
        let config = SupabaseConfig::from_values(
            Some("https://abc.supabase.co/".into()),
            Some("service-key".into()),
        )
        .unwrap();
        SupabaseClient::new(&config).unwrap()
    }

    #[test]
    fn table_url_uses_rest_endpoint() {
        assert_eq!(
            client().table_url("transport_routes"),
            "https://abc.supabase.co/rest/v1/transport_routes"
        );
    }

    #[test]
    fn auth_headers_carry_key() {
        let headers = auth_headers("service-key").unwrap();
        assert_eq!(headers["apikey"], "service-key");
        assert_eq!(headers[AUTHORIZATION], "Bearer service-key");
        assert!(headers[AUTHORIZATION].is_sensitive());
    }

    #[test]
    fn auth_headers_reject_newlines() {
        assert!(matches!(
            auth_headers("bad\nkey"),
            Err(SupabaseError::Config(_))
        ));
    }

    #[test]
    fn api_error_prefers_postgrest_message() {
        let body = r#"{"code":"PGRST204","details":null,"hint":null,"message":"Could not find the 'busNo' column of 'transport_routes'"}"#;
        let err = api_error(400, body);
        assert_eq!(
            err.to_string(),
            "Supabase error (HTTP 400): Could not find the 'busNo' column of 'transport_routes'"
        );
    }

    #[test]
    fn api_error_includes_details() {
        let body = r#"{"message":"duplicate key value violates unique constraint \"users_email_key\"","details":"Key (email)=(a@b.c) already exists."}"#;
        let SupabaseError::Api { status, message } = api_error(409, body) else {
            panic!("expected api error");
        };
        assert_eq!(status, 409);
        assert!(message.ends_with("(Key (email)=(a@b.c) already exists.)"));
    }

    #[test]
    fn api_error_falls_back_to_raw_text() {
        let err = api_error(502, "Bad Gateway");
        assert!(matches!(
            err,
            SupabaseError::Api { status: 502, ref message } if message == "Bad Gateway"
        ));
    }

    #[test]
    fn raw_text_is_cut_on_char_boundary() {
        let body = format!("{}\u{e9} trailing", "a".repeat(199));
        let SupabaseError::Api { message, .. } = api_error(502, &body) else {
            panic!("expected api error");
        };
        assert_eq!(message.chars().count(), 200);
        assert!(message.ends_with('\u{e9}'));
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("Bad Gateway", 200), "Bad Gateway");
        assert_eq!(truncate("\u{e9}\u{e9}\u{e9}", 2), "\u{e9}\u{e9}");
    }

    #[test]
    fn patch_matching_no_rows_is_not_found() {
        assert!(matches!(
            ensure_matched("placement_section", &json!(4), "[]"),
            Err(SupabaseError::NotFound { ref table, ref id }) if table == "placement_section" && id == "4"
        ));
        assert!(ensure_matched("placement_section", &json!(4), r#"[{"id":4}]"#).is_ok());
    }

    #[test]
    fn id_filter_formats() {
        assert_eq!(id_filter(&json!(3)), "eq.3");
        assert_eq!(id_filter(&json!("6f1c")), "eq.6f1c");
    }
}
