use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde_json::Value;

use crate::config::GatewayConfig;
use crate::gateway::{Gateway, GatewayError, Select};

const ERROR_SNIPPET_CHARS: usize = 220;

/// The hosted backend over its REST surface: `/rest/v1/<table>` for rows and
/// `/rest/v1/rpc/<name>` for procedures.
#[derive(Debug, Clone)]
pub struct RestGateway {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl RestGateway {
    pub fn new(cfg: &GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(cfg.timeout)
            .build()
            .map_err(|err| GatewayError::Transport(format!("failed to build http client: {err}")))?;
        Ok(Self {
            client,
            base_url: cfg.url.trim_end_matches('/').to_string(),
            anon_key: cfg.anon_key.clone(),
        })
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.base_url)
    }

    pub fn rpc_url(&self, name: &str) -> String {
        format!("{}/rest/v1/rpc/{name}", self.base_url)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        req.header("apikey", &self.anon_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.anon_key))
            .header(USER_AGENT, "wk-poule/0.1")
            .header(ACCEPT, "application/json")
    }
}

impl Gateway for RestGateway {
    fn select(&self, query: &Select) -> Result<Vec<Value>, GatewayError> {
        let req = self
            .client
            .get(self.table_url(&query.table))
            .query(&query.query_pairs());
        let body = read_body(self.authed(req).send())?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Array(rows)) => Ok(rows),
            Ok(Value::Null) => Ok(Vec::new()),
            Ok(other) => Ok(vec![other]),
            Err(err) => Err(GatewayError::Decode(format!("{}: {err}", query.table))),
        }
    }

    fn upsert(
        &self,
        table: &str,
        rows: &[Value],
        on_conflict: &[&str],
    ) -> Result<(), GatewayError> {
        let mut req = self
            .client
            .post(self.table_url(table))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(rows);
        if !on_conflict.is_empty() {
            req = req.query(&[("on_conflict", on_conflict.join(","))]);
        }
        read_body(self.authed(req).send()).map(|_| ())
    }

    fn rpc(&self, name: &str, args: Value) -> Result<Value, GatewayError> {
        let req = self
            .client
            .post(self.rpc_url(name))
            .header(CONTENT_TYPE, "application/json")
            .json(&args);
        let body = read_body(self.authed(req).send())?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|err| GatewayError::Decode(format!("{name}: {err}")))
    }
}

fn read_body(sent: reqwest::Result<Response>) -> Result<String, GatewayError> {
    let resp = sent.map_err(|err| GatewayError::Transport(err.to_string()))?;
    let status = resp.status();
    let body = resp
        .text()
        .map_err(|err| GatewayError::Transport(format!("failed reading body: {err}")))?;
    if !status.is_success() {
        return Err(GatewayError::Backend {
            status: status.as_u16(),
            message: backend_message(status, &body),
        });
    }
    Ok(body)
}

/// The backend's own error text when it sent one, else a trimmed snippet.
pub fn backend_message(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(obj)) = serde_json::from_str::<Value>(body) {
        let message = ["message", "msg", "error_description", "error"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .map(str::trim)
            .filter(|m| !m.is_empty());
        if let Some(message) = message {
            let details = obj
                .get("details")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|d| !d.is_empty());
            return match details {
                Some(details) => format!("{message} ({details})"),
                None => message.to_string(),
            };
        }
    }
    let snippet = body
        .trim()
        .replace(['\n', '\r'], " ")
        .chars()
        .take(ERROR_SNIPPET_CHARS)
        .collect::<String>();
    if snippet.is_empty() {
        format!("http {status}")
    } else {
        format!("http {status}: {snippet}")
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{RestGateway, backend_message};
    use crate::config::GatewayConfig;

    #[test]
    fn urls_follow_rest_layout() {
        let gateway = RestGateway::new(&GatewayConfig::new("https://x.supabase.co/", "anon"))
            .expect("client");
        assert_eq!(gateway.table_url("landen"), "https://x.supabase.co/rest/v1/landen");
        assert_eq!(
            gateway.rpc_url("login_user"),
            "https://x.supabase.co/rest/v1/rpc/login_user"
        );
    }

    #[test]
    fn backend_message_prefers_json_message() {
        let body = concat!(
            r#"{"code":"23505","message":"duplicate key value","#,
            r#""details":"Key (user_id, match_id) exists","hint":null}"#
        );
        assert_eq!(
            backend_message(StatusCode::CONFLICT, body),
            "duplicate key value (Key (user_id, match_id) exists)"
        );
    }

    #[test]
    fn backend_message_falls_back_to_snippet() {
        assert_eq!(
            backend_message(StatusCode::BAD_GATEWAY, "upstream\nfailed"),
            "http 502 Bad Gateway: upstream failed"
        );
        assert_eq!(
            backend_message(StatusCode::INTERNAL_SERVER_ERROR, "  "),
            "http 500 Internal Server Error"
        );
    }
}
