//! Sheets v4 values client

use std::sync::Arc;
use std::time::Duration;

use potd_common::SheetsConfig;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::auth::AccessTokenProvider;
use crate::error::{map_transport_error, SheetsError};

#[derive(Debug, Deserialize)]
struct ValueRange {
    /// Omitted entirely when the range is empty
    #[serde(default)]
    values: Vec<Vec<Value>>,
}

/// Reads cell ranges from one spreadsheet
#[derive(Clone)]
pub struct SheetsClient {
    http: Client,
    base: Url,
    spreadsheet_id: String,
    tokens: Arc<dyn AccessTokenProvider>,
}

impl SheetsClient {
    pub fn new(
        config: &SheetsConfig,
        tokens: Arc<dyn AccessTokenProvider>,
        timeout: Duration,
    ) -> Result<Self, SheetsError> {
        let base = Url::parse(&config.api_base)
            .map_err(|e| SheetsError::InvalidUrl(format!("{}: {e}", config.api_base)))?;
        if base.cannot_be_a_base() {
            return Err(SheetsError::InvalidUrl(config.api_base.clone()));
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(map_transport_error)?;

        Ok(Self {
            http,
            base,
            spreadsheet_id: config.spreadsheet_id.clone(),
            tokens,
        })
    }

    fn values_url(&self, range: &str) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty()
                .extend(["spreadsheets", self.spreadsheet_id.as_str(), "values", range]);
        }
        url
    }

    /// Cells of `range` (A1 notation) as rows of display strings
    ///
    /// Trailing empty cells are not returned by the API, so rows may be ragged.
    #[instrument(skip(self))]
    pub async fn values(&self, range: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        let token = self.tokens.access_token().await?;

        let response = self
            .http
            .get(self.values_url(range))
            .query(&[("majorDimension", "ROWS"), ("valueRenderOption", "FORMATTED_VALUE")])
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(SheetsError::status(status, &body));
        }

        let range_values: ValueRange =
            serde_json::from_slice(&body).map_err(|e| SheetsError::Decode(e.to_string()))?;
        debug!(rows = range_values.values.len(), "Range read");

        Ok(range_values
            .values
            .into_iter()
            .map(|row| row.into_iter().map(cell_text).collect())
            .collect())
    }
}

fn cell_text(cell: Value) -> String {
    match cell {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Serve one canned response, returning the request head
    pub(crate) async fn serve_once(status: u16, body: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/v4", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 4096];
            while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: application/json\r\n\
                 Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&buf).to_string()
        });
        (base, handle)
    }

    pub(crate) fn client(base: &str) -> SheetsClient {
        let config = SheetsConfig {
            spreadsheet_id: "sheet-1".to_string(),
            question_range: "ACPOTD!A2:B".to_string(),
            settings_range: "Settings!A:B".to_string(),
            credentials_file: "credentials.json".to_string(),
            api_base: base.to_string(),
        };
        SheetsClient::new(&config, Arc::new(StaticToken("tok".into())), Duration::from_secs(5))
            .unwrap()
    }

    #[tokio::test]
    async fn test_values_request_and_ragged_rows() {
        let (base, server) = serve_once(
            200,
            r#"{"range":"ACPOTD!A2:B4","majorDimension":"ROWS","values":[["Two Sum","https://x/1"],["Holiday"],[1,true]]}"#,
        )
        .await;

        let rows = client(&base).values("ACPOTD!A2:B").await.unwrap();

        assert_eq!(
            rows,
            vec![
                vec!["Two Sum".to_string(), "https://x/1".to_string()],
                vec!["Holiday".to_string()],
                vec!["1".to_string(), "true".to_string()],
            ]
        );
        let head = server.await.unwrap();
        assert!(head.starts_with(
            "GET /v4/spreadsheets/sheet-1/values/ACPOTD!A2:B?majorDimension=ROWS&valueRenderOption=FORMATTED_VALUE "
        ));
        assert!(head.to_ascii_lowercase().contains("authorization: bearer tok"));
    }

    #[tokio::test]
    async fn test_empty_range() {
        let (base, server) = serve_once(200, r#"{"range":"ACPOTD!A2:B","majorDimension":"ROWS"}"#).await;
        assert!(client(&base).values("ACPOTD!A2:B").await.unwrap().is_empty());
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_http_error() {
        let (base, server) =
            serve_once(404, r#"{"error":{"code":404,"message":"Requested entity was not found."}}"#).await;

        let err = client(&base).values("Nope!A:B").await.unwrap_err();
        assert!(matches!(err, SheetsError::Status { status: 404, .. }));
        server.await.unwrap();
    }
}
