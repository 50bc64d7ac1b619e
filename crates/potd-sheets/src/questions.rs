//! Question rows from the sheet

use async_trait::async_trait;
use potd_core::{PortResult, QuestionRow, QuestionSource};
use tracing::{info, instrument};

use crate::client::SheetsClient;

/// Reads `label | link` rows from a fixed range
pub struct SheetQuestionSource {
    client: SheetsClient,
    range: String,
}

impl SheetQuestionSource {
    pub fn new(client: SheetsClient, range: impl Into<String>) -> Self {
        Self {
            client,
            range: range.into(),
        }
    }
}

/// Pad ragged rows; the API drops trailing empty cells
fn to_question_rows(rows: Vec<Vec<String>>) -> Vec<QuestionRow> {
    rows.into_iter()
        .map(|row| {
            let mut cells = row.into_iter();
            let label = cells.next().unwrap_or_default();
            let link = cells.next().unwrap_or_default();
            QuestionRow::new(label, link)
        })
        .collect()
}

#[async_trait]
impl QuestionSource for SheetQuestionSource {
    #[instrument(skip(self), fields(range = %self.range))]
    async fn fetch_rows(&self) -> PortResult<Vec<QuestionRow>> {
        let rows = to_question_rows(self.client.values(&self.range).await?);
        info!(rows = rows.len(), "Fetched question rows");
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::{client, serve_once};
    use potd_core::DomainError;

    #[test]
    fn test_ragged_rows_are_padded() {
        let rows = to_question_rows(vec![
            vec!["Two Sum".into(), "https://x/1".into(), "ignored".into()],
            vec!["Holiday".into()],
            vec![],
        ]);

        assert_eq!(
            rows,
            vec![
                QuestionRow::new("Two Sum", "https://x/1"),
                QuestionRow::new("Holiday", ""),
                QuestionRow::new("", ""),
            ]
        );
        assert!(rows[1].is_holiday());
    }

    #[tokio::test]
    async fn test_fetch_rows() {
        let (base, server) = serve_once(
            200,
            r#"{"values":[["Task A","https://a"],["Task B","https://b"]]}"#,
        )
        .await;

        let source = SheetQuestionSource::new(client(&base), "ACPOTD!A2:B");
        let rows = source.fetch_rows().await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], QuestionRow::new("Task B", "https://b"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_unreadable_sheet_is_source_error() {
        let (base, server) = serve_once(503, "unavailable").await;

        let err = SheetQuestionSource::new(client(&base), "ACPOTD!A2:B")
            .fetch_rows()
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::SourceUnavailable(_)));
        server.await.unwrap();
    }
}
