use crate::connection::{DatastoreConnection, DatastoreError, Statement};
use opencatalog_config::DatastoreConfig;

/// Language used for `to_tsvector` when neither the request nor the
/// configuration names one.
pub const DEFAULT_FTS_LANG: &str = "english";

/// Parameters for (re)building the indexes of one datastore table.
#[derive(Debug, Clone)]
pub struct IndexRequest {
    /// The resource whose backing table is indexed. Doubles as the table
    /// name, so it must be a safe identifier.
    pub resource_id: String,
    /// Full-text language override for this request.
    pub lang: Option<String>,
}

impl IndexRequest {
    pub fn new(resource_id: impl Into<String>) -> Self {
        Self {
            resource_id: resource_id.into(),
            lang: None,
        }
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = Some(lang.into());
        self
    }
}

fn check_identifier(identifier: &str) -> Result<(), DatastoreError> {
    let ok = !identifier.is_empty()
        && identifier
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(DatastoreError::invalid_identifier(identifier))
    }
}

/// Builds and executes the full-text indexes for one table.
///
/// Always issues the whole-row `_full_text` index. Each textual column
/// additionally gets a `to_tsvector` index in the resolved language;
/// precedence is request `lang`, then the configured `default_fts_lang`,
/// then [`DEFAULT_FTS_LANG`]. Returns the number of statements executed.
pub fn create_indexes(
    connection: &mut dyn DatastoreConnection,
    request: &IndexRequest,
    config: &DatastoreConfig,
) -> Result<usize, DatastoreError> {
    check_identifier(&request.resource_id)?;

    let lang = request
        .lang
        .as_deref()
        .or(config.default_fts_lang.as_deref())
        .unwrap_or(DEFAULT_FTS_LANG);

    let mut executed = 0;

    let full_row = Statement::new(format!(
        "CREATE INDEX IF NOT EXISTS \"{0}_full_text_idx\" ON \"{0}\" USING gist(_full_text)",
        request.resource_id
    ));
    connection.execute(&full_row)?;
    executed += 1;

    for field in connection.fields(&request.resource_id)? {
        if !field.field_type.is_textual() {
            continue;
        }
        check_identifier(&field.id)?;
        let statement = Statement::new(format!(
            "CREATE INDEX IF NOT EXISTS \"{0}_{1}_fts_idx\" \
             ON \"{0}\" USING gist(to_tsvector(:lang, :field))",
            request.resource_id, field.id
        ))
        .with_param("lang", lang)
        .with_param("field", &field.id);
        connection.execute(&statement)?;
        executed += 1;
    }

    tracing::debug!(
        resource_id = %request.resource_id,
        lang,
        executed,
        "created datastore indexes"
    );
    Ok(executed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Field, FieldType};

    /// Records executed statements instead of touching a database.
    #[derive(Default)]
    struct RecordingConnection {
        fields: Vec<Field>,
        executed: Vec<Statement>,
    }

    impl RecordingConnection {
        fn with_fields(fields: Vec<Field>) -> Self {
            Self {
                fields,
                executed: Vec::new(),
            }
        }

        fn fts_statement_for(&self, field: &str) -> Option<&Statement> {
            self.executed
                .iter()
                .find(|s| s.sql.contains("to_tsvector") && s.param("field") == Some(field))
        }
    }

    impl DatastoreConnection for RecordingConnection {
        fn fields(&self, _resource_id: &str) -> Result<Vec<Field>, DatastoreError> {
            Ok(self.fields.clone())
        }

        fn execute(&mut self, statement: &Statement) -> Result<(), DatastoreError> {
            self.executed.push(statement.clone());
            Ok(())
        }
    }

    fn text_and_number_fields() -> Vec<Field> {
        vec![
            Field::new("foo", FieldType::Text),
            Field::new("bar", FieldType::Number),
        ]
    }

    #[test]
    fn test_creates_full_text_index_by_default() {
        let mut conn = RecordingConnection::default();
        let request = IndexRequest::new("resource_id");

        create_indexes(&mut conn, &request, &DatastoreConfig::default()).unwrap();

        assert!(
            conn.executed
                .iter()
                .any(|s| s.sql.contains("ON \"resource_id\" USING gist(_full_text)"))
        );
    }

    #[test]
    fn test_textual_fields_indexed_with_english_as_default() {
        let mut conn = RecordingConnection::with_fields(text_and_number_fields());
        let request = IndexRequest::new("resource_id");

        create_indexes(&mut conn, &request, &DatastoreConfig::default()).unwrap();

        let stmt = conn.fts_statement_for("foo").expect("fts index on foo");
        assert!(
            stmt.sql
                .contains("ON \"resource_id\" USING gist(to_tsvector(:lang, :field))")
        );
        assert_eq!(stmt.param("lang"), Some("english"));
        // the numeric column gets no fts index
        assert!(conn.fts_statement_for("bar").is_none());
    }

    #[test]
    fn test_config_overrides_default_language() {
        let mut conn = RecordingConnection::with_fields(text_and_number_fields());
        let request = IndexRequest::new("resource_id");
        let config = DatastoreConfig {
            default_fts_lang: Some("simple".to_string()),
        };

        create_indexes(&mut conn, &request, &config).unwrap();

        let stmt = conn.fts_statement_for("foo").unwrap();
        assert_eq!(stmt.param("lang"), Some("simple"));
    }

    #[test]
    fn test_request_lang_overrides_config() {
        let mut conn = RecordingConnection::with_fields(text_and_number_fields());
        let request = IndexRequest::new("resource_id").with_lang("french");
        let config = DatastoreConfig {
            default_fts_lang: Some("simple".to_string()),
        };

        create_indexes(&mut conn, &request, &config).unwrap();

        let stmt = conn.fts_statement_for("foo").unwrap();
        assert_eq!(stmt.param("lang"), Some("french"));
        assert_eq!(stmt.param("field"), Some("foo"));
    }

    #[test]
    fn test_statement_count() {
        let mut conn = RecordingConnection::with_fields(text_and_number_fields());
        let request = IndexRequest::new("resource_id");

        let executed = create_indexes(&mut conn, &request, &DatastoreConfig::default()).unwrap();
        // one whole-row index plus one per textual field
        assert_eq!(executed, 2);
        assert_eq!(conn.executed.len(), 2);
    }

    #[test]
    fn test_rejects_unsafe_table_identifier() {
        let mut conn = RecordingConnection::default();
        let request = IndexRequest::new("res\"; DROP TABLE x; --");

        let err = create_indexes(&mut conn, &request, &DatastoreConfig::default()).unwrap_err();
        assert!(matches!(err, DatastoreError::InvalidIdentifier { .. }));
        assert!(conn.executed.is_empty());
    }
}
