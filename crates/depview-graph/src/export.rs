//! Relationship export.
//!
//! Reachable edges are flattened into [`RelationshipRecord`]s and rendered as
//! delimiter-separated text. The header row comes from the first record's
//! field names, rows are joined with CRLF, and there is no trailing line
//! break.

use crate::domain::{Edge, NodeId};
use crate::error::{Error, Result};
use crate::model::GraphModel;
use crate::traversal::{TraverseOptions, traverse, visible};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;
use serde_json::Value;

/// Row separator of delimited output.
pub const ROW_SEPARATOR: &str = "\r\n";

/// Default field delimiter.
pub const DEFAULT_DELIMITER: char = ',';

/// One exported relationship between two resolved nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationshipRecord {
    /// Source group tag
    pub from_type: String,
    /// Source technical name
    pub from_technical_name: String,
    /// Source display name
    pub from_display_name: String,
    /// Source description
    pub from_description: Option<String>,
    /// Edge relationship label
    pub relationship: Option<String>,
    /// Target group tag
    pub to_type: String,
    /// Target technical name
    pub to_technical_name: String,
    /// Target display name
    pub to_display_name: String,
    /// Target description
    pub to_description: Option<String>,
}

/// A finished export, ready for the download collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name
    pub file_name: String,
    /// UTF-8 content
    pub content: Vec<u8>,
}

/// Flatten one edge into a record, resolving both endpoints.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if an endpoint is not in `graph`.
pub fn dump_edge(graph: &GraphModel, edge: &Edge) -> Result<RelationshipRecord> {
    let from = graph.lookup_node(edge.from)?;
    let to = graph.lookup_node(edge.to)?;

    Ok(RelationshipRecord {
        from_type: from.group.to_string(),
        from_technical_name: from.technical_name.clone(),
        from_display_name: from.label.clone(),
        from_description: from.description.clone(),
        relationship: edge.relation.clone(),
        to_type: to.group.to_string(),
        to_technical_name: to.technical_name.clone(),
        to_display_name: to.label.clone(),
        to_description: to.description.clone(),
    })
}

/// Records for every edge reachable from `start` through visible nodes.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] if `start` is not in `graph`.
pub fn subtree_records(graph: &GraphModel, start: NodeId) -> Result<Vec<RelationshipRecord>> {
    traverse(graph, start, TraverseOptions::default())?
        .edges
        .into_iter()
        .map(|edge| dump_edge(graph, edge))
        .collect()
}

/// Records for every currently visible edge.
///
/// # Errors
///
/// Returns [`Error::NodeNotFound`] only if the snapshot is inconsistent.
pub fn visible_records(graph: &GraphModel) -> Result<Vec<RelationshipRecord>> {
    visible(graph)
        .edges
        .into_iter()
        .map(|edge| dump_edge(graph, edge))
        .collect()
}

/// Render records as delimiter-separated text.
///
/// Field names of the first record form the header; fields missing from a
/// later record, or null, render as empty. Values containing the delimiter,
/// a quote or a line break are quoted.
///
/// # Errors
///
/// Returns [`Error::EmptyExport`] when `records` is empty,
/// [`Error::InvalidDelimiter`] for a delimiter that is not ASCII or is a
/// quote or line break, or
/// [`Error::Json`] if a record cannot be serialized.
pub fn to_delimited_text<T: Serialize>(records: &[T], delimiter: char) -> Result<String> {
    if records.is_empty() {
        return Err(Error::EmptyExport);
    }
    let delimiter_byte = u8::try_from(delimiter)
        .ok()
        .filter(|b| b.is_ascii() && !matches!(*b, b'"' | b'\r' | b'\n'))
        .ok_or(Error::InvalidDelimiter(delimiter))?;

    let rows: Vec<Value> = records
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<_, _>>()?;

    let headers: Vec<&str> = rows[0]
        .as_object()
        .map(|obj| obj.keys().map(String::as_str).collect())
        .unwrap_or_default();

    let mut writer = WriterBuilder::new()
        .delimiter(delimiter_byte)
        .terminator(Terminator::CRLF)
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer.write_record(&headers)?;
    for row in &rows {
        let fields: Vec<String> = headers
            .iter()
            .map(|h| render(row.as_object().and_then(|obj| obj.get(*h))))
            .collect();
        writer.write_record(&fields)?;
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| Error::Io(e.into_error()))?;
    if bytes.ends_with(ROW_SEPARATOR.as_bytes()) {
        bytes.truncate(bytes.len() - ROW_SEPARATOR.len());
    }
    String::from_utf8(bytes)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Render records and wrap them as a named artifact.
///
/// # Errors
///
/// Same as [`to_delimited_text`].
pub fn artifact<T: Serialize>(
    file_name: impl Into<String>,
    records: &[T],
    delimiter: char,
) -> Result<ExportArtifact> {
    let text = to_delimited_text(records, delimiter)?;
    let file_name = file_name.into();
    tracing::debug!(file = %file_name, rows = records.len(), bytes = text.len(), "Built export");
    Ok(ExportArtifact {
        file_name,
        content: text.into_bytes(),
    })
}

fn render(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
