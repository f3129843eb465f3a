//! Instruction text for reasoning-service operations.
//!
//! Each builder describes the operation and the exact JSON shape expected
//! back. The accompanying data sample travels separately in the request
//! payload.

use crate::query::QueryMode;

/// System prompt shared by all operations.
pub fn system_prompt() -> &'static str {
    "You are a data cleaning assistant embedded in a dataset profiling tool. \
     You always respond with JSON matching the exact shape requested, with no \
     commentary outside the JSON. You never invent columns that are not in \
     the provided data."
}

/// Instruction for the audit operation.
pub fn audit_prompt(row_count: usize, sample_len: usize) -> String {
    format!(
        "Audit the attached dataset sample ({} of {} rows) for quality issues. \
         Respond with a JSON object of the shape:\n\
         {{\"actions\": [{{\"kind\": string, \"title\": string, \"description\": string, \
         \"affectedRowCount\": number, \"suggestedTransform\": string}}],\n\
         \"insights\": [{{\"title\": string, \"description\": string, \
         \"importance\": \"high\"|\"medium\"|\"low\"}}],\n\
         \"validationRules\": [{{\"column\": string, \"kind\": \"range\"|\"format\"|\
         \"regex\"|\"required\"|\"unique\", \"params\": object, \
         \"severity\": \"error\"|\"warning\"}}]}}\n\
         Each suggestedTransform must be a self-contained instruction for \
         transforming the sampled rows.",
        sample_len, row_count
    )
}

/// Instruction for a single clean operation.
pub fn clean_prompt(transform: &str) -> String {
    format!(
        "Apply the following transformation to the attached rows:\n{}\n\
         Respond with a JSON object of the shape {{\"rows\": [...]}} where \
         rows contains every transformed row, using exactly the original \
         column names. Do not drop rows unless the transformation says to.",
        transform
    )
}

/// Instruction for the synthetic smart-clean operation covering every
/// pending transform at once.
pub fn smart_clean_prompt(transforms: &[String]) -> String {
    let combined = transforms
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}", i + 1, t))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Apply all of the following transformations to the attached rows, \
         in order:\n{}\n\
         Respond with a JSON object of the shape {{\"rows\": [...]}} where \
         rows contains every transformed row, using exactly the original \
         column names.",
        combined
    )
}

/// Instruction for the query operation.
pub fn query_prompt(query: &str, mode: QueryMode) -> String {
    let mode_text = match mode {
        QueryMode::NaturalLanguage => "a natural language question",
        QueryMode::Sql => "a SQL query",
    };

    format!(
        "The user submitted {} against the attached rows:\n{}\n\
         Evaluate it against the rows and respond with a JSON object of the \
         shape {{\"rows\": [...]}} containing the matching, transformed, or \
         aggregated result rows. An empty rows array is a valid answer.",
        mode_text, query
    )
}

/// Instruction for the chart-suggestion operation.
pub fn chart_prompt(columns: &[String]) -> String {
    format!(
        "Suggest a chart for a result set with columns [{}]. One sample \
         record is attached. Respond with a JSON object of the shape \
         {{\"type\": string, \"title\": string, \"xAxis\": string, \
         \"yAxis\": string}} where type is one of \"bar\", \"line\", \
         \"pie\", or \"scatter\" and the axes are column names.",
        columns.join(", ")
    )
}
