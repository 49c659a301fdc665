//! Run export: the whole run as a JSON file (overwritten), then flattened and appended
//! to a pipe-delimited text file that accumulates every run.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

use indexmap::IndexSet;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::errors::AppError;
use crate::models::run::{RunRecord, LLM_RESPONSE_FIELD};

/// Written for answer keys that a record does not have.
const MISSING_ANSWER: &str = "None";

/// Appends `extension` to `stem` (stems such as `1.1.9__shortlist` contain dots).
pub fn output_path(stem: &Path, extension: &str) -> PathBuf {
    let mut path = OsString::from(stem.as_os_str());
    path.push(extension);
    PathBuf::from(path)
}

/// Writes `records` to `<stem>.json` with 4-space indentation, replacing any earlier run.
pub fn export_run_to_json(records: &[RunRecord], stem: &Path) -> Result<PathBuf, AppError> {
    let path = output_path(stem, ".json");
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    records.serialize(&mut serializer)?;
    fs::write(&path, buf)?;

    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(path)
}

/// Reads `<stem>.json`, flattens each record and appends the rows to `<stem>.txt`.
///
/// Columns are the identifying fields followed by every answer key seen in the run,
/// in first-seen order. No header row is written.
pub fn append_pipe_delimited(stem: &Path) -> Result<PathBuf, AppError> {
    let json_path = output_path(stem, ".json");
    let txt_path = output_path(stem, ".txt");

    let contents = fs::read_to_string(&json_path)?;
    let objects: Vec<Map<String, Value>> = serde_json::from_str(&contents)?;
    let rows = flatten_rows(&objects);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&txt_path)?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .flexible(true)
        .from_writer(file);
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;

    info!("Appended {} rows to {}", rows.len(), txt_path.display());
    Ok(txt_path)
}

fn flatten_rows(objects: &[Map<String, Value>]) -> Vec<Vec<String>> {
    let mut id_columns: IndexSet<&str> = IndexSet::new();
    let mut answer_columns: IndexSet<&str> = IndexSet::new();
    for object in objects {
        for (key, value) in object {
            if key == LLM_RESPONSE_FIELD {
                if let Some(answers) = value.as_object() {
                    answer_columns.extend(answers.keys().map(String::as_str));
                }
            } else {
                id_columns.insert(key);
            }
        }
    }

    objects
        .iter()
        .map(|object| {
            let answers = object.get(LLM_RESPONSE_FIELD).and_then(Value::as_object);
            let ids = id_columns
                .iter()
                .map(|column| object.get(*column).map(cell_text).unwrap_or_default());
            let answers = answer_columns.iter().map(|column| {
                answers
                    .and_then(|a| a.get(*column))
                    .map(cell_text)
                    .unwrap_or_else(|| MISSING_ANSWER.to_string())
            });
            ids.chain(answers).collect()
        })
        .collect()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => MISSING_ANSWER.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ExtractedRecord;

    fn job_record(id: &str, answers: &[(&str, &str)]) -> RunRecord {
        RunRecord::new(answers.iter().copied().collect::<ExtractedRecord>())
            .with_field("job_id", id)
            .with_field("job_filename", format!("{id}_role.docx"))
            .with_field("job_link", format!("https://jobs.example/{id}"))
    }

    #[test]
    fn test_output_path_keeps_dotted_stem() {
        let path = output_path(Path::new("out/1.1.9__shortlist"), ".json");
        assert_eq!(path, PathBuf::from("out/1.1.9__shortlist.json"));
    }

    #[test]
    fn test_json_export_overwrites_with_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("nested").join("1.1.9__shortlist");

        export_run_to_json(&[job_record("job-001", &[("1", "Old")])], &stem).unwrap();
        let path = export_run_to_json(&[job_record("job-002", &[("1", "New")])], &stem).unwrap();

        let contents = fs::read_to_string(path).unwrap();
        assert!(contents.starts_with("[\n    {\n        \"job_id\": \"job-002\""));
        assert!(!contents.contains("job-001"));
        assert!(contents.contains("\"llm_response\": {\n            \"1\": \"New\""));
    }

    #[test]
    fn test_pipe_rows_fill_missing_answers_with_none() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("run");
        let records = vec![
            job_record("job-001", &[("1", "Data Scientist"), ("2", "Acme")]),
            job_record("job-002", &[("1", "Error: check logs")]),
        ];
        export_run_to_json(&records, &stem).unwrap();

        let txt = append_pipe_delimited(&stem).unwrap();

        assert_eq!(
            fs::read_to_string(txt).unwrap(),
            "job-001|job-001_role.docx|https://jobs.example/job-001|Data Scientist|Acme\n\
             job-002|job-002_role.docx|https://jobs.example/job-002|Error: check logs|None\n"
        );
    }

    #[test]
    fn test_pipe_file_accumulates_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("run");

        export_run_to_json(&[job_record("job-001", &[("1", "A")])], &stem).unwrap();
        append_pipe_delimited(&stem).unwrap();
        export_run_to_json(&[job_record("job-002", &[("1", "B")])], &stem).unwrap();
        let txt = append_pipe_delimited(&stem).unwrap();

        let contents = fs::read_to_string(txt).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("job-001|"));
        assert!(lines[1].starts_with("job-002|"));
    }

    #[test]
    fn test_answer_columns_union_in_first_seen_order() {
        let objects: Vec<Map<String, Value>> = serde_json::from_str(
            r#"[
                {"tb_id": "tb-0001", "llm_response": {"2": "b", "1": "a"}},
                {"tb_id": "tb-0002", "llm_response": {"3": "c", "1": "x"}}
            ]"#,
        )
        .unwrap();

        let rows = flatten_rows(&objects);
        assert_eq!(rows[0], vec!["tb-0001", "b", "a", "None"]);
        assert_eq!(rows[1], vec!["tb-0002", "None", "x", "c"]);
    }

    #[test]
    fn test_quotes_are_escaped_minimally() {
        let dir = tempfile::tempdir().unwrap();
        let stem = dir.path().join("run");
        export_run_to_json(
            &[job_record("job-001", &[("30", r#"The "big one""#), ("31", "Yes")])],
            &stem,
        )
        .unwrap();

        let contents = fs::read_to_string(append_pipe_delimited(&stem).unwrap()).unwrap();
        assert!(contents.ends_with("|\"The \"\"big one\"\"\"|Yes\n"));
    }

    #[test]
    fn test_missing_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            append_pipe_delimited(&dir.path().join("never_written")),
            Err(AppError::Io(_))
        ));
    }
}
