use std::path::{Path, PathBuf};

use crate::batch::prompts::{compare_prompt, shortlist_prompt, toolbox_prompt};
use crate::extraction::ExtractedRecord;
use crate::llm_client::prompts::SystemContext;
use crate::models::run::RunRecord;

/// Which of the three batch jobs to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobKind {
    /// Summarise job descriptions against a fixed question list.
    Shortlist,
    /// Compare the CV against each job description.
    Compare,
    /// Summarise saved articles for the skills toolbox.
    Toolbox,
}

/// Names of the identifying columns written for each item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldNames {
    pub id: &'static str,
    pub filename: &'static str,
    pub link: &'static str,
}

const JOB_FIELDS: FieldNames = FieldNames {
    id: "job_id",
    filename: "job_filename",
    link: "job_link",
};

const TOOLBOX_FIELDS: FieldNames = FieldNames {
    id: "tb_id",
    filename: "tb_filename",
    link: "tb_url",
};

pub const CV_FILENAME_FIELD: &str = "cv_filename";

impl JobKind {
    pub fn name(self) -> &'static str {
        match self {
            JobKind::Shortlist => "shortlist",
            JobKind::Compare => "compare",
            JobKind::Toolbox => "toolbox",
        }
    }

    pub fn field_names(self) -> FieldNames {
        match self {
            JobKind::Shortlist | JobKind::Compare => JOB_FIELDS,
            JobKind::Toolbox => TOOLBOX_FIELDS,
        }
    }

    pub fn default_context(self) -> SystemContext {
        match self {
            JobKind::Shortlist | JobKind::Compare => SystemContext::FilmNoir,
            JobKind::Toolbox => SystemContext::Normal,
        }
    }

    pub fn default_temperature(self) -> f32 {
        match self {
            JobKind::Shortlist => 1.0,
            JobKind::Compare => 0.4,
            JobKind::Toolbox => 0.0,
        }
    }

    /// Input folder, CV folder (compare only) and output stem, relative to the data root.
    fn layout(self) -> (&'static str, Option<&'static str>, &'static str) {
        match self {
            JobKind::Shortlist => (
                "app_01__job_search_assistant/1.1.1__to_review",
                None,
                "app_01__job_search_assistant/1.1.9__output_summary/1.1.9__shortlist",
            ),
            JobKind::Compare => (
                "app_01__job_search_assistant/1.2.1__to_review",
                Some("app_01__job_search_assistant/1.2.3__cv_to_compare"),
                "app_01__job_search_assistant/1.2.9__output_comparison/1.2.9__compare_cv_vs_job",
            ),
            JobKind::Toolbox => (
                "app_02__skills_toolbox/2.2.1__to_review",
                None,
                "app_02__skills_toolbox/2.2.9__output_summary/2.2.9__toolbox_summary",
            ),
        }
    }
}

/// A fully resolved batch job: where to read, where to write, and how to ask.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchJob {
    pub kind: JobKind,
    pub input_dir: PathBuf,
    pub cv_dir: Option<PathBuf>,
    /// Output path without extension; `.json` and `.txt` are appended.
    pub output_stem: PathBuf,
    pub context: SystemContext,
    pub temperature: f32,
}

impl BatchJob {
    pub fn new(kind: JobKind, data_dir: &Path) -> Self {
        let (input, cv, output) = kind.layout();
        Self {
            kind,
            input_dir: data_dir.join(input),
            cv_dir: cv.map(|dir| data_dir.join(dir)),
            output_stem: data_dir.join(output),
            context: kind.default_context(),
            temperature: kind.default_temperature(),
        }
    }

    pub fn with_context(mut self, context: SystemContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Builds the prompt for one document. `cv_text` is only used by the compare job.
    pub fn prompt(&self, document_text: &str, cv_text: Option<&str>) -> String {
        match self.kind {
            JobKind::Shortlist => shortlist_prompt(document_text),
            JobKind::Compare => compare_prompt(cv_text.unwrap_or_default(), document_text),
            JobKind::Toolbox => toolbox_prompt(document_text),
        }
    }

    pub fn record(
        &self,
        id: &str,
        filename: &str,
        link: &str,
        cv_filename: Option<&str>,
        answers: ExtractedRecord,
    ) -> RunRecord {
        let names = self.kind.field_names();
        let record = RunRecord::new(answers)
            .with_field(names.id, id)
            .with_field(names.filename, filename)
            .with_field(names.link, link);
        match cv_filename {
            Some(cv) => record.with_field(CV_FILENAME_FIELD, cv),
            None => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shortlist_layout_and_defaults() {
        let job = BatchJob::new(JobKind::Shortlist, Path::new("/data"));
        assert_eq!(
            job.input_dir,
            PathBuf::from("/data/app_01__job_search_assistant/1.1.1__to_review")
        );
        assert_eq!(
            job.output_stem,
            PathBuf::from("/data/app_01__job_search_assistant/1.1.9__output_summary/1.1.9__shortlist")
        );
        assert!(job.cv_dir.is_none());
        assert_eq!(job.context, SystemContext::FilmNoir);
        assert!((job.temperature - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_compare_has_cv_dir() {
        let job = BatchJob::new(JobKind::Compare, Path::new("data"));
        assert_eq!(
            job.cv_dir,
            Some(PathBuf::from("data/app_01__job_search_assistant/1.2.3__cv_to_compare"))
        );
        assert!((job.temperature - 0.4).abs() < f32::EPSILON);
    }

    #[test]
    fn test_overrides() {
        let job = BatchJob::new(JobKind::Toolbox, Path::new("data"))
            .with_context(SystemContext::SciFi)
            .with_temperature(0.7);
        assert_eq!(job.context, SystemContext::SciFi);
        assert!((job.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_toolbox_record_field_names() {
        let job = BatchJob::new(JobKind::Toolbox, Path::new("data"));
        let record = job.record(
            "tb-0001",
            "tb-0001_rag.docx",
            "https://blog.example/rag",
            None,
            ExtractedRecord::fallback(),
        );
        assert_eq!(record.field("tb_url"), Some("https://blog.example/rag"));
        assert_eq!(record.field("job_link"), None);
    }

    #[test]
    fn test_compare_record_includes_cv_filename() {
        let job = BatchJob::new(JobKind::Compare, Path::new("data"));
        let record = job.record(
            "job-001",
            "job-001_acme.docx",
            "https://jobs.example/1",
            Some("cv_2024.docx"),
            ExtractedRecord::fallback(),
        );
        assert_eq!(record.field(CV_FILENAME_FIELD), Some("cv_2024.docx"));
    }

    #[test]
    fn test_compare_prompt_uses_cv_text() {
        let job = BatchJob::new(JobKind::Compare, Path::new("data"));
        let prompt = job.prompt("JOB BODY", Some("CV BODY"));
        assert!(prompt.contains("CV:\nCV BODY"));
        assert!(prompt.contains("JOB DESCRIPTION:\nJOB BODY"));
    }
}
