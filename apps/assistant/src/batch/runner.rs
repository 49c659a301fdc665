use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::batch::export::{append_pipe_delimited, export_run_to_json};
use crate::batch::jobs::BatchJob;
use crate::documents::{list_files_in_dir, DocumentError, DocumentSource, DOCX_EXTENSION};
use crate::errors::AppError;
use crate::extraction::ResponseExtractor;
use crate::llm_client::{check_temperature, TextGenerator};

/// Item ids are the leading characters of the filename, e.g. `job-001` or `tb-0001`.
const ID_LEN: usize = 7;

/// Outcome of one batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub processed: usize,
    /// Items whose answers could not be parsed and carry the fallback record.
    pub fallbacks: usize,
    pub json_path: Option<PathBuf>,
    pub txt_path: Option<PathBuf>,
}

/// The CV a compare run measures every job against.
struct Cv {
    filename: String,
    text: String,
}

/// Runs a batch job: one model call per input document, strictly in order.
pub struct BatchRunner<'a> {
    generator: &'a dyn TextGenerator,
    documents: &'a dyn DocumentSource,
    extractor: &'a ResponseExtractor,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        generator: &'a dyn TextGenerator,
        documents: &'a dyn DocumentSource,
        extractor: &'a ResponseExtractor,
    ) -> Self {
        Self {
            generator,
            documents,
            extractor,
        }
    }

    pub async fn run(&self, job: &BatchJob) -> Result<RunSummary, AppError> {
        check_temperature(job.temperature)?;

        let cv = match &job.cv_dir {
            Some(dir) => Some(self.load_cv(dir)?),
            None => None,
        };

        let items = index_by_id(list_docx(&job.input_dir)?);
        if items.is_empty() {
            info!(
                "No docx files in input directory: '{}'",
                job.input_dir.display()
            );
            return Ok(RunSummary::default());
        }

        info!(
            "Running {} over {} documents (context: {:?}, temperature: {})",
            job.kind.name(),
            items.len(),
            job.context,
            job.temperature
        );

        let system = job.context.system_prompt();
        let mut records = Vec::with_capacity(items.len());
        let mut fallbacks = 0;

        for (id, filename) in &items {
            info!("Key: {id}, Value: {filename}");

            let document = self.documents.load(&job.input_dir.join(filename))?;
            let prompt = job.prompt(
                &document.full_text,
                cv.as_ref().map(|cv| cv.text.as_str()),
            );

            let raw = self
                .generator
                .generate(&prompt, system, job.temperature)
                .await?;
            let answers = self.extractor.extract(&raw)?;
            if answers.is_fallback() {
                fallbacks += 1;
            }

            records.push(job.record(
                id,
                filename,
                &document.first_paragraph,
                cv.as_ref().map(|cv| cv.filename.as_str()),
                answers,
            ));
        }

        let json_path = export_run_to_json(&records, &job.output_stem)?;
        let txt_path = append_pipe_delimited(&job.output_stem)?;

        if fallbacks > 0 {
            warn!("{fallbacks} of {} responses could not be parsed", records.len());
        }

        Ok(RunSummary {
            processed: records.len(),
            fallbacks,
            json_path: Some(json_path),
            txt_path: Some(txt_path),
        })
    }

    /// The first `.docx` in the CV folder is the CV.
    fn load_cv(&self, dir: &Path) -> Result<Cv, AppError> {
        let filename = list_docx(dir)?.into_iter().next().ok_or_else(|| {
            AppError::Validation(format!("No docx CV in directory: '{}'", dir.display()))
        })?;
        let document = self.documents.load(&dir.join(&filename))?;
        info!("Comparing against CV {filename}");
        Ok(Cv {
            filename,
            text: document.full_text,
        })
    }
}

fn list_docx(dir: &Path) -> Result<Vec<String>, DocumentError> {
    list_files_in_dir(dir, DOCX_EXTENSION).map_err(|source| DocumentError::Io {
        path: dir.to_path_buf(),
        source,
    })
}

/// Keys filenames by id. A later file with the same id replaces the earlier one in place.
fn index_by_id(filenames: Vec<String>) -> IndexMap<String, String> {
    let mut items = IndexMap::with_capacity(filenames.len());
    for filename in filenames {
        let id: String = filename.chars().take(ID_LEN).collect();
        if let Some(previous) = items.insert(id.clone(), filename) {
            warn!("Duplicate id {id}: {previous} is replaced by {}", items[&id]);
        }
    }
    items
}
