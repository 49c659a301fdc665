// Batch jobs: list documents, ask the model, extract answers, export the run.
// All model calls go through the TextGenerator seam, never the HTTP client directly.

pub mod export;
pub mod jobs;
pub mod prompts;
pub mod runner;
