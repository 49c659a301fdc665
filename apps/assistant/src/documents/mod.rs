//! Input documents: listing a folder and pulling text out of `.docx` files.
//!
//! By convention the first paragraph of every input document is the URL of the source
//! (job advert or article), and everything else is the body.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use docx_rs::{DocumentChild, Paragraph, ParagraphChild, RunChild};
use thiserror::Error;

pub const DOCX_EXTENSION: &str = ".docx";

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{} is not a readable .docx file: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("{} contains no paragraphs", .0.display())]
    Empty(PathBuf),
}

/// Text pulled from one input document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    /// Usually the source URL.
    pub first_paragraph: String,
    /// Every paragraph, each followed by `\n`.
    pub full_text: String,
}

impl LoadedDocument {
    pub fn from_paragraphs<I, S>(paragraphs: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut first_paragraph = None;
        let mut full_text = String::new();
        for paragraph in paragraphs {
            let paragraph = paragraph.as_ref();
            if first_paragraph.is_none() {
                first_paragraph = Some(paragraph.to_string());
            }
            full_text.push_str(paragraph);
            full_text.push('\n');
        }
        first_paragraph.map(|first_paragraph| Self {
            first_paragraph,
            full_text,
        })
    }
}

/// Loads the text of one input document.
pub trait DocumentSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<LoadedDocument, DocumentError>;
}

/// Reads Word documents with `docx-rs`. Only top-level paragraphs are read; tables are skipped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocxLoader;

impl DocumentSource for DocxLoader {
    fn load(&self, path: &Path) -> Result<LoadedDocument, DocumentError> {
        let bytes = fs::read(path).map_err(|source| DocumentError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let docx = docx_rs::read_docx(&bytes).map_err(|e| DocumentError::Malformed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let paragraphs = docx.document.children.iter().filter_map(|child| match child {
            DocumentChild::Paragraph(paragraph) => Some(paragraph_text(paragraph)),
            _ => None,
        });

        LoadedDocument::from_paragraphs(paragraphs)
            .ok_or_else(|| DocumentError::Empty(path.to_path_buf()))
    }
}

fn paragraph_text(paragraph: &Paragraph) -> String {
    let mut text = String::new();
    push_children_text(&paragraph.children, &mut text);
    text
}

fn push_children_text(children: &[ParagraphChild], text: &mut String) {
    for child in children {
        match child {
            ParagraphChild::Run(run) => {
                for run_child in &run.children {
                    match run_child {
                        RunChild::Text(t) => text.push_str(&t.text),
                        RunChild::Tab(_) => text.push('\t'),
                        RunChild::Break(_) => text.push('\n'),
                        _ => {}
                    }
                }
            }
            // Source URLs are often pasted as hyperlinks.
            ParagraphChild::Hyperlink(link) => push_children_text(&link.children, text),
            _ => {}
        }
    }
}

/// Lists file names in `dir` ending with `extension`, sorted.
///
/// Word lock files (`~$...`) are skipped. Errors reading the directory propagate.
pub fn list_files_in_dir(dir: &Path, extension: &str) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.ends_with(extension) && !name.starts_with("~$") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}
