use data_loader::DataLoadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Cannot fit a vectorizer on an empty corpus")]
    EmptyCorpus,

    #[error("Empty vocabulary: every document contains only stop words or short tokens")]
    EmptyVocabulary,

    #[error("Invalid category table {source_name}: {reason}")]
    CategoryTable { source_name: String, reason: String },

    #[error(transparent)]
    DataLoad(#[from] DataLoadError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
