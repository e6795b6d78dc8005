use thiserror::Error;

/// Failure to open or read one of the tables of a feed.
#[derive(Error, Debug)]
pub enum Error {
    /// A required table is absent from the directory or archive
    #[error("Could not find file {0}")]
    MissingFile(String),
    #[error("Could not read GTFS: {0} is neither a file nor a directory")]
    NotFileNorDirectory(String),
    #[error("impossible to read '{file_name}'")]
    NamedFileIO {
        file_name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// The CSV layer failed on the header row or hit an I/O error mid-table.
    /// Undecodable data rows are skipped and never surface here.
    #[error("impossible to read csv file '{file_name}'")]
    CSVError {
        file_name: String,
        #[source]
        source: csv::Error,
    },
    #[error("invalid column layout '{path}'")]
    Layout {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Zip(#[from] zip::result::ZipError),
}
