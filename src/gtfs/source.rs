use crate::gtfs::error::Error;
use crate::gtfs::layout::Columns;
use crate::gtfs::reader::{self, Row, TableStats};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use zip::ZipArchive;

pub const ROUTES: &str = "routes.txt";
pub const TRIPS: &str = "trips.txt";
pub const STOPS: &str = "stops.txt";
pub const STOP_TIMES: &str = "stop_times.txt";
pub const SHAPES: &str = "shapes.txt";

/// Where the tables of a feed are read from
pub enum FeedSource {
    /// A directory holding the `.txt` tables
    Dir(PathBuf),
    /// A zip archive with the tables at its root
    Zip(ZipArchive<BufReader<File>>),
}

impl FeedSource {
    pub fn from_path<P>(path: P) -> Result<FeedSource, Error>
    where
        P: AsRef<Path>,
    {
        let p = path.as_ref();
        if p.is_file() {
            let file = File::open(p).map_err(|e| Error::NamedFileIO {
                file_name: format!("{}", p.display()),
                source: Box::new(e),
            })?;
            Ok(FeedSource::Zip(ZipArchive::new(BufReader::new(file))?))
        } else if p.is_dir() {
            Ok(FeedSource::Dir(p.to_path_buf()))
        } else {
            Err(Error::NotFileNorDirectory(format!("{}", p.display())))
        }
    }

    pub fn contains(&mut self, file_name: &str) -> bool {
        match self {
            FeedSource::Dir(dir) => dir.join(file_name).is_file(),
            FeedSource::Zip(archive) => archive.index_for_name(file_name).is_some(),
        }
    }

    /// Stream the rows of a table, see [`reader::scan_table`].
    /// A table absent from the feed is an [`Error::MissingFile`].
    pub fn scan<C, F>(&mut self, file_name: &str, columns: &C, f: F) -> Result<TableStats, Error>
    where
        C: Columns,
        F: FnMut(Row<'_>, &C) -> bool,
    {
        log::debug!("Reading {}", file_name);
        match self {
            FeedSource::Dir(dir) => {
                let p = dir.join(file_name);
                if !p.exists() {
                    return Err(Error::MissingFile(file_name.to_owned()));
                }
                let file = File::open(&p).map_err(|e| Error::NamedFileIO {
                    file_name: file_name.to_owned(),
                    source: Box::new(e),
                })?;
                let total_bytes = file.metadata().ok().map(|m| m.len());
                reader::scan_table(file, file_name, total_bytes, columns, f)
            }
            FeedSource::Zip(archive) => {
                let entry = match archive.by_name(file_name) {
                    Ok(entry) => entry,
                    Err(zip::result::ZipError::FileNotFound) => {
                        return Err(Error::MissingFile(file_name.to_owned()))
                    }
                    Err(e) => return Err(e.into()),
                };
                let total_bytes = Some(entry.size());
                reader::scan_table(entry, file_name, total_bytes, columns, f)
            }
        }
    }
}
