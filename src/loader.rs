//! Loading of the ratings table and the region structure.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;

use polars::prelude::*;
use thiserror::Error;

use crate::config::ViewerConfig;
use crate::frame::{RatingRecord, RatingTable};
use crate::hierarchy::{HierarchyStats, RegionIndex, RegionNode, Structure};
use crate::stats;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing ratings csv: {0}")]
    Csv(#[from] PolarsError),
    #[error("parsing structure json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("ratings csv has no `{0}` column")]
    MissingColumn(&'static str),
    #[error("ratings csv has no usable rows")]
    Empty,
    #[error("{0} loader panicked")]
    Panicked(&'static str),
}

/// Where the two data artifacts live.
#[derive(Clone, Debug)]
pub struct DataSources {
    pub ratings: PathBuf,
    pub structure: PathBuf,
}

impl Default for DataSources {
    fn default() -> Self {
        Self {
            ratings: PathBuf::from("processed_ratings.csv"),
            structure: PathBuf::from("structure.json"),
        }
    }
}

/// Everything the viewer needs, immutable once loaded.
#[derive(Debug)]
pub struct Dataset {
    pub table: RatingTable,
    pub root: RegionNode,
    pub index: RegionIndex,
    pub stats: Option<HierarchyStats>,
}

impl Dataset {
    pub fn new(records: Vec<RatingRecord>, structure: Structure, config: &ViewerConfig) -> Self {
        let table = RatingTable::new(records);
        let index = RegionIndex::build(&structure.root);
        let stats = structure.stats.or_else(|| {
            log::info!("structure has no stats, deriving them from the ratings");
            stats::derive(&table, config)
        });
        Self {
            table,
            root: structure.root,
            index,
            stats,
        }
    }
}

fn column<'a>(df: &'a DataFrame, name: &'static str) -> Result<&'a Column, LoadError> {
    df.column(name).map_err(|_| LoadError::MissingColumn(name))
}

/// Reads `month,fed,rating` rows. Rows with a missing field are skipped.
pub fn load_ratings(path: &Path) -> Result<Vec<RatingRecord>, LoadError> {
    let _span = tracing::info_span!("load_ratings", path = %path.display()).entered();
    if !path.exists() {
        return Err(LoadError::Io {
            path: path.to_path_buf(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;

    let month = column(&df, "month")?.cast(&DataType::String)?;
    let fed = column(&df, "fed")?.cast(&DataType::String)?;
    let rating = column(&df, "rating")?.cast(&DataType::Float64)?;

    let mut skipped = 0usize;
    let records: Vec<RatingRecord> = month
        .str()?
        .into_iter()
        .zip(fed.str()?.into_iter())
        .zip(rating.f64()?.into_iter())
        .filter_map(|((month, fed), rating)| match (month, fed, rating) {
            (Some(month), Some(fed), Some(rating)) => {
                Some(RatingRecord::new(month, fed, rating))
            }
            _ => {
                skipped += 1;
                None
            }
        })
        .collect();

    if skipped > 0 {
        log::warn!("skipped {skipped} incomplete rating rows");
    }
    if records.is_empty() {
        return Err(LoadError::Empty);
    }
    log::info!("loaded {} rating records from {}", records.len(), path.display());
    Ok(records)
}

pub fn load_structure(path: &Path) -> Result<Structure, LoadError> {
    let _span = tracing::info_span!("load_structure", path = %path.display()).entered();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let structure: Structure = serde_json::from_str(&text)?;
    log::info!(
        "loaded region structure with {} top-level regions",
        structure.root.children.len()
    );
    Ok(structure)
}

/// Loads both artifacts, each on its own thread, and joins them.
pub fn load(sources: &DataSources, config: &ViewerConfig) -> Result<Dataset, LoadError> {
    let ratings_path = sources.ratings.clone();
    let structure_path = sources.structure.clone();
    let ratings = std::thread::spawn(move || load_ratings(&ratings_path));
    let structure = std::thread::spawn(move || load_structure(&structure_path));

    let records = ratings
        .join()
        .map_err(|_| LoadError::Panicked("ratings"))??;
    let structure = structure
        .join()
        .map_err(|_| LoadError::Panicked("structure"))??;
    Ok(Dataset::new(records, structure, config))
}

/// A load running in the background.
pub enum LoadState {
    Loading(JoinHandle<Result<Dataset, LoadError>>),
    Done,
    Failed,
}

impl LoadState {
    pub fn spawn(sources: DataSources, config: ViewerConfig) -> Self {
        LoadState::Loading(std::thread::spawn(move || load(&sources, &config)))
    }

    /// Hands out the dataset once the load has finished. Failures are
    /// logged and leave the state at `Failed`.
    pub fn poll(&mut self) -> Option<Dataset> {
        match self {
            LoadState::Loading(handle) if handle.is_finished() => {}
            _ => return None,
        }
        let LoadState::Loading(handle) = std::mem::replace(self, LoadState::Done) else {
            return None;
        };
        match handle.join() {
            Ok(Ok(dataset)) => Some(dataset),
            Ok(Err(err)) => {
                log::error!("loading data failed: {err}");
                *self = LoadState::Failed;
                None
            }
            Err(_) => {
                log::error!("loading data failed: loader thread panicked");
                *self = LoadState::Failed;
                None
            }
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading(_))
    }
}

impl std::fmt::Debug for LoadState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadState::Loading(_) => write!(f, "Loading"),
            LoadState::Done => write!(f, "Done"),
            LoadState::Failed => write!(f, "Failed"),
        }
    }
}
