//! Locating wedding data for a slug.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use crate::wedding::{DataError, WeddingData};

const WEDDINGS_FILE: &str = "weddings.json";
const SAMPLE_FILE: &str = "sample-wedding.json";

/// Where wedding data came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    /// `--data` on the command line
    Inline,
    /// `data/<slug>.json`
    SlugFile(PathBuf),
    /// An entry of `data/weddings.json`
    WeddingsFile(PathBuf),
    /// `data/sample-wedding.json`
    Sample(PathBuf),
}

impl fmt::Display for DataOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataOrigin::Inline => write!(f, "--data"),
            DataOrigin::SlugFile(p) | DataOrigin::WeddingsFile(p) | DataOrigin::Sample(p) => {
                write!(f, "{}", p.display())
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedWedding {
    pub data: WeddingData,
    pub origin: DataOrigin,
}

/// Load the wedding data for `slug`.
///
/// Tries, in order: `inline` JSON, `<data_dir>/<slug>.json`, a matching
/// entry in `<data_dir>/weddings.json` and, when `sample_fallback` is set,
/// `<data_dir>/sample-wedding.json`.
pub fn load_wedding(
    data_dir: &Path,
    slug: &str,
    inline: Option<&str>,
    sample_fallback: bool,
) -> Result<LoadedWedding, DataError> {
    if let Some(json) = inline {
        let data = parse(json, &DataOrigin::Inline)?;
        return Ok(LoadedWedding {
            data,
            origin: DataOrigin::Inline,
        });
    }

    let slug_file = data_dir.join(format!("{slug}.json"));
    if slug_file.is_file() {
        let origin = DataOrigin::SlugFile(slug_file.clone());
        let data = read(&slug_file, &origin)?;
        return Ok(LoadedWedding { data, origin });
    }

    let weddings_file = data_dir.join(WEDDINGS_FILE);
    if weddings_file.is_file() {
        let origin = DataOrigin::WeddingsFile(weddings_file.clone());
        let weddings: Vec<WeddingData> = read(&weddings_file, &origin)?;
        if let Some(data) = weddings
            .into_iter()
            .find(|w| w.slug.as_deref() == Some(slug))
        {
            return Ok(LoadedWedding { data, origin });
        }
    }

    let sample_file = data_dir.join(SAMPLE_FILE);
    if sample_fallback && sample_file.is_file() {
        tracing::warn!(
            "No data for {}, using {} instead",
            slug,
            sample_file.display()
        );
        let origin = DataOrigin::Sample(sample_file.clone());
        let data = read(&sample_file, &origin)?;
        return Ok(LoadedWedding { data, origin });
    }

    Err(DataError::NotFound {
        slug: slug.to_string(),
    })
}

fn read<T: DeserializeOwned>(path: &Path, origin: &DataOrigin) -> Result<T, DataError> {
    let content = fs::read_to_string(path).map_err(|e| DataError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    parse(&content, origin)
}

fn parse<T: DeserializeOwned>(json: &str, origin: &DataOrigin) -> Result<T, DataError> {
    serde_json::from_str(json).map_err(|e| DataError::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })
}
