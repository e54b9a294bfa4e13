//! Feature files.
//!
//! A feature file is a plain sequence of records, each prefixed by its length
//! as a LEB128 varint. There is no header and no index; readers walk the file
//! front to back.
//!
//! # Example
//!
//! ```
//! use geofeature::container::{FeatureReader, FeatureWriter};
//! use geofeature::feature::{CompiledFeature, FeatureBuilder};
//! use geofeature::geometry::PointD;
//!
//! let mut builder = FeatureBuilder::new();
//! builder.add_point(PointD::new(12.5, 41.9));
//! let feature = CompiledFeature::encode(builder);
//!
//! let mut writer = FeatureWriter::new(Vec::new());
//! writer.write(&feature)?;
//! let bytes = writer.finish()?;
//!
//! let features: Vec<_> = FeatureReader::new(bytes.into()).collect::<Result<_, _>>()?;
//! assert_eq!(features, vec![feature]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bytes::{Bytes, BytesMut};
use thiserror::Error;
use tracing::{debug, info};

use crate::feature::{put_varint, CompiledFeature, FeatureError, WireReader};
use crate::geometry::RectD;

/// Errors from reading a whole feature file.
#[derive(Debug, Error)]
pub enum ContainerError {
    /// The file could not be read.
    #[error("Failed to read feature file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A record is malformed.
    #[error("Feature record {index} is invalid: {source}")]
    Record {
        index: usize,
        #[source]
        source: FeatureError,
    },
}

/// Appends length-prefixed feature records to a writer.
#[derive(Debug)]
pub struct FeatureWriter<W: Write> {
    inner: W,
    count: usize,
}

impl<W: Write> FeatureWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }

    /// Append one record.
    pub fn write(&mut self, feature: &CompiledFeature) -> io::Result<()> {
        let record = feature.as_bytes();
        let mut prefix = BytesMut::with_capacity(10);
        put_varint(&mut prefix, record.len() as u64);
        self.inner.write_all(&prefix)?;
        self.inner.write_all(record)?;
        self.count += 1;
        Ok(())
    }

    /// Number of records written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Flush and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.inner.flush()?;
        debug!(records = self.count, "Finished feature file");
        Ok(self.inner)
    }
}

/// Iterates the records of a feature file held in memory.
///
/// Records are sliced out of the buffer without copying. Iteration stops
/// after the first error.
#[derive(Debug, Clone)]
pub struct FeatureReader {
    data: Bytes,
    pos: usize,
    failed: bool,
}

impl FeatureReader {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            pos: 0,
            failed: false,
        }
    }

    /// Only features whose limit rectangle intersects `rect`. Errors are
    /// passed through.
    pub fn in_rect(self, rect: RectD) -> impl Iterator<Item = Result<CompiledFeature, FeatureError>> {
        self.filter(move |item| match item {
            Ok(feature) => feature.limit_rect().intersects(&rect),
            Err(_) => true,
        })
    }

    fn next_record(&mut self) -> Result<CompiledFeature, FeatureError> {
        let mut reader = WireReader::new(&self.data, self.pos);
        let len = reader.read_count()?;
        let start = reader.position();
        let record = self.data.slice(start..start + len);
        self.pos = start + len;
        CompiledFeature::from_bytes(record)
    }
}

impl Iterator for FeatureReader {
    type Item = Result<CompiledFeature, FeatureError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let result = self.next_record();
        self.failed = result.is_err();
        Some(result)
    }
}

/// Load every feature from a file.
pub fn read_features(path: impl AsRef<Path>) -> Result<Vec<CompiledFeature>, ContainerError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| ContainerError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let features = FeatureReader::new(Bytes::from(data))
        .enumerate()
        .map(|(index, item)| item.map_err(|source| ContainerError::Record { index, source }))
        .collect::<Result<Vec<_>, _>>()?;

    info!(path = %path.display(), features = features.len(), "Loaded feature file");
    Ok(features)
}
