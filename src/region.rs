//! Paint annotation run sequences
//!
//! A paint annotation assigns a label (extruder or support marker) to every
//! triangle of a mesh. On disk it is run-length encoded; this module decodes
//! it into a [`RunSequence`] and never interprets the labels.
//!
//! The default [`ZlibRunCodec`] reads a zlib stream of little-endian
//! `(label: u32, length: u32)` records.

use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use tracing::debug;

use crate::error::{Error, Result};

/// Size of one encoded run record in bytes
const RECORD_SIZE: usize = 8;

/// One run: `length` consecutive elements share `label`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Run {
    /// Paint label of the run
    pub label: u32,
    /// Number of elements in the run (always positive)
    pub length: usize,
}

impl Run {
    /// Create a new run
    pub fn new(label: u32, length: usize) -> Self {
        Self { label, length }
    }
}

/// Ordered sequence of runs covering a mesh's elements front to back
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunSequence {
    runs: Vec<Run>,
}

impl RunSequence {
    /// Build a sequence from runs
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if any run has zero length.
    pub fn new(runs: Vec<Run>) -> Result<Self> {
        if let Some(index) = runs.iter().position(|run| run.length == 0) {
            return Err(Error::decode_with_context(
                "run sequence",
                &format!("run {} has zero length", index),
            ));
        }
        Ok(Self { runs })
    }

    /// Build a sequence from `(label, length)` pairs
    pub fn from_pairs(pairs: &[(u32, usize)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(label, length)| Run::new(label, length))
                .collect(),
        )
    }

    /// The runs, in order
    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Number of runs
    pub fn len(&self) -> usize {
        self.runs.len()
    }

    /// Whether the sequence has no runs
    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    /// Sum of all run lengths
    pub fn total_len(&self) -> usize {
        self.runs.iter().map(|run| run.length).sum()
    }

    /// Labels in run order
    pub fn labels(&self) -> impl Iterator<Item = u32> + '_ {
        self.runs.iter().map(|run| run.label)
    }

    /// Check that the sequence covers exactly `element_count` elements
    ///
    /// # Errors
    ///
    /// Returns [`Error::Partition`] naming `part` on mismatch.
    pub fn validate_against(&self, part: &str, element_count: usize) -> Result<()> {
        let total = self.total_len();
        if total != element_count {
            return Err(Error::partition_mismatch(part, element_count, total));
        }
        Ok(())
    }
}

/// Decoder for encoded paint annotations
///
/// Implementations only translate bytes into runs; validation against a mesh
/// happens when the part is merged.
pub trait RegionCodec {
    /// Decode an encoded annotation
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the stream is malformed.
    fn decode(&self, encoded: &[u8]) -> Result<RunSequence>;
}

/// Zlib-compressed little-endian `(label, length)` records
#[derive(Debug, Clone, Copy, Default)]
pub struct ZlibRunCodec;

impl ZlibRunCodec {
    /// Encode a run sequence in this codec's format
    pub fn encode(&self, runs: &RunSequence) -> Result<Vec<u8>> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        for run in runs.runs() {
            let length = u32::try_from(run.length).map_err(|_| {
                Error::decode_with_context(
                    "run sequence",
                    &format!("run length {} does not fit in 32 bits", run.length),
                )
            })?;
            encoder.write_all(&run.label.to_le_bytes())?;
            encoder.write_all(&length.to_le_bytes())?;
        }
        Ok(encoder.finish()?)
    }
}

impl RegionCodec for ZlibRunCodec {
    fn decode(&self, encoded: &[u8]) -> Result<RunSequence> {
        let mut raw = Vec::new();
        ZlibDecoder::new(encoded)
            .read_to_end(&mut raw)
            .map_err(|e| Error::decode_with_context("region stream", &e.to_string()))?;

        if raw.len() % RECORD_SIZE != 0 {
            return Err(Error::decode_with_context(
                "region stream",
                &format!(
                    "{} bytes is not a whole number of {}-byte run records",
                    raw.len(),
                    RECORD_SIZE
                ),
            ));
        }

        let runs = raw
            .chunks_exact(RECORD_SIZE)
            .map(|record| {
                let label = u32::from_le_bytes([record[0], record[1], record[2], record[3]]);
                let length = u32::from_le_bytes([record[4], record[5], record[6], record[7]]);
                Run::new(label, length as usize)
            })
            .collect();

        RunSequence::new(runs)
    }
}

/// Read and decode an annotation file
///
/// # Errors
///
/// Returns [`Error::FileAccess`] if the file cannot be read and
/// [`Error::Decode`] if its content is malformed.
pub fn load_runs<P: AsRef<Path>>(path: P, codec: &dyn RegionCodec) -> Result<RunSequence> {
    let path = path.as_ref();
    let encoded = std::fs::read(path).map_err(|e| Error::file_access(path, e))?;
    let runs = codec.decode(&encoded)?;

    debug!(
        path = %path.display(),
        runs = runs.len(),
        elements = runs.total_len(),
        "Decoded region annotation"
    );

    Ok(runs)
}
