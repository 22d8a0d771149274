//! Trajectory sources
//!
//! A source turns a body description into its ordered position samples.
//! Sequences may have any length, including zero.

use crate::config::{BodyConfig, DataConfig};
use crate::{Result, SimError};
use orrery_core::Vec3;
use rustc_hash::FxHashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Provides position samples per body
pub trait PositionSource {
    /// Load the samples for `body`
    fn load(&self, body: &BodyConfig) -> Result<Vec<Vec3>>;
}

/// Reads whitespace-separated trajectory tables from disk
///
/// Columns 3, 4 and 5 of each row are the x, y and z coordinates. Rows with
/// fewer than six columns, or whose coordinates are not numbers, are
/// skipped, which lets header and footer lines pass through unharmed.
#[derive(Clone, Debug)]
pub struct FileSource {
    dir: PathBuf,
    scale: f64,
}

impl FileSource {
    pub fn new(dir: impl Into<PathBuf>, scale: f64) -> Self {
        Self {
            dir: dir.into(),
            scale,
        }
    }

    /// Source for a data section, resolving its directory against `root`
    pub fn from_config(data: &DataConfig, root: &Path) -> Self {
        Self::new(root.join(&data.dir), data.scale)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl PositionSource for FileSource {
    fn load(&self, body: &BodyConfig) -> Result<Vec<Vec3>> {
        let Some(file) = &body.trajectory else {
            trace!(body = %body.name, "no trajectory configured");
            return Ok(Vec::new());
        };

        let path = self.dir.join(file);
        let text = fs::read_to_string(&path).map_err(|source| SimError::Io {
            path: path.clone(),
            source,
        })?;
        let samples = parse_trajectory(&text, self.scale);

        debug!(body = %body.name, path = %path.display(), samples = samples.len(), "loaded trajectory");
        Ok(samples)
    }
}

/// Parse a trajectory table, multiplying every coordinate by `scale`
pub fn parse_trajectory(text: &str, scale: f64) -> Vec<Vec3> {
    text.lines()
        .filter_map(|line| {
            let columns: Vec<&str> = line.split_whitespace().collect();
            if columns.len() < 6 {
                return None;
            }
            let coord = |i: usize| {
                columns[i]
                    .parse::<f64>()
                    .ok()
                    .filter(|v| v.is_finite())
                    .map(|v| (v * scale) as f32)
            };
            Some(Vec3::new(coord(3)?, coord(4)?, coord(5)?))
        })
        .collect()
}

/// Samples held in memory, keyed by body name
#[derive(Clone, Debug, Default)]
pub struct MemorySource {
    samples: FxHashMap<String, Vec<Vec3>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register samples for a body
    pub fn with(mut self, body: impl Into<String>, samples: Vec<Vec3>) -> Self {
        self.insert(body, samples);
        self
    }

    pub fn insert(&mut self, body: impl Into<String>, samples: Vec<Vec3>) {
        self.samples.insert(body.into(), samples);
    }
}

impl PositionSource for MemorySource {
    fn load(&self, body: &BodyConfig) -> Result<Vec<Vec3>> {
        Ok(self.samples.get(&body.name).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
$$SOE
2451545.000000000 = A.D. 2000-Jan-01 00:00:00.0000 TDB
2451545.0 A 2000 -1.771350992727098E-01 9.672416867665480E-01 -4.085281582511366E-06
2451546.0 A 2000 -1.943784344532080E-01 9.642311320248730E-01 -4.071037971775440E-06

2451547.0 A 2000 oops 1.0 2.0
$$EOE
";

    #[test]
    fn test_parse_skips_non_sample_rows() {
        let samples = parse_trajectory(SAMPLE, 1.0);
        assert_eq!(samples.len(), 2);
        assert!(samples[0].approx_eq(
            Vec3::new(-1.771350992727098E-01, 9.672416867665480E-01, -4.085281582511366E-06),
            1e-7
        ));
    }

    #[test]
    fn test_parse_applies_scale() {
        let samples = parse_trajectory("0 0 0 1.0 -2.0 0.5 extra columns", 149.6);
        assert_eq!(samples, vec![Vec3::new(149.6, -299.2, 74.8)]);
    }

    #[test]
    fn test_parse_empty() {
        assert!(parse_trajectory("", 149.6).is_empty());
        assert!(parse_trajectory("too few columns here", 149.6).is_empty());
    }

    #[test]
    fn test_file_source_without_trajectory_is_empty() {
        let source = FileSource::new("does-not-exist", 1.0);
        assert!(source.load(&BodyConfig::new("sun")).unwrap().is_empty());
    }

    #[test]
    fn test_file_source_missing_file() {
        let source = FileSource::new("does-not-exist", 1.0);
        let err = source
            .load(&BodyConfig::new("earth").with_trajectory("Earth.txt"))
            .unwrap_err();
        assert!(matches!(err, SimError::Io { .. }));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with("earth", vec![Vec3::ONE]);
        assert_eq!(source.load(&BodyConfig::new("earth")).unwrap(), vec![Vec3::ONE]);
        assert!(source.load(&BodyConfig::new("mars")).unwrap().is_empty());
    }
}
