//! Delivery of exported artifacts.
//!
//! Exports produce named JSON strings; a sink decides where they end up.
//! Batches are handed over one at a time with a fixed gap between items so
//! receivers that throttle rapid downloads see them spaced out.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::format::error::FormatError;

/// Destination for named export artifacts.
pub trait ArtifactSink {
    /// Hand over one artifact.
    fn deliver(&mut self, name: &str, contents: &str) -> Result<(), FormatError>;
}

/// Writes artifacts as files into a directory.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    /// Create a sink writing into `dir`. The directory is created on first delivery.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files written so far, in delivery order.
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for DirectorySink {
    fn deliver(&mut self, name: &str, contents: &str) -> Result<(), FormatError> {
        std::fs::create_dir_all(&self.dir).map_err(|source| FormatError::Write {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.dir.join(name);
        std::fs::write(&path, contents).map_err(|source| FormatError::Write {
            path: path.clone(),
            source,
        })?;

        log::info!("Wrote {:?} ({} bytes)", path, contents.len());
        self.written.push(path);
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub artifacts: Vec<(String, String)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of delivered artifacts, in order.
    pub fn names(&self) -> Vec<&str> {
        self.artifacts.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Contents of the artifact called `name`, if delivered.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.artifacts
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, contents)| contents.as_str())
    }
}

impl ArtifactSink for MemorySink {
    fn deliver(&mut self, name: &str, contents: &str) -> Result<(), FormatError> {
        self.artifacts.push((name.to_string(), contents.to_string()));
        Ok(())
    }
}

/// Summary of a delivery run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Artifact names handed to the sink, in order.
    pub delivered: Vec<String>,
    /// Number of annotations contained in the delivered artifacts.
    pub annotations: usize,
}

impl DeliveryReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn record(&mut self, name: impl Into<String>, annotations: usize) {
        self.delivered.push(name.into());
        self.annotations += annotations;
    }
}

/// Deliver artifacts in order, item `i` after a delay of `i * stagger`.
///
/// Stops at the first failing delivery.
pub fn deliver_staggered<S: ArtifactSink + ?Sized>(
    artifacts: &[(String, String)],
    sink: &mut S,
    stagger: Duration,
) -> Result<(), FormatError> {
    for (index, (name, contents)) in artifacts.iter().enumerate() {
        if index > 0 && !stagger.is_zero() {
            std::thread::sleep(stagger);
        }
        log::debug!("Delivering {} ({}/{})", name, index + 1, artifacts.len());
        sink.deliver(name, contents)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Instant;

    fn artifacts(names: &[&str]) -> Vec<(String, String)> {
        names
            .iter()
            .map(|n| (n.to_string(), format!("{{\"name\":\"{}\"}}", n)))
            .collect()
    }

    #[test]
    fn test_memory_sink_keeps_order() {
        let mut sink = MemorySink::new();
        deliver_staggered(&artifacts(&["a.json", "b.json", "c.json"]), &mut sink, Duration::ZERO)
            .unwrap();
        assert_eq!(sink.names(), vec!["a.json", "b.json", "c.json"]);
        assert_eq!(sink.get("b.json"), Some("{\"name\":\"b.json\"}"));
        assert_eq!(sink.get("missing.json"), None);
    }

    #[test]
    fn test_stagger_spaces_deliveries() {
        let mut sink = MemorySink::new();
        let start = Instant::now();
        deliver_staggered(
            &artifacts(&["a.json", "b.json", "c.json"]),
            &mut sink,
            Duration::from_millis(20),
        )
        .unwrap();
        // Third item starts two gaps after the first
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert_eq!(sink.artifacts.len(), 3);
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let mut sink = DirectorySink::new(&out);

        sink.deliver("annotations_a.json", "{}").unwrap();

        let path = out.join("annotations_a.json");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert_eq!(sink.written(), &[path]);
    }

    #[test]
    fn test_directory_sink_reports_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        // A file where the directory should be
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, "x").unwrap();

        let mut sink = DirectorySink::new(&blocker);
        let err = sink.deliver("a.json", "{}").unwrap_err();
        assert!(matches!(err, FormatError::Write { .. }));
    }

    #[test]
    fn test_report_counts() {
        let mut report = DeliveryReport::new();
        assert!(report.delivered.is_empty());
        report.record("a.json", 2);
        report.record("b.json", 3);
        assert_eq!(report.delivered, vec!["a.json", "b.json"]);
        assert_eq!(report.annotations, 5);
    }
}
