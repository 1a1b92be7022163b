//! Output channel table
//!
//! `PartitionSet` owns one buffered file per partition. All 28 files are
//! opened up front, so a run that cannot create its outputs fails before
//! reading any records.

use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use super::router::{route, Partition};
use crate::error::PartitionError;

/// How existing partition files are treated when opened
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum OutputMode {
    /// Append to existing files
    #[default]
    Append,
    /// Truncate existing files
    Truncate,
}

struct Channel {
    partition: Partition,
    writer: BufWriter<File>,
    lines: u64,
}

/// The 28 open output channels of a run
pub struct PartitionSet {
    directory: PathBuf,
    channels: Vec<Channel>,
}

impl PartitionSet {
    /// Open every partition file under `directory`
    pub fn open(directory: impl AsRef<Path>, mode: OutputMode) -> Result<Self, PartitionError> {
        let directory = directory.as_ref().to_path_buf();

        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            OutputMode::Append => options.append(true),
            OutputMode::Truncate => options.write(true).truncate(true),
        };

        let mut channels = Vec::with_capacity(Partition::COUNT);
        for partition in Partition::all() {
            let path = directory.join(partition.file_name());
            let file = options.open(&path).map_err(|source| PartitionError::Open {
                key: partition.key(),
                path: path.clone(),
                source,
            })?;
            channels.push(Channel {
                partition,
                writer: BufWriter::new(file),
                lines: 0,
            });
        }

        debug!(directory = %directory.display(), ?mode, "Opened partition files");

        Ok(Self {
            directory,
            channels,
        })
    }

    /// Directory holding the partition files
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Append `fragment<TAB>identifier` to the fragment's partition
    pub fn write(&mut self, fragment: &str, identifier: &str) -> Result<Partition, PartitionError> {
        let partition = route(fragment);
        let channel = &mut self.channels[partition.index()];

        writeln!(channel.writer, "{fragment}\t{identifier}").map_err(|source| {
            PartitionError::Write {
                key: partition.key(),
                source,
            }
        })?;
        channel.lines += 1;

        Ok(partition)
    }

    /// Lines written so far, keyed by partition key
    pub fn line_counts(&self) -> BTreeMap<String, u64> {
        self.channels
            .iter()
            .map(|c| (c.partition.key().to_string(), c.lines))
            .collect()
    }

    /// Flush and close every partition, returning the final line counts
    pub fn close(mut self) -> Result<BTreeMap<String, u64>, PartitionError> {
        for channel in &mut self.channels {
            channel
                .writer
                .flush()
                .map_err(|source| PartitionError::Write {
                    key: channel.partition.key(),
                    source,
                })?;
        }
        Ok(self.line_counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_open_creates_all_files() {
        let dir = tempfile::tempdir().unwrap();
        let set = PartitionSet::open(dir.path(), OutputMode::Append).unwrap();
        set.close().unwrap();

        let mut names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        assert_eq!(names.len(), 28);
        assert!(names.contains(&"1.txt".to_string()));
        assert!(names.contains(&"MV.txt".to_string()));
        assert!(names.contains(&"A.txt".to_string()));
        assert!(names.contains(&"Z.txt".to_string()));
    }

    #[test]
    fn test_write_routes_lines() {
        let dir = tempfile::tempdir().unwrap();
        let mut set = PartitionSet::open(dir.path(), OutputMode::Append).unwrap();

        assert_eq!(set.write("ZEBRA CORP", "100").unwrap().key(), "Z");
        assert_eq!(set.write("7-ELEVEN", "200").unwrap().key(), "1");
        assert_eq!(set.write("école", "300").unwrap().key(), "MV");
        assert_eq!(set.write("ZOO", "400").unwrap().key(), "Z");

        let counts = set.close().unwrap();
        assert_eq!(counts["Z"], 2);
        assert_eq!(counts["1"], 1);
        assert_eq!(counts["MV"], 1);
        assert_eq!(counts["A"], 0);

        let z = fs::read_to_string(dir.path().join("Z.txt")).unwrap();
        assert_eq!(z, "ZEBRA CORP\t100\nZOO\t400\n");
        let mv = fs::read_to_string(dir.path().join("MV.txt")).unwrap();
        assert_eq!(mv, "école\t300\n");
    }

    #[test]
    fn test_append_and_truncate_modes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("A.txt"), "EXISTING\t1\n").unwrap();

        let mut set = PartitionSet::open(dir.path(), OutputMode::Append).unwrap();
        set.write("ACME", "2").unwrap();
        set.close().unwrap();
        let a = fs::read_to_string(dir.path().join("A.txt")).unwrap();
        assert_eq!(a, "EXISTING\t1\nACME\t2\n");

        let mut set = PartitionSet::open(dir.path(), OutputMode::Truncate).unwrap();
        set.write("ALPHA", "3").unwrap();
        set.close().unwrap();
        let a = fs::read_to_string(dir.path().join("A.txt")).unwrap();
        assert_eq!(a, "ALPHA\t3\n");
    }

    #[test]
    fn test_open_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = PartitionSet::open(&missing, OutputMode::Append)
            .err()
            .expect("open should fail");
        assert!(matches!(err, PartitionError::Open { key: "1", .. }));
    }
}
