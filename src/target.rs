//! The two append-only destination files.

use crate::error::{Error, Result};
use crate::split::Destination;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// The fixed record appended on every write.
pub const RECORD: &[u8] = b"test-data\n";

/// A writer that can push flushed data down to stable storage.
pub trait Syncable: Write {
    /// Make previously flushed data durable. In-memory writers do nothing.
    fn sync_data(&mut self) -> io::Result<()>;
}

impl Syncable for BufWriter<File> {
    fn sync_data(&mut self) -> io::Result<()> {
        self.get_ref().sync_data()
    }
}

impl<S: Syncable + ?Sized> Syncable for &mut S {
    fn sync_data(&mut self) -> io::Result<()> {
        (**self).sync_data()
    }
}

impl Syncable for Vec<u8> {
    fn sync_data(&mut self) -> io::Result<()> {
        Ok(())
    }
}

struct Target<W> {
    path: PathBuf,
    writer: W,
}

/// Configured and vanilla destinations, each exclusively owned for one run.
pub struct TargetFiles<W> {
    configured: Target<W>,
    vanilla: Target<W>,
}

impl TargetFiles<BufWriter<File>> {
    /// Open both files for append, creating them if absent.
    ///
    /// Existing content is never truncated. Both opens complete before this
    /// returns, so a failure here means nothing has been written.
    pub fn open(configured: &Path, vanilla: &Path) -> Result<Self> {
        Ok(Self::new(
            configured,
            open_append(configured)?,
            vanilla,
            open_append(vanilla)?,
        ))
    }
}

impl<W: Syncable> TargetFiles<W> {
    /// Wrap arbitrary writers, labelled with the paths used in errors.
    pub fn new(
        configured_path: impl Into<PathBuf>,
        configured: W,
        vanilla_path: impl Into<PathBuf>,
        vanilla: W,
    ) -> Self {
        Self {
            configured: Target {
                path: configured_path.into(),
                writer: configured,
            },
            vanilla: Target {
                path: vanilla_path.into(),
                writer: vanilla,
            },
        }
    }

    /// Append one record to `dest` and flush it out of the in-process buffer.
    ///
    /// `written` is the number of writes already completed, used only for
    /// error reporting.
    pub fn append(&mut self, dest: Destination, sync: bool, written: u64) -> Result<()> {
        let target = self.target_mut(dest);
        let outcome = target.writer.write_all(RECORD).and_then(|()| {
            target.writer.flush()?;
            if sync {
                target.writer.sync_data()?;
            }
            Ok(())
        });
        outcome.map_err(|source| Error::WriteFailure {
            path: target.path.clone(),
            written,
            source,
        })
    }

    pub fn path(&self, dest: Destination) -> &Path {
        match dest {
            Destination::Configured => &self.configured.path,
            Destination::Vanilla => &self.vanilla.path,
        }
    }

    /// Flush both writers and hand them back. Dropping them closes the files.
    pub fn into_inner(mut self, written: u64) -> Result<(W, W)> {
        for dest in [Destination::Configured, Destination::Vanilla] {
            let target = self.target_mut(dest);
            target
                .writer
                .flush()
                .map_err(|source| Error::WriteFailure {
                    path: target.path.clone(),
                    written,
                    source,
                })?;
        }
        Ok((self.configured.writer, self.vanilla.writer))
    }

    fn target_mut(&mut self, dest: Destination) -> &mut Target<W> {
        match dest {
            Destination::Configured => &mut self.configured,
            Destination::Vanilla => &mut self.vanilla,
        }
    }
}

fn open_append(path: &Path) -> Result<BufWriter<File>> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map(BufWriter::new)
        .map_err(|source| Error::ResourceUnavailable {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Accepts writes but fails every flush.
    struct BrokenFlush(Vec<u8>);

    impl Write for BrokenFlush {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "device gone"))
        }
    }

    impl Syncable for BrokenFlush {
        fn sync_data(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn should_append_record_to_chosen_writer() {
        let mut targets = TargetFiles::new("c", Vec::new(), "v", Vec::new());
        targets.append(Destination::Vanilla, false, 0).unwrap();
        targets.append(Destination::Vanilla, true, 1).unwrap();
        targets.append(Destination::Configured, false, 2).unwrap();

        assert_eq!(targets.path(Destination::Vanilla), Path::new("v"));
        let (configured, vanilla) = targets.into_inner(3).unwrap();
        assert_eq!(configured, b"test-data\n");
        assert_eq!(vanilla, b"test-data\ntest-data\n");
    }

    #[test]
    fn should_report_path_and_count_when_flush_fails() {
        let mut targets = TargetFiles::new(
            "conf.txt",
            BrokenFlush(Vec::new()),
            "van.txt",
            BrokenFlush(Vec::new()),
        );
        let err = targets.append(Destination::Configured, false, 4).unwrap_err();
        match err {
            Error::WriteFailure { path, written, .. } => {
                assert_eq!(path, PathBuf::from("conf.txt"));
                assert_eq!(written, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn should_fail_open_when_parent_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no/such/dir/conf.txt");
        let ok = dir.path().join("van.txt");

        let err = TargetFiles::open(&missing, &ok).err().unwrap();
        assert!(matches!(err, Error::ResourceUnavailable { ref path, .. } if *path == missing));
    }
}
