use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, RecvError};
use std::sync::{Arc, Mutex};
use std::thread;

use walkdir::WalkDir;

use crate::error::{BatchError, FormatResult};
use crate::FeatureFormatter;

/// Fixed pool size; one hung external command blocks one worker.
const WORKER_COUNT: usize = 10;

/// Recursively collect the regular files beneath `root` whose extension is in
/// `extensions`, in sorted order. A missing root fails before any transform
/// starts.
pub fn discover_files(root: &Path, extensions: &[String]) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|err| io::Error::new(io::ErrorKind::Other, err))?;
        if !entry.file_type().is_file() {
            continue;
        }

        let matches = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| extensions.iter().any(|candidate| candidate == ext))
            .unwrap_or(false);

        if matches {
            files.push(entry.into_path());
        }
    }

    files.sort();
    Ok(files)
}

impl FeatureFormatter {
    /// Transform `path` in place. A file is rewritten directly; a directory
    /// is discovered and fanned out across the worker pool. Every per-file
    /// failure is collected under its path; an empty list means full success.
    pub fn transform_and_replace(&self, path: &Path, extensions: &[String]) -> Vec<BatchError> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) => metadata,
            Err(err) => return vec![labeled(path, err.into())],
        };

        if metadata.is_dir() {
            let files = match discover_files(path, extensions) {
                Ok(files) => files,
                Err(err) => return vec![labeled(path, err.into())],
            };
            return self.replace_files(files);
        }

        if metadata.is_file() {
            return match self.replace_file(path) {
                Ok(()) => Vec::new(),
                Err(err) => vec![labeled(path, err)],
            };
        }

        vec![labeled(
            path,
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "path is neither a file nor a directory",
            )
            .into(),
        )]
    }

    /// Fan `files` out across a fixed pool of workers fed by a rendezvous
    /// queue: the sending side blocks until a worker is ready, so no work
    /// piles up in flight. Workers report `(path, result)` pairs on a second
    /// channel folded into the error list on the calling thread.
    fn replace_files(&self, files: Vec<PathBuf>) -> Vec<BatchError> {
        let (job_tx, job_rx) = mpsc::sync_channel::<PathBuf>(0);
        let job_rx = Arc::new(Mutex::new(job_rx));
        let (result_tx, result_rx) = mpsc::channel();

        thread::scope(|scope| {
            for _ in 0..WORKER_COUNT {
                let job_rx = Arc::clone(&job_rx);
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    while let Ok(path) = next_job(&job_rx) {
                        let result = self.replace_file(&path);
                        if result_tx.send((path, result)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_tx);

            for file in files {
                if job_tx.send(file).is_err() {
                    break;
                }
            }
            drop(job_tx);

            result_rx
                .iter()
                .filter_map(|(path, result)| {
                    result.err().map(|source| BatchError { path, source })
                })
                .collect()
        })
    }

    /// Truncate-and-write replacement. A failed write can leave the file
    /// empty; that limitation is accepted, not a transactional guarantee.
    fn replace_file(&self, path: &Path) -> FormatResult<()> {
        let formatted = self.transform_file(path)?;
        let mut file = File::create(path)?;
        file.write_all(formatted.as_bytes())?;
        Ok(())
    }
}

fn next_job(queue: &Mutex<Receiver<PathBuf>>) -> Result<PathBuf, RecvError> {
    match queue.lock() {
        Ok(guard) => guard.recv(),
        Err(_) => Err(RecvError),
    }
}

fn labeled(path: &Path, source: crate::error::FormatError) -> BatchError {
    BatchError {
        path: path.to_path_buf(),
        source,
    }
}
