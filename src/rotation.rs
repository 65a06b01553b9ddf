//! Rotation detection for path-backed sources.

use crate::identity::{self, FileId};
use std::fs::File;
use std::io::{self, Seek, SeekFrom};
use std::path::Path;

/// Outcome of checking the followed path against the open handle.
#[derive(Debug)]
pub(crate) enum Detection {
    /// The path still refers to the open file (or could not be checked).
    Unchanged,
    /// The path now refers to another file, already opened for reading.
    Rotated(File),
}

/// Checks whether `path` now names a different file than `current`.
///
/// The replacement is opened first and both identities are then read from
/// the open handles. Comparing against a path stat instead could race with a
/// second rotation between the stat and the open.
///
/// A failed re-open is treated as "not rotated yet": the file may be between
/// a rename and its recreation.
pub(crate) fn detect(current: &File, path: &Path) -> Detection {
    if !identity::SUPPORTED {
        return Detection::Unchanged;
    }

    let candidate = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "re-open failed, keeping current handle");
            return Detection::Unchanged;
        }
    };

    let current_id = match FileId::of(current) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "current handle is stale");
            return Detection::Rotated(candidate);
        }
    };

    let candidate_id = match FileId::of(&candidate) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "cannot identify replacement");
            return Detection::Unchanged;
        }
    };

    if current_id == candidate_id {
        Detection::Unchanged
    } else {
        Detection::Rotated(candidate)
    }
}

/// Rewinds `file` if it shrank below `observed_len` and below the read
/// position, then records the current size in `observed_len`.
///
/// This catches copy-truncate rotation, where the file keeps its identity
/// but its content is cut to zero. A position past the end that the caller
/// seeked to is left alone as long as the file never got shorter. Returns
/// whether the position was reset.
pub(crate) fn rewind_if_truncated(file: &mut File, observed_len: &mut u64) -> io::Result<bool> {
    let size = file.metadata()?.len();
    let shrank = detect_file_truncation(size, *observed_len);
    *observed_len = size;

    if shrank && file.stream_position()? > size {
        file.seek(SeekFrom::Start(0))?;
        return Ok(true);
    }
    Ok(false)
}

/// Whether bytes were appended to `file` past the read position.
pub(crate) fn has_unread_bytes(file: &mut File) -> bool {
    match (file.stream_position(), file.metadata()) {
        (Ok(position), Ok(metadata)) => metadata.len() > position,
        _ => false,
    }
}

/// Detect if the file was truncated by comparing current size with the last known size
fn detect_file_truncation(current_size: u64, last_size: u64) -> bool {
    current_size < last_size
}
