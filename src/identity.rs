//! Platform file identity used to tell "same file, more data" apart from
//! "different file at the same path".
//!
//! Identity always comes from an open handle, never from a path lookup, so it
//! cannot race with a rename happening between two calls.
//!
//! Supported platforms: unix (device + inode) and windows (volume serial
//! number + file index). Elsewhere [`SUPPORTED`] is false and rotation
//! detection is disabled.

use std::fs::File;
use std::io;

/// Whether this platform can identify open files.
pub const SUPPORTED: bool = cfg!(any(unix, windows));

/// The identity of an open file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileId {
    device: u64,
    index: u64,
}

impl FileId {
    /// Reads the identity of an open file from its own metadata.
    #[cfg(unix)]
    pub fn of(file: &File) -> io::Result<Self> {
        use std::os::unix::fs::MetadataExt;

        let metadata = file.metadata()?;
        Ok(Self {
            device: metadata.dev(),
            index: metadata.ino(),
        })
    }

    #[cfg(windows)]
    pub fn of(file: &File) -> io::Result<Self> {
        use std::os::windows::io::AsRawHandle;
        use windows_sys::Win32::Storage::FileSystem::{
            BY_HANDLE_FILE_INFORMATION, GetFileInformationByHandle,
        };

        // SAFETY: the handle is owned by `file` and stays open for the call;
        // the structure is plain data and fully written on success.
        let info = unsafe {
            let mut info: BY_HANDLE_FILE_INFORMATION = std::mem::zeroed();
            if GetFileInformationByHandle(file.as_raw_handle() as _, &mut info) == 0 {
                return Err(io::Error::last_os_error());
            }
            info
        };
        Ok(Self {
            device: u64::from(info.dwVolumeSerialNumber),
            index: (u64::from(info.nFileIndexHigh) << 32) | u64::from(info.nFileIndexLow),
        })
    }

    #[cfg(not(any(unix, windows)))]
    pub fn of(_file: &File) -> io::Result<Self> {
        Err(io::Error::from(io::ErrorKind::Unsupported))
    }
}
