//! Tagged video source references and their resolution.
//!
//! A play request carries a name plus an explicit three-way source type;
//! resolution to a concrete locator happens once, here, before any
//! playback machinery is touched. There is no prefix sniffing: the tag is
//! authoritative.

use std::path::PathBuf;

/// Where a video reference points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// A stream URL, passed to the decoder verbatim.
    Url,
    /// A file under the host's cutscene directory.
    Local,
    /// A file shipped inside the host's packaged assets.
    Packaged,
}

impl SourceType {
    /// Wire tag, as serialized in the play payload.
    pub fn tag(self) -> i32 {
        match self {
            SourceType::Url => 0,
            SourceType::Local => 1,
            SourceType::Packaged => 2,
        }
    }

    pub fn from_tag(tag: i32) -> Option<Self> {
        match tag {
            0 => Some(SourceType::Url),
            1 => Some(SourceType::Local),
            2 => Some(SourceType::Packaged),
            _ => None,
        }
    }
}

/// A resolved, playable source locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaSource {
    pub locator: String,
    pub kind: SourceType,
}

/// Error type for source resolution.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("cutscene resource not found: {0}")]
    NotFound(PathBuf),
}

/// Base directories file-backed sources resolve against.
#[derive(Debug, Clone)]
pub struct SourceDirs {
    pub cutscene_dir: PathBuf,
    pub asset_dir: PathBuf,
}

impl Default for SourceDirs {
    fn default() -> Self {
        Self {
            cutscene_dir: PathBuf::from("config").join("cutscenes"),
            asset_dir: PathBuf::from("assets").join("cutscenes"),
        }
    }
}

/// Resolves a request path into a concrete locator.
///
/// File-backed kinds are checked for existence up front so a missing file
/// fails before any session or thread is created. Stray quote characters
/// are stripped from the incoming name.
pub fn resolve(path: &str, kind: SourceType, dirs: &SourceDirs) -> Result<MediaSource, SourceError> {
    let name = path.replace('"', "");
    match kind {
        SourceType::Url => Ok(MediaSource {
            locator: name,
            kind,
        }),
        SourceType::Local => resolve_file(dirs.cutscene_dir.join(name), kind),
        SourceType::Packaged => resolve_file(dirs.asset_dir.join(name), kind),
    }
}

fn resolve_file(path: PathBuf, kind: SourceType) -> Result<MediaSource, SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path));
    }
    Ok(MediaSource {
        locator: path.to_string_lossy().into_owned(),
        kind,
    })
}
