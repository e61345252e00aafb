use std::fs;
use std::path::{Path, PathBuf};

use lofty::file::TaggedFileExt;
use lofty::picture::MimeType;
use lofty::tag::{ItemKey, Tag};
use tracing::debug;

/// Construction-time description of a track. Everything optional falls back
/// to a default when the track is added to the library.
pub struct TrackMeta {
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub cover: Option<PathBuf>,
    pub lyrics: Option<String>,
}

impl TrackMeta {
    /// Bare metadata: title from the file stem, everything else defaulted.
    pub fn new(path: PathBuf) -> Self {
        let title = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("UNKNOWN")
            .to_string();

        Self {
            path,
            title,
            artist: None,
            cover: None,
            lyrics: None,
        }
    }

    /// Metadata read from the file itself: title, artist and lyrics from
    /// the primary tag, cover art from the first embedded picture (exported
    /// to the cache directory) or a sidecar image next to the file.
    pub fn from_path(path: &Path) -> Self {
        let mut meta = Self::new(path.to_path_buf());

        if let Ok(tagged) = lofty::read_from_path(path) {
            if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
                if let Some(v) = tag.get_string(&ItemKey::TrackTitle) {
                    if !v.trim().is_empty() {
                        meta.title = v.to_string();
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::TrackArtist) {
                    let v = v.trim();
                    if !v.is_empty() {
                        meta.artist = Some(v.to_string());
                    }
                }
                if let Some(v) = tag.get_string(&ItemKey::Lyrics) {
                    let v = v.trim();
                    if !v.is_empty() {
                        meta.lyrics = Some(v.to_string());
                    }
                }
                meta.cover = export_embedded_cover(path, tag);
            }
        }

        if meta.cover.is_none() {
            meta.cover = sidecar_cover(path);
        }

        meta
    }
}

/// Write the first embedded picture out to the cache directory so the cover
/// loader can treat every cover as a file on disk.
fn export_embedded_cover(path: &Path, tag: &Tag) -> Option<PathBuf> {
    let picture = tag.pictures().first()?;

    let dir = dirs::cache_dir()?.join("wurli").join("covers");
    fs::create_dir_all(&dir).ok()?;

    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("track");
    let ext = match picture.mime_type() {
        Some(MimeType::Png) => "png",
        Some(MimeType::Jpeg) => "jpg",
        // The loader sniffs the actual format, the extension is cosmetic.
        _ => "img",
    };
    let out = dir.join(format!("{stem}.{ext}"));

    if fs::write(&out, picture.data()).is_err() {
        debug!("could not cache embedded cover for {}", path.display());
        return None;
    }
    Some(out)
}

/// Look for a conventional cover image in the track's directory.
pub(super) fn sidecar_cover(path: &Path) -> Option<PathBuf> {
    let dir = path.parent()?;
    for name in ["cover", "folder", "front"] {
        for ext in ["jpg", "jpeg", "png"] {
            let candidate = dir.join(format!("{name}.{ext}"));
            if candidate.is_file() {
                return Some(candidate);
            }
        }
    }
    None
}
