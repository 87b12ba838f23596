//! Candidate image listing and haystack/needle pairing

use crate::error::{FinderError, FinderResult};
use std::path::{Path, PathBuf};

/// Extensions recognized when scanning a directory (compared case-insensitively)
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// One haystack file and the needle file sharing its base name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchPair {
    pub base_name: String,
    pub haystack: PathBuf,
    pub needle: PathBuf,
}

impl MatchPair {
    pub fn haystack_file_name(&self) -> String {
        file_name(&self.haystack)
    }

    pub fn needle_file_name(&self) -> String {
        file_name(&self.needle)
    }
}

/// File name for reports, falling back to the full path
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// File name without its final extension
pub fn base_name(path: &Path) -> Option<String> {
    path.file_stem().map(|s| s.to_string_lossy().to_string())
}

pub fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// List the images named by `path`
///
/// A file is returned as-is. A directory yields its regular files with an
/// image extension, sorted by file name. Subdirectories are not visited.
pub fn list_candidates(path: &Path) -> FinderResult<Vec<PathBuf>> {
    let metadata =
        std::fs::metadata(path).map_err(|e| FinderError::directory_scan(path, e))?;

    if metadata.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = std::fs::read_dir(path).map_err(|e| FinderError::directory_scan(path, e))?;

    let mut candidates = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| FinderError::directory_scan(path, e))?;
        let entry_path = entry.path();
        if entry_path.is_file() && has_image_extension(&entry_path) {
            candidates.push(entry_path);
        } else {
            log::trace!("Skipping non-image entry {:?}", entry_path);
        }
    }

    candidates.sort_by_key(|p| file_name(p));
    log::debug!("Found {} image(s) in {:?}", candidates.len(), path);
    Ok(candidates)
}

/// Pair haystacks with needles by identical base name
///
/// Haystacks without a needle are skipped. The result is sorted by haystack
/// file name.
pub fn pair_images(haystacks: &[PathBuf], needles: &[PathBuf]) -> Vec<MatchPair> {
    let mut pairs = Vec::new();
    for haystack in haystacks {
        let Some(name) = base_name(haystack) else {
            continue;
        };

        match needles
            .iter()
            .find(|needle| base_name(needle).as_deref() == Some(name.as_str()))
        {
            Some(needle) => pairs.push(MatchPair {
                base_name: name,
                haystack: haystack.clone(),
                needle: needle.clone(),
            }),
            None => log::debug!("No needle named '{}' for {:?}, skipping", name, haystack),
        }
    }

    pairs.sort_by_key(|pair| pair.haystack_file_name());
    pairs
}

/// List both arguments and pair the results
///
/// Two file arguments are paired with each other whatever their names.
pub fn discover_pairs(haystack_path: &Path, needle_path: &Path) -> FinderResult<Vec<MatchPair>> {
    let haystacks = list_candidates(haystack_path)?;
    let needles = list_candidates(needle_path)?;

    let pairs = if haystack_path.is_file() && needle_path.is_file() {
        vec![MatchPair {
            base_name: base_name(haystack_path).unwrap_or_default(),
            haystack: haystack_path.to_path_buf(),
            needle: needle_path.to_path_buf(),
        }]
    } else {
        pair_images(&haystacks, &needles)
    };
    log::info!(
        "🔍 {} haystack(s), {} needle(s), {} pair(s)",
        haystacks.len(),
        needles.len(),
        pairs.len()
    );
    Ok(pairs)
}
