//! Image set handling: listing candidate files, pairing haystacks with
//! needles by base name, and decoding them into RGB buffers.

pub mod discovery;
pub mod loader;

#[cfg(test)]
pub(crate) mod test_dir;

pub use discovery::{
    IMAGE_EXTENSIONS, MatchPair, base_name, discover_pairs, file_name, list_candidates,
    pair_images,
};
pub use loader::{FsImageLoader, ImageLoader};
