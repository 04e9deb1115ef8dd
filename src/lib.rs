//! Extracts GPS tracks from GPX, TCX and FIT activity files.
//!
//! [`extract_tracks`] is the whole engine: it takes one file's name and bytes
//! and returns the tracks inside, all in the same [`Track`] shape regardless
//! of the source format. It keeps no state between calls and does no I/O, so
//! it can be called from as many threads at once as needed. [`batch`] and
//! [`io`] are the file system side used by the command line tool.

pub mod batch;
pub mod error;
pub mod format;
pub mod io;
pub mod parsers;
pub mod track;
pub mod xml;

pub use error::{ExtractError, Result};
pub use format::Format;
pub use track::{Point, Track, UNTITLED};

/// Extracts every track in `content`, choosing the format from `file_name`.
///
/// A file that parses but holds no usable points gives an empty vector.
pub fn extract_tracks(file_name: &str, content: &[u8]) -> Result<Vec<Track>> {
    let format = Format::from_file_name(file_name)?;
    let parser = parsers::for_format(format);

    log::debug!("{}: running {} for .{}", file_name, parser.name(), format);
    parser.parse(file_name, content)
}
