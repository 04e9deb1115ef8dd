pub mod fit;
pub mod gpx;
pub mod tcx;

use crate::error::{ExtractError, Result};
use crate::format::Format;
use crate::track::Track;
use crate::xml;
use serde_json::Value;

pub const GPX_ROOT: &str = "gpx";
pub const TCX_ROOT: &str = "TrainingCenterDatabase";

// extract Vec<Track> from one file's content
pub trait Parser: Sync {
    fn parse(&self, file_name: &str, content: &[u8]) -> Result<Vec<Track>>;

    fn name(&self) -> &'static str;
}

pub fn for_format(format: Format) -> &'static dyn Parser {
    match format {
        Format::Gpx => &gpx::GpxParser,
        Format::Tcx => &tcx::TcxParser,
        Format::Fit => &fit::FitParser,
    }
}

/// Decodes an XML file and returns the subtree under `root`.
///
/// A document that decodes fine but has a different root element belongs to
/// another format and is reported as [`ExtractError::InvalidFileType`].
fn xml_root(file_name: &str, content: &[u8], root: &str) -> Result<Value> {
    let text = std::str::from_utf8(content).map_err(|e| ExtractError::decode(file_name, e))?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut tree = xml::decode(text).map_err(|e| ExtractError::decode(file_name, e))?;

    match tree.get_mut(root) {
        Some(subtree) => Ok(subtree.take()),
        None => Err(ExtractError::InvalidFileType {
            file: file_name.to_string(),
        }),
    }
}
