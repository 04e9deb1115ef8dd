use crate::error::{ExtractError, Result};
use std::fmt;

/// The file families the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Gpx,
    Tcx,
    Fit,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Gpx, Format::Tcx, Format::Fit];

    /// Picks the format from whatever follows the last `.` in `file_name`.
    pub fn from_file_name(file_name: &str) -> Result<Self> {
        let tag = extension(file_name);

        match tag.as_str() {
            "gpx" => Ok(Format::Gpx),
            "tcx" => Ok(Format::Tcx),
            "fit" => Ok(Format::Fit),
            _ => Err(ExtractError::UnsupportedFormat {
                file: file_name.to_string(),
                format: tag,
            }),
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Format::Gpx => "gpx",
            Format::Tcx => "tcx",
            Format::Fit => "fit",
        }
    }

    /// Whether files of this format are XML text rather than binary.
    pub fn is_xml(self) -> bool {
        matches!(self, Format::Gpx | Format::Tcx)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Lower-cased text after the last `.`, or an empty string without one.
fn extension(file_name: &str) -> String {
    match file_name.rsplit_once('.') {
        Some((_, ext)) => ext.to_lowercase(),
        None => String::new(),
    }
}
