use crate::track::Track;
use gpx::{Gpx, GpxVersion, TrackSegment, Waypoint};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

pub const GPX_CREATOR: &str = "track-extract";

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GPX error: {0}")]
    Gpx(#[from] gpx::errors::GpxError),
}

/// Writes tracks as a JSON array of `{name, timestamp, points}` objects.
pub fn write_json(tracks: &[Track], output_path: &Path) -> Result<(), OutputError> {
    let mut writer = create(output_path)?;
    serde_json::to_writer_pretty(&mut writer, tracks)?;
    writer.flush()?;
    Ok(())
}

/// Writes all tracks into one GPX 1.1 file, one single-segment `<trk>` each.
pub fn write_gpx(tracks: &[Track], output_path: &Path) -> Result<(), OutputError> {
    let mut writer = create(output_path)?;
    gpx::write(&to_gpx(tracks), &mut writer)?;
    writer.flush()?;
    Ok(())
}

pub fn to_gpx(tracks: &[Track]) -> Gpx {
    let mut gpx: Gpx = Default::default();
    gpx.version = GpxVersion::Gpx11;
    gpx.creator = Some(GPX_CREATOR.to_string());
    gpx.tracks = tracks.iter().map(to_gpx_track).collect();
    gpx
}

fn to_gpx_track(track: &Track) -> gpx::Track {
    let mut segment = TrackSegment::new();
    segment.points = track
        .points
        .iter()
        .map(|point| Waypoint::new((*point).into()))
        .collect();

    let mut gpx_track = gpx::Track::new();
    gpx_track.name = Some(track.name.clone());
    gpx_track.segments.push(segment);
    gpx_track
}

fn create(output_path: &Path) -> Result<BufWriter<File>, OutputError> {
    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(BufWriter::new(File::create(output_path)?))
}
