use super::{Parser, TCX_ROOT, xml_root};
use crate::error::{ExtractError, Result};
use crate::track::{Point, Track, TrackBuilder};
use crate::xml::{self, one_or_many};
use serde_json::Value;

/**
 * Garmin Training Center files. TCX has no track names, so every lap is
 * named after the file it came from.
 */
pub struct TcxParser;

impl Parser for TcxParser {
    fn parse(&self, file_name: &str, content: &[u8]) -> Result<Vec<Track>> {
        let tcx = xml_root(file_name, content, TCX_ROOT)?;
        extract_tracks(file_name, &tcx)
    }

    fn name(&self) -> &'static str {
        "TCX Parser"
    }
}

/// Walks a decoded `<TrainingCenterDatabase>`, one track per lap.
pub fn extract_tracks(file_name: &str, tcx: &Value) -> Result<Vec<Track>> {
    let Some(activities) = tcx.get("Activities") else {
        return Err(ExtractError::malformed(file_name, "TCX file has no activities"));
    };

    let mut parsed = Vec::new();

    for activity in one_or_many(activities.get("Activity")) {
        let Some(laps) = activity.get("Lap") else {
            log::debug!("{file_name}: skipping activity without laps");
            continue;
        };

        for lap in one_or_many(Some(laps)) {
            let mut builder = TrackBuilder::new(file_name);

            for trackpoint in positioned_trackpoints(lap) {
                if let Some(time) = xml::text(trackpoint.get("Time")) {
                    builder.record_time(time);
                }

                let position = &trackpoint["Position"];
                let latitude = xml::text(position.get("LatitudeDegrees"));
                let longitude = xml::text(position.get("LongitudeDegrees"));

                if let Some(point) = latitude
                    .zip(longitude)
                    .and_then(|(lat, lng)| Point::parse(lat, lng))
                {
                    builder.push(point);
                }
            }

            parsed.extend(builder.finish());
        }
    }

    Ok(parsed)
}

/// Trackpoints of every `<Track>` in a lap that carry a `<Position>`.
///
/// Empty `<Track/>` elements decode to strings and contribute nothing.
fn positioned_trackpoints(lap: &Value) -> impl Iterator<Item = &Value> {
    one_or_many(lap.get("Track"))
        .iter()
        .filter(|track| track.is_object())
        .flat_map(|track| one_or_many(track.get("Trackpoint")))
        .filter(|trackpoint| trackpoint.get("Position").is_some_and(Value::is_object))
}
