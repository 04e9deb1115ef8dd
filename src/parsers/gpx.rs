use super::{GPX_ROOT, Parser, xml_root};
use crate::error::{ExtractError, Result};
use crate::track::{Point, Track, TrackBuilder};
use crate::xml::{self, one_or_many};
use serde_json::Value;

/**
 * GPX 1.0 / 1.1 files, see https://www.topografix.com/gpx/1/1 for the schema.
 * Every track segment and every route becomes its own track.
 */
pub struct GpxParser;

impl Parser for GpxParser {
    fn parse(&self, file_name: &str, content: &[u8]) -> Result<Vec<Track>> {
        let gpx = xml_root(file_name, content, GPX_ROOT)?;
        extract_tracks(file_name, &gpx)
    }

    fn name(&self) -> &'static str {
        "GPX Parser"
    }
}

/// Walks a decoded `<gpx>` element. Tracks come first, then routes.
pub fn extract_tracks(file_name: &str, gpx: &Value) -> Result<Vec<Track>> {
    let tracks = gpx.get("trk");
    let routes = gpx.get("rte");

    if tracks.is_none() && routes.is_none() {
        return Err(ExtractError::malformed(
            file_name,
            "GPX file has neither tracks nor routes",
        ));
    }

    let mut parsed = Vec::new();

    for trk in one_or_many(tracks) {
        let name = xml::text(trk.get("name"));

        // carried over from one segment to the next
        let mut timestamp = None;

        for trkseg in one_or_many(trk.get("trkseg")) {
            let mut builder = TrackBuilder::named_or_untitled(name).with_timestamp(timestamp);
            walk_points(&mut builder, one_or_many(trkseg.get("trkpt")));

            timestamp = builder.timestamp();
            parsed.extend(builder.finish());
        }
    }

    for rte in one_or_many(routes) {
        let mut builder = TrackBuilder::named_or_untitled(xml::text(rte.get("name")));
        walk_points(&mut builder, one_or_many(rte.get("rtept")));

        parsed.extend(builder.finish());
    }

    Ok(parsed)
}

fn walk_points(builder: &mut TrackBuilder, points: &[Value]) {
    for point in points {
        if let Some(time) = xml::text(point.get("time")) {
            builder.record_time(time);
        }

        let latitude = xml::attribute(point, "lat");
        let longitude = xml::attribute(point, "lon");

        if let (Some(lat), Some(lon)) = (latitude, longitude) {
            if let Some(point) = Point::parse(lat, lon) {
                builder.push(point);
            }
        }
    }
}
