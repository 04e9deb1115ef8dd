use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "untitled";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lng: f64,
}

impl Point {
    pub fn new(lat: f64, lng: f64) -> Self {
        Point { lat, lng }
    }

    /// Parses textual coordinates, rejecting anything that is not a finite number.
    pub fn parse(lat: &str, lng: &str) -> Option<Self> {
        let lat: f64 = lat.trim().parse().ok()?;
        let lng: f64 = lng.trim().parse().ok()?;

        if lat.is_finite() && lng.is_finite() {
            Some(Point { lat, lng })
        } else {
            None
        }
    }
}

impl From<Point> for geo::Point {
    fn from(point: Point) -> Self {
        geo::Point::new(point.lng, point.lat)
    }
}

/// One named, optionally time-stamped, non-empty run of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub name: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub points: Vec<Point>,
}

/// Accumulates the points of one segment, lap, route or FIT file.
///
/// The timestamp is overwritten by every valid time fed to it, so the track
/// ends up carrying the time of the last timed point rather than the first.
/// A builder that never received a point yields no track at all.
#[derive(Debug)]
pub struct TrackBuilder {
    name: String,
    timestamp: Option<DateTime<Utc>>,
    points: Vec<Point>,
}

impl TrackBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        TrackBuilder {
            name: name.into(),
            timestamp: None,
            points: Vec::new(),
        }
    }

    /// Uses `name` unless it is missing or empty.
    pub fn named_or_untitled(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some(name) if !name.is_empty() => TrackBuilder::new(name),
            _ => TrackBuilder::new(UNTITLED),
        }
    }

    /// Seeds the running timestamp, e.g. with the value left over from a
    /// previous segment of the same GPX track.
    pub fn with_timestamp(mut self, timestamp: Option<DateTime<Utc>>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Overwrites the running timestamp if `raw` is a usable time string.
    pub fn record_time(&mut self, raw: &str) {
        if let Some(time) = parse_time(raw) {
            self.timestamp = Some(time);
        }
    }

    pub fn set_timestamp(&mut self, time: DateTime<Utc>) {
        self.timestamp = Some(time);
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamp
    }

    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn finish(self) -> Option<Track> {
        if self.points.is_empty() {
            log::debug!("discarding {:?}: no usable points", self.name);
            return None;
        }

        Some(Track {
            name: self.name,
            timestamp: self.timestamp,
            points: self.points,
        })
    }
}

/// Parses an ISO-8601 time as found in GPX and TCX files.
///
/// Times without an offset are taken as UTC.
pub fn parse_time(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(time) = DateTime::parse_from_rfc3339(raw) {
        return Some(time.with_timezone(&Utc));
    }

    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
