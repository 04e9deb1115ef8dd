use super::Parser;
use crate::error::{ExtractError, Result};
use crate::track::{Point, Track, TrackBuilder};
use chrono::{DateTime, Utc};
use fitparser::de::{DecodeOption, from_bytes_with_options};
use fitparser::profile::MesgNum;
use fitparser::{FitDataRecord, Value};
use std::collections::HashSet;

/**
 * Garmin FIT activity files. All `record` messages of a file are folded
 * into a single track named after the file.
 */
pub struct FitParser;

impl Parser for FitParser {
    fn parse(&self, file_name: &str, content: &[u8]) -> Result<Vec<Track>> {
        let records = decode_records(file_name, content)?;
        extract_tracks(file_name, &records)
    }

    fn name(&self) -> &'static str {
        "FIT Parser"
    }
}

/// Decodes `content` as a flat list of `record` messages.
///
/// CRC checks are skipped so files with a damaged checksum still load.
pub fn decode_records(file_name: &str, content: &[u8]) -> Result<Vec<FitDataRecord>> {
    let options: HashSet<DecodeOption> = [
        DecodeOption::SkipHeaderCrcValidation,
        DecodeOption::SkipDataCrcValidation,
    ]
    .into_iter()
    .collect();

    let messages =
        from_bytes_with_options(content, &options).map_err(|e| ExtractError::decode(file_name, e))?;

    Ok(messages
        .into_iter()
        .filter(|message| message.kind() == MesgNum::Record)
        .collect())
}

pub fn extract_tracks(file_name: &str, records: &[FitDataRecord]) -> Result<Vec<Track>> {
    if records.is_empty() {
        return Err(ExtractError::malformed(file_name, "FIT file has no records"));
    }

    let mut builder = TrackBuilder::new(file_name);

    for record in records {
        let sample = read_record(record);

        if let Some(point) = sample.point {
            builder.push(point);
        }
        if let Some(time) = sample.time {
            builder.set_timestamp(time);
        }
    }

    Ok(builder.finish().into_iter().collect())
}

#[derive(Debug)]
struct Sample {
    point: Option<Point>,
    time: Option<DateTime<Utc>>,
}

fn read_record(record: &FitDataRecord) -> Sample {
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut time = None;

    for field in record.fields() {
        match field.name() {
            "position_lat" => latitude = extract_coordinate_value(field.value()),
            "position_long" => longitude = extract_coordinate_value(field.value()),
            "timestamp" => {
                if let Value::Timestamp(ts) = field.value() {
                    time = Some(ts.with_timezone(&Utc));
                }
            }
            _ => {} // ignore other fields
        }
    }

    let point = match (latitude, longitude) {
        (Some(lat), Some(lng)) => Some(Point::new(
            semicircles_to_degrees(lat),
            semicircles_to_degrees(lng),
        )),
        _ => None,
    };

    Sample { point, time }
}

pub fn semicircles_to_degrees(semicircles: f64) -> f64 {
    semicircles * (180.0 / 2_147_483_648.0)
}

fn extract_coordinate_value(value: &Value) -> Option<f64> {
    match value {
        Value::SInt32(v) => Some(*v as f64),
        Value::UInt32(v) => Some(*v as f64),
        Value::SInt16(v) => Some(*v as f64),
        Value::UInt16(v) => Some(*v as f64),
        Value::SInt8(v) => Some(*v as f64),
        Value::UInt8(v) => Some(*v as f64),
        Value::Float32(v) => Some(*v as f64),
        Value::Float64(v) => Some(*v),
        _ => None,
    }
}
