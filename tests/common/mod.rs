#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z).
pub const FIT_EPOCH: i64 = 631_065_600;

const RECORD: u16 = 20;
const FILE_ID: u16 = 0;

const ENUM: u8 = 0x00;
const SINT32: u8 = 0x85;
const UINT32: u8 = 0x86;

const TIMESTAMP: u8 = 253;
const POSITION_LAT: u8 = 0;
const POSITION_LONG: u8 = 1;

const LOCAL_FULL: u8 = 0;
const LOCAL_TIME: u8 = 1;
const LOCAL_POSITION: u8 = 2;
const LOCAL_FILE_ID: u8 = 3;

/// Builds small FIT activity files.
///
/// Every data message kind gets its own local definition up front, so records
/// can carry a position, a timestamp, or both.
pub struct FitBuilder {
    data: Vec<u8>,
}

impl FitBuilder {
    pub fn new() -> Self {
        let mut builder = FitBuilder { data: Vec::new() };
        builder.define(LOCAL_FILE_ID, FILE_ID, &[(0, 1, ENUM)]);
        builder.define(
            LOCAL_FULL,
            RECORD,
            &[(TIMESTAMP, 4, UINT32), (POSITION_LAT, 4, SINT32), (POSITION_LONG, 4, SINT32)],
        );
        builder.define(LOCAL_TIME, RECORD, &[(TIMESTAMP, 4, UINT32)]);
        builder.define(
            LOCAL_POSITION,
            RECORD,
            &[(POSITION_LAT, 4, SINT32), (POSITION_LONG, 4, SINT32)],
        );
        builder
    }

    /// A file_id message declaring an activity file.
    pub fn file_id(mut self) -> Self {
        self.data.push(LOCAL_FILE_ID);
        self.data.push(4);
        self
    }

    pub fn record(mut self, time: DateTime<Utc>, lat: f64, lng: f64) -> Self {
        self.data.push(LOCAL_FULL);
        self.push_time(time);
        self.push_position(lat, lng);
        self
    }

    pub fn time_only(mut self, time: DateTime<Utc>) -> Self {
        self.data.push(LOCAL_TIME);
        self.push_time(time);
        self
    }

    pub fn position_only(mut self, lat: f64, lng: f64) -> Self {
        self.data.push(LOCAL_POSITION);
        self.push_position(lat, lng);
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut file = Vec::with_capacity(self.data.len() + 16);
        file.push(14);
        file.push(0x10);
        file.extend_from_slice(&2093u16.to_le_bytes());
        file.extend_from_slice(&(self.data.len() as u32).to_le_bytes());
        file.extend_from_slice(b".FIT");
        let header_crc = crc(&file);
        file.extend_from_slice(&header_crc.to_le_bytes());

        file.extend_from_slice(&self.data);
        let file_crc = crc(&file);
        file.extend_from_slice(&file_crc.to_le_bytes());
        file
    }

    fn define(&mut self, local: u8, global: u16, fields: &[(u8, u8, u8)]) {
        self.data.push(0x40 | local);
        self.data.push(0); // reserved
        self.data.push(0); // little endian
        self.data.extend_from_slice(&global.to_le_bytes());
        self.data.push(fields.len() as u8);
        for &(number, size, base_type) in fields {
            self.data.extend_from_slice(&[number, size, base_type]);
        }
    }

    fn push_time(&mut self, time: DateTime<Utc>) {
        let fit_time = (time.timestamp() - FIT_EPOCH) as u32;
        self.data.extend_from_slice(&fit_time.to_le_bytes());
    }

    fn push_position(&mut self, lat: f64, lng: f64) {
        self.data.extend_from_slice(&semicircles(lat).to_le_bytes());
        self.data.extend_from_slice(&semicircles(lng).to_le_bytes());
    }
}

pub fn semicircles(degrees: f64) -> i32 {
    (degrees * (2_147_483_648.0 / 180.0)).round() as i32
}

fn crc(bytes: &[u8]) -> u16 {
    const TABLE: [u16; 16] = [
        0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
        0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
    ];

    bytes.iter().fold(0u16, |mut crc, &byte| {
        let tmp = TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc = crc ^ tmp ^ TABLE[(byte & 0xF) as usize];

        let tmp = TABLE[(crc & 0xF) as usize];
        crc = (crc >> 4) & 0x0FFF;
        crc ^ tmp ^ TABLE[((byte >> 4) & 0xF) as usize]
    })
}

pub fn at(hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2022, 6, 1, hour, min, sec).unwrap()
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "{actual} is not close to {expected}"
    );
}

pub const MINIMAL_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="test" xmlns="http://www.topografix.com/GPX/1/1">
  <trk>
    <trkseg>
      <trkpt lat="1" lon="2"></trkpt>
      <trkpt lat="3" lon="4"></trkpt>
    </trkseg>
  </trk>
</gpx>
"#;

pub const RIDE_GPX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gpx version="1.1" creator="StravaGPX" xmlns="http://www.topografix.com/GPX/1/1">
  <metadata><time>2022-06-01T07:00:00Z</time></metadata>
  <trk>
    <name>Morning Ride</name>
    <type>1</type>
    <trkseg>
      <trkpt lat="47.3769" lon="8.5417"><ele>408.0</ele><time>2022-06-01T07:00:00Z</time></trkpt>
      <trkpt lat="47.3770" lon="8.5420"><ele>409.0</ele><time>2022-06-01T07:00:05Z</time></trkpt>
      <trkpt lat="47.3772" lon="8.5425"><ele>410.0</ele><time>2022-06-01T07:00:10Z</time></trkpt>
    </trkseg>
    <trkseg>
      <trkpt lat="47.3800" lon="8.5500"><time>2022-06-01T07:30:00Z</time></trkpt>
    </trkseg>
  </trk>
  <rte>
    <name></name>
    <rtept lat="47.0" lon="8.0"/>
    <rtept lat="47.1" lon="8.1"/>
  </rte>
</gpx>
"#;

pub const RUN_TCX: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<TrainingCenterDatabase xmlns="http://www.garmin.com/xmlschemas/TrainingCenterDatabase/v2">
  <Activities>
    <Activity Sport="Running">
      <Id>2022-06-01T06:00:00Z</Id>
      <Lap StartTime="2022-06-01T06:00:00Z">
        <TotalTimeSeconds>600</TotalTimeSeconds>
        <Track>
          <Trackpoint>
            <Time>2022-06-01T06:00:00Z</Time>
            <Position><LatitudeDegrees>46.5</LatitudeDegrees><LongitudeDegrees>6.6</LongitudeDegrees></Position>
            <AltitudeMeters>372.0</AltitudeMeters>
          </Trackpoint>
          <Trackpoint>
            <Time>2022-06-01T06:00:01Z</Time>
            <HeartRateBpm><Value>130</Value></HeartRateBpm>
          </Trackpoint>
          <Trackpoint>
            <Time>2022-06-01T06:05:00Z</Time>
            <Position><LatitudeDegrees>46.51</LatitudeDegrees><LongitudeDegrees>6.61</LongitudeDegrees></Position>
          </Trackpoint>
        </Track>
      </Lap>
      <Lap StartTime="2022-06-01T06:10:00Z">
        <Track>
          <Trackpoint>
            <Time>2022-06-01T06:10:00Z</Time>
            <Position><LatitudeDegrees>46.52</LatitudeDegrees><LongitudeDegrees>6.62</LongitudeDegrees></Position>
          </Trackpoint>
        </Track>
      </Lap>
    </Activity>
  </Activities>
</TrainingCenterDatabase>
"#;
