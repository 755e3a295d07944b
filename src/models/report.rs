use chrono::{DateTime, FixedOffset, Local};

use super::Position;

/// Wire payload POSTed to the reporting endpoint
///
/// Field names and string-encoded coordinates are dictated by the remote
/// API. `CreatedDate` carries the device-local UTC offset with a colon
/// (`+05:30`, never `+0530`).
#[derive(Debug, serde::Serialize)]
pub struct LocationReport {
    #[serde(rename = "BikeId")]
    pub bike_id: String,
    #[serde(rename = "device_code")]
    pub device_code: String,
    #[serde(rename = "Latitude")]
    pub latitude: String,
    #[serde(rename = "Longitude")]
    pub longitude: String,
    #[serde(rename = "URL")]
    pub url: String,
    #[serde(rename = "filename")]
    pub filename: String,
    #[serde(rename = "total_duration")]
    pub total_duration: String,
    #[serde(rename = "CreatedDate")]
    pub created_date: String,
}

impl LocationReport {
    /// Build a report stamped with the current local time
    pub fn new(bike_id: &str, device_code: &str, position: Position) -> Self {
        Self::with_created_at(bike_id, device_code, position, Local::now().fixed_offset())
    }

    /// Build a report with an explicit creation time
    pub fn with_created_at(
        bike_id: &str,
        device_code: &str,
        position: Position,
        created_at: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            bike_id: bike_id.to_string(),
            device_code: device_code.to_string(),
            latitude: position.latitude.to_string(),
            longitude: position.longitude.to_string(),
            url: String::new(),
            filename: String::new(),
            total_duration: String::new(),
            created_date: created_at.format("%Y-%m-%dT%H:%M:%S%:z").to_string(),
        }
    }
}
