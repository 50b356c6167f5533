//! What `status` prints: the playback state, plus the current track when
//! something is loaded.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::bus::Value;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub service: String,
    /// `Playing`, `Paused` or `Stopped`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<TrackInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BTreeMap<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackInfo {
    pub title: Option<String>,
    pub artists: Vec<String>,
    pub position_us: Option<i64>,
    /// Absent for live streams
    pub length_us: Option<i64>,
}

impl StatusReport {
    pub fn new(service: &str, status: String) -> Self {
        StatusReport {
            service: service.to_string(),
            status,
            track: None,
            metadata: None,
        }
    }

    /// Only playing or paused players have a meaningful current track
    pub fn has_track(&self) -> bool {
        self.status == "Playing" || self.status == "Paused"
    }

    pub fn with_metadata(
        mut self,
        metadata: BTreeMap<String, Value>,
        position: Option<i64>,
    ) -> Self {
        let title = metadata
            .get("xesam:title")
            .or_else(|| metadata.get("xesam:url"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let artists = metadata
            .get("xesam:artist")
            .and_then(Value::as_list)
            .map(|list| {
                list.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let length_us = metadata
            .get("mpris:length")
            .and_then(Value::as_i64)
            .filter(|length| *length > 0);

        self.track = Some(TrackInfo {
            title,
            artists,
            position_us: position,
            length_us,
        });
        self.metadata = Some(metadata);
        self
    }

    /// One summary line, then the raw metadata when `verbose` is set.
    pub fn write_human<W: Write>(&self, out: &mut W, verbose: bool) -> Result<()> {
        let track = match &self.track {
            Some(track) => track,
            None => {
                writeln!(out, "{}", self.status)?;
                return Ok(());
            }
        };

        let title = track.title.as_deref().unwrap_or("[Unknown]");
        let artist = if track.artists.is_empty() {
            "[Unknown]".to_string()
        } else {
            track.artists.join(", ")
        };

        write!(out, "{}: \"{}\" by {}", self.status, title, artist)?;
        if let (Some(position), Some(length)) = (track.position_us, track.length_us) {
            write!(
                out,
                " ({}/{})",
                track_length_string(position),
                track_length_string(length)
            )?;
        }
        writeln!(out)?;

        if verbose {
            if let Some(metadata) = &self.metadata {
                writeln!(out, "Raw metadata listing:")?;
                for (key, value) in metadata {
                    writeln!(out, "  {}\t= {}", key, value)?;
                }
            }
        }
        Ok(())
    }
}

/// Formats a duration in microseconds as `M:SS`, `M:SS.mmm` or `M:SS.mmmuuu`,
/// using only as much precision as the value carries.
pub fn track_length_string(length_us: i64) -> String {
    let length_us = length_us.max(0);
    let micros = length_us % 1000;
    let millis = (length_us / 1000) % 1000;
    let total_secs = length_us / 1_000_000;
    let (minutes, seconds) = (total_secs / 60, total_secs % 60);

    if micros != 0 {
        format!("{}:{:02}.{:03}{:03}", minutes, seconds, millis, micros)
    } else if millis != 0 {
        format!("{}:{:02}.{:03}", minutes, seconds, millis)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}
