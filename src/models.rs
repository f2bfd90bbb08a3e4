use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ClipError;

/// A start or end offset as sent by the caller.
///
/// Rendered verbatim into the section selector, so `10`, `10.5` and
/// `"1:30"` all reach yt-dlp exactly as written.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum TimeOffset {
    Seconds(serde_json::Number),
    Text(String),
}

impl fmt::Display for TimeOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeOffset::Seconds(n) => write!(f, "{n}"),
            TimeOffset::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClipRequest {
    pub video_id: Option<String>,
    pub start_time: Option<TimeOffset>,
    pub end_time: Option<TimeOffset>,
    pub clip_id: Option<String>,
}

/// A request that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipSpec {
    pub video_id: String,
    pub start: TimeOffset,
    pub end: TimeOffset,
    pub clip_id: String,
}

impl ClipRequest {
    /// Parses a request body, which must be a JSON object.
    ///
    /// Anything else is an unclassified failure rather than a caller error,
    /// including arrays that serde would otherwise map onto the fields by
    /// position.
    pub fn from_json(body: &[u8]) -> Result<Self, ClipError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|e| ClipError::Unclassified(e.to_string()))?;
        let serde_json::Value::Object(fields) = value else {
            return Err(ClipError::Unclassified(
                "request body must be a JSON object".to_string(),
            ));
        };
        serde_json::from_value(serde_json::Value::Object(fields))
            .map_err(|e| ClipError::Unclassified(e.to_string()))
    }

    /// Checks that all four fields are present.
    ///
    /// Empty identifiers count as missing. Offsets are not range checked
    /// and their ordering is left to the extraction tool.
    pub fn validate(self) -> Result<ClipSpec, ClipError> {
        let video_id = self.video_id.filter(|v| !v.is_empty());
        let clip_id = self.clip_id.filter(|c| !c.is_empty());

        let (Some(video_id), Some(start), Some(end), Some(clip_id)) =
            (video_id, self.start_time, self.end_time, clip_id)
        else {
            return Err(ClipError::MissingParameter);
        };

        // A separator would let the id escape the workspace or nest the key
        if clip_id.contains(['/', '\\']) {
            return Err(ClipError::InvalidClipId(clip_id));
        }

        Ok(ClipSpec {
            video_id,
            start,
            end,
            clip_id,
        })
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClipResult {
    pub success: bool,
    pub video_url: String,
    pub thumbnail_url: String,
}

impl ClipResult {
    pub fn completed(video_url: String, thumbnail_url: String) -> Self {
        Self {
            success: true,
            video_url,
            thumbnail_url,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct HealthStatus {
    pub status: &'static str,
}
