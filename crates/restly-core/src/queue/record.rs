use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// One line of the queue file.
///
/// Field order is the on-disk key order: `ts`, `action`, `params`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Moment the command was issued, whole seconds, rendered as `+00:00`.
    #[serde(serialize_with = "serialize_ts")]
    pub ts: DateTime<Utc>,
    /// Action tag.
    pub action: String,
    /// Action arguments. Absent from the JSON when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Map<String, Value>>,
}

impl CommandRecord {
    /// Serialize as a single JSON line, newline included.
    ///
    /// serde_json escapes control characters inside strings, so the only
    /// `\n` in the output is the terminator.
    pub fn to_line(&self) -> serde_json::Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

fn serialize_ts<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, false))
}
