use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::error::ParseActivityTypeError;

/// Free-form annotation attached to a record, e.g. `description`.
pub type Details = BTreeMap<String, String>;

/// Kind of inventory mutation an activity describes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Create,
    Update,
    Delete,
}

impl ActivityType {
    pub const ALL: [ActivityType; 3] = [Self::Create, Self::Update, Self::Delete];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ParseActivityTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseActivityTypeError(s.to_string()))
    }
}

/// One immutable entry of the activity ledger.
///
/// The JSON shape is the one the dashboard has always persisted:
/// camelCase keys, the kind under `type`, and a millisecond UTC timestamp.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub item_id: String,
    pub item_name: String,
    #[serde(default)]
    pub details: Details,
    #[serde(with = "iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub user: String,
}

impl ActivityRecord {
    /// Value of `details["description"]`, when present and non-empty.
    pub fn description(&self) -> Option<&str> {
        self.details
            .get("description")
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }
}

/// `YYYY-MM-DDTHH:MM:SS.mmmZ` on the way out; any RFC 3339 string on the way in.
mod iso_millis {
    use chrono::DateTime;
    use chrono::SecondsFormat;
    use chrono::Utc;
    use serde::Deserialize;
    use serde::Deserializer;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
