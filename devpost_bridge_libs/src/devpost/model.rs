use core::fmt;
use serde::{
    de::{self, DeserializeOwned},
    Deserialize, Deserializer,
};
use serde_json::{Number, Value};

/// Top-level body of `GET /api/hackathons`.
///
/// Items are kept untyped so that one malformed entry cannot fail the whole listing.
#[derive(Debug, Deserialize)]
pub struct RawListing {
    pub hackathons: Vec<Value>,
}

/// One upstream item.
///
/// Scalars of an unexpected type are read as absent and fall back to their default.
/// Only a `displayed_location` that is not an object makes the whole item unreadable.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RawHackathon {
    #[serde(default, deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub open_state: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub submission_period_dates: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub time_left_to_submission: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub prize_amount: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub registrations_count: Option<RawCount>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub organization_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub themes: Option<Vec<RawTheme>>,
    #[serde(default, deserialize_with = "object")]
    pub displayed_location: Option<RawLocation>,
    #[serde(default, deserialize_with = "lenient")]
    pub featured: Option<bool>,
}

/// Registration count, printed as sent: `1234`, `-1` and `"1,234"` are all kept.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawCount {
    Number(Number),
    Text(String),
}

impl fmt::Display for RawCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RawCount::Number(number) => write!(f, "{}", number),
            RawCount::Text(text) => write!(f, "{}", text),
        }
    }
}

/// Themes come either as bare names or as `{"id": .., "name": ..}` objects.
#[derive(Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawTheme {
    Name(String),
    Object { name: String },
    Other(Value),
}

impl RawTheme {
    pub fn into_name(self) -> Option<String> {
        match self {
            RawTheme::Name(name) => Some(name),
            RawTheme::Object { name } => Some(name),
            RawTheme::Other(_) => None,
        }
    }
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct RawLocation {
    #[serde(default, deserialize_with = "lenient")]
    pub location: Option<String>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        value @ Value::Object(_) => serde_json::from_value(value)
            .map(Some)
            .map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected an object, found {}",
            other
        ))),
    }
}
