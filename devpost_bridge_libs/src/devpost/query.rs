use crate::api::ToQueryParameter;
use crate::devpost::client::DevpostError;
use core::fmt;

pub const DEFAULT_LIMIT: u32 = 20;

/// Filter on the `open_state` of a hackathon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    Any,
    Open,
    Upcoming,
}

impl StatusFilter {
    /// `active` and `upcoming` are mutually exclusive. Setting both is rejected.
    pub fn from_flags(active: bool, upcoming: bool) -> Result<Self, DevpostError> {
        match (active, upcoming) {
            (false, false) => Ok(StatusFilter::Any),
            (true, false) => Ok(StatusFilter::Open),
            (false, true) => Ok(StatusFilter::Upcoming),
            (true, true) => Err(DevpostError::ConflictingFilters),
        }
    }

    /// Value of the `open_state[]` parameter, `None` when no filter applies.
    pub fn open_state(&self) -> Option<&'static str> {
        match self {
            StatusFilter::Any => None,
            StatusFilter::Open => Some("open"),
            StatusFilter::Upcoming => Some("upcoming"),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StatusFilter::Any => write!(f, "any"),
            StatusFilter::Open => write!(f, "open"),
            StatusFilter::Upcoming => write!(f, "upcoming"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HackathonQuery {
    pub limit: u32,
    pub status: StatusFilter,
}

impl HackathonQuery {
    pub fn new(limit: u32, status: StatusFilter) -> Self {
        Self { limit, status }
    }
}

impl Default for HackathonQuery {
    fn default() -> Self {
        Self::new(DEFAULT_LIMIT, StatusFilter::Any)
    }
}

impl ToQueryParameter for HackathonQuery {
    fn to_query(&self) -> Vec<(String, String)> {
        // Only the first page is ever requested.
        let mut params = vec![
            (String::from("page"), String::from("1")),
            (String::from("per_page"), self.limit.to_string()),
        ];
        if let Some(state) = self.status.open_state() {
            params.push((String::from("open_state[]"), String::from(state)));
        }
        params
    }
}
