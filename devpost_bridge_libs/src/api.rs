use crate::normalize::HackathonRecord;
use serde::{Deserialize, Serialize};

pub trait ToQueryParameter {
    fn to_query(&self) -> Vec<(String, String)>;
}

/// Envelope written by the `bridge` command and returned by the HTTP routes.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum BridgeResponse {
    Success {
        success: bool,
        hackathons: Vec<HackathonRecord>,
        count: usize,
    },
    Failure {
        success: bool,
        error: String,
    },
}

impl BridgeResponse {
    pub fn success(hackathons: Vec<HackathonRecord>) -> Self {
        let count = hackathons.len();
        BridgeResponse::Success {
            success: true,
            hackathons,
            count,
        }
    }

    pub fn failure(error: impl ToString) -> Self {
        BridgeResponse::Failure {
            success: false,
            error: error.to_string(),
        }
    }
}

/// File artifact of the `scrape` command.
#[derive(Debug, Serialize, Deserialize)]
pub struct SavedHackathons {
    pub hackathons: Vec<HackathonRecord>,
}
