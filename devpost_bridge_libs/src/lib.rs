pub mod api;
pub mod devpost;
pub mod normalize;

pub use api::{BridgeResponse, SavedHackathons, ToQueryParameter};
pub use normalize::HackathonRecord;
