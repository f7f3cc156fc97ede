use axum::{
    async_trait,
    extract::{Extension, FromRequestParts},
    http::{request::Parts, StatusCode},
    Json,
};
use devpost_bridge_libs::{
    devpost::{
        client::{DevpostClient, HackathonSource},
        query::{HackathonQuery, StatusFilter, DEFAULT_LIMIT},
    },
    BridgeResponse,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

type HackathonsResponse = (StatusCode, Json<BridgeResponse>);

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq, Default)]
pub struct HackathonQueryParameters {
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
    pub active: Option<bool>,
    pub upcoming: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, Validate, PartialEq, Eq, Default)]
pub struct LimitParameters {
    #[validate(range(min = 1))]
    pub limit: Option<u32>,
}

pub struct ValidatedQuery<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = HackathonsResponse;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let query = parts.uri.query().unwrap_or_default();
        let value: T = serde_urlencoded::from_str(query).map_err(|rejection| {
            tracing::error!("Parsing error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(BridgeResponse::failure(format!(
                    "invalid format query string: [{}]",
                    rejection
                ))),
            )
        })?;

        value.validate().map_err(|rejection| {
            tracing::error!("Validation error: {}", rejection);
            (
                StatusCode::BAD_REQUEST,
                Json(BridgeResponse::failure(
                    format!("Validation error: [{}]", rejection).replace('\n', ", "),
                )),
            )
        })?;

        Ok(ValidatedQuery(value))
    }
}

async fn respond(
    source: &impl HackathonSource,
    limit: Option<u32>,
    status: StatusFilter,
) -> HackathonsResponse {
    let query = HackathonQuery::new(limit.unwrap_or(DEFAULT_LIMIT), status);
    let hackathons = source.hackathons(&query).await;

    (StatusCode::OK, Json(BridgeResponse::success(hackathons)))
}

pub async fn hackathons(
    ValidatedQuery(params): ValidatedQuery<HackathonQueryParameters>,
    Extension(client): Extension<Arc<DevpostClient>>,
) -> HackathonsResponse {
    let status = match StatusFilter::from_flags(
        params.active.unwrap_or(false),
        params.upcoming.unwrap_or(false),
    ) {
        Ok(status) => status,
        Err(e) => {
            tracing::error!("Validation error: {}", e);
            return (StatusCode::BAD_REQUEST, Json(BridgeResponse::failure(e)));
        }
    };

    respond(client.as_ref(), params.limit, status).await
}

pub async fn active_hackathons(
    ValidatedQuery(params): ValidatedQuery<LimitParameters>,
    Extension(client): Extension<Arc<DevpostClient>>,
) -> HackathonsResponse {
    respond(client.as_ref(), params.limit, StatusFilter::Open).await
}

pub async fn upcoming_hackathons(
    ValidatedQuery(params): ValidatedQuery<LimitParameters>,
    Extension(client): Extension<Arc<DevpostClient>>,
) -> HackathonsResponse {
    respond(client.as_ref(), params.limit, StatusFilter::Upcoming).await
}

pub async fn liveness() -> StatusCode {
    StatusCode::OK
}
