//! Horoscope endpoints.
//!
//! Each response carries `Cache-Control: max-age` equal to the seconds left
//! in the period the reading belongs to.

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::header,
    response::IntoResponse,
};
use chrono::{Local, NaiveDateTime};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::services::HoroscopeError;
use crate::services::period;

pub const SIGN_NOT_FOUND: &str = "No such zodiac sign exists";
pub const INVALID_DATE_FORMAT: &str = "Please enter day in correct format: YYYY-MM-DD";
pub const UNSUPPORTED_DAY: &str = "Please enter day as TODAY, TOMORROW, YESTERDAY or YYYY-MM-DD";
pub const FUTURE_DATE: &str = "Future date is not supported!";
pub const PARSE_FAILURE: &str = "Something went wrong, please check the URL and the arguments.";

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub sign: Option<String>,
    pub day: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SignQuery {
    pub sign: Option<String>,
}

impl From<HoroscopeError> for ApiError {
    fn from(err: HoroscopeError) -> Self {
        match err {
            HoroscopeError::UnknownSign(_) => Self::not_found(SIGN_NOT_FOUND),
            HoroscopeError::InvalidDateFormat(_) => Self::validation(INVALID_DATE_FORMAT),
            HoroscopeError::UnsupportedDayAlias(_) => Self::validation(UNSUPPORTED_DAY),
            HoroscopeError::FutureDateNotSupported => Self::validation(FUTURE_DATE),
            HoroscopeError::Parse(e) => {
                tracing::warn!(error = %e, "Upstream page did not match the expected layout");
                Self::validation(PARSE_FAILURE)
            }
            HoroscopeError::Upstream(e) => Self::upstream_error(e.to_string()),
            HoroscopeError::Cache(e) => Self::internal(e.to_string()),
        }
    }
}

fn required<'a>(value: Option<&'a String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .map(String::as_str)
        .ok_or_else(|| ApiError::missing_parameter(name))
}

fn query<T>(params: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    params
        .map(|Query(params)| params)
        .map_err(|rejection| ApiError::validation(rejection.body_text()))
}

fn max_age(seconds: i64) -> [(header::HeaderName, String); 1] {
    [(header::CACHE_CONTROL, format!("public, max-age={}", seconds.max(0)))]
}

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// `GET /get-horoscope/daily?sign=<name>&day=<TODAY|TOMORROW|YESTERDAY|YYYY-MM-DD>`
pub async fn get_daily(
    State(state): State<Arc<AppState>>,
    params: Result<Query<DailyQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = query(params)?;
    let sign = required(params.sign.as_ref(), "sign")?;
    let day = required(params.day.as_ref(), "day")?;
    let now = local_now();

    let reading = state.horoscope().daily(sign, day, now).await?;

    Ok((
        max_age(period::seconds_until_end_of_day(now)),
        Json(ApiResponse::success(reading)),
    ))
}

/// `GET /get-horoscope/weekly?sign=<name>`
pub async fn get_weekly(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SignQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = query(params)?;
    let sign = required(params.sign.as_ref(), "sign")?;
    let now = local_now();

    let reading = state.horoscope().weekly(sign, now).await?;

    Ok((
        max_age(period::seconds_until_end_of_week(now)),
        Json(ApiResponse::success(reading)),
    ))
}

/// `GET /get-horoscope/monthly?sign=<name>`
pub async fn get_monthly(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SignQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let params = query(params)?;
    let sign = required(params.sign.as_ref(), "sign")?;
    let now = local_now();

    let reading = state.horoscope().monthly(sign, now).await?;

    Ok((
        max_age(period::seconds_until_end_of_month(now)),
        Json(ApiResponse::success(reading)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::horoscope::FetchError;
    use crate::parser::horoscope::ParseError;
    use axum::http::StatusCode;

    fn status_of(err: HoroscopeError) -> StatusCode {
        ApiError::from(err).into_response().status()
    }

    #[test]
    fn test_error_mapping() {
        assert_eq!(
            status_of(HoroscopeError::UnknownSign("x".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(HoroscopeError::InvalidDateFormat("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(HoroscopeError::FutureDateNotSupported),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(HoroscopeError::Parse(ParseError::MissingContainer)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(HoroscopeError::Upstream(FetchError::Status {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                url: "http://x".into(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_max_age_header() {
        let [(name, value)] = max_age(-5);
        assert_eq!(name, header::CACHE_CONTROL);
        assert_eq!(value, "public, max-age=0");
    }
}
