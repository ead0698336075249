use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;

use async_trait::async_trait;
use axum::extract::FromRequest;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum_core::body::Body;
use axum_core::extract::Request;
use axum_core::response::Response;
use bytes::Bytes;
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Transport-level error envelope. Domain-level outcomes never go through
/// here: handlers report those as 200-status bodies with an `error` key.
#[derive(Error, Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

#[derive(Serialize)]
struct ApiErrorWrapper {
    pub error: String,
}

impl ApiError {
    pub fn bad_request(err: impl ToString) -> Self {
        ApiError::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn not_found(err: impl ToString) -> Self {
        ApiError::new(StatusCode::NOT_FOUND, err)
    }

    pub fn internal(err: impl ToString) -> Self {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn new(status: StatusCode, message: impl ToString) -> Self {
        Self {
            status,
            message: message.to_string(),
        }
    }

    pub fn append_inner_message(self, inner: String) -> Self {
        Self {
            status: self.status,
            message: format!("{}: {}", self.message, inner),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        log::debug!("ApiError: {:?}", self);
        (self.status, Json(ApiErrorWrapper {
            error: self.message,
        }))
            .into_response()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(v) => Ok(Json(v.0)),
            Err(err) => {
                let mut api_err = ApiError::bad_request(err.to_string());
                if let Some(inner) = err.source() {
                    api_err = api_err.append_inner_message(inner.to_string());
                }

                Err(api_err)
            }
        }
    }
}

impl<T> IntoResponse for Json<T>
where T: Serialize
{
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

pub async fn print_request_response(
    req: Request,
    next: Next,
) -> std::result::Result<impl IntoResponse, (StatusCode, String)> {
    tracing::debug!("{} {}", req.method(), req.uri());
    let (parts, body) = req.into_parts();
    let bytes = buffer_and_print("request", body).await?;
    let req = Request::from_parts(parts, Body::from(bytes));

    let res = next.run(req).await;

    Ok(res)
}

async fn buffer_and_print<B>(
    direction: &str,
    body: B,
) -> std::result::Result<Bytes, (StatusCode, String)>
where
    B: axum::body::HttpBody<Data = Bytes>,
    B::Error: std::fmt::Display,
{
    let bytes = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(err) => {
            return Err((
                StatusCode::BAD_REQUEST,
                format!("failed to read {direction} body: {err}"),
            ));
        }
    };

    if let Ok(body) = std::str::from_utf8(&bytes) {
        tracing::debug!("{direction} body = {body}");
    }

    Ok(bytes)
}
