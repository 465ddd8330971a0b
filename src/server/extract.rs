//! Request body extractor that reports malformed JSON as a [`LedgerError`]

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::core::error::LedgerError;

/// Drop-in for `axum::Json` on request bodies
///
/// Bodies that fail to parse are rejected with a `VALIDATION_ERROR`
/// [`ErrorResponse`](crate::core::error::ErrorResponse) instead of axum's
/// plain-text rejection.
pub struct LedgerJson<T>(pub T);

impl<S, T> FromRequest<S> for LedgerJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = LedgerError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(Self(value))
    }
}
