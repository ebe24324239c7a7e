//! JSON body extractor that runs `validator` checks before the handler.

use crate::errors::AppError;
use axum::extract::{FromRequest, Json, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

/// Deserializes the body as `T` and validates it.
///
/// Malformed JSON and failed validation both reject with an [`AppError`],
/// so the client always gets the standard error body.
///
/// ```ignore
/// async fn create(ValidatedJson(input): ValidatedJson<EventInput>) -> impl IntoResponse {
///     // input.validate() already passed
/// }
/// ```
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(data) = Json::<T>::from_request(req, state).await?;
        data.validate()?;
        Ok(ValidatedJson(data))
    }
}
