//! Extract submitted form pairs from urlencoded or multipart bodies.

use crate::error::AppError;
use crate::form::{FileBlob, FormPairs, FormValue};
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
    Form,
};

/// Ordered form pairs of the request body. Multipart file parts become `FormValue::File`.
#[derive(Clone, Debug, Default)]
pub struct FormSubmission(pub FormPairs);

#[async_trait]
impl<S> FromRequest<S> for FormSubmission
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
            .unwrap_or(false);

        if !is_multipart {
            let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            return Ok(FormSubmission(
                pairs.into_iter().map(|(k, v)| (k, FormValue::Text(v))).collect(),
            ));
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let mut pairs = Vec::new();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?
        {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let content_type = field.content_type().map(str::to_string);
                    let bytes = field.bytes().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
                    pairs.push((
                        name,
                        FormValue::File(FileBlob {
                            name: Some(file_name),
                            content_type,
                            bytes: bytes.to_vec(),
                        }),
                    ));
                }
                None => {
                    let text = field.text().await.map_err(|e| AppError::BadRequest(e.body_text()))?;
                    pairs.push((name, FormValue::Text(text)));
                }
            }
        }
        Ok(FormSubmission(pairs))
    }
}
