use crate::Error;
use axum::{
    async_trait,
    body::Bytes,
    extract::{
        Form, FromRequest, Multipart, Request,
        multipart::{MultipartError, MultipartRejection},
        rejection::{BytesRejection, FormRejection},
    },
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Request body decoded according to its `Content-Type`:
/// `application/x-www-form-urlencoded` and `multipart/form-data` bodies as
/// forms, everything else as a JSON object.
///
/// Unlike `axum::Json`, a missing or foreign `Content-Type` is not an error:
/// the body itself decides whether the request is well formed.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    Json,
    Form,
    Multipart,
}

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(req.headers()) {
            BodyKind::Form => {
                let Form(value) = Form::<T>::from_request(req, state)
                    .await
                    .map_err(form_rejection)?;
                Ok(Payload(value))
            }
            BodyKind::Multipart => {
                let multipart = Multipart::from_request(req, state)
                    .await
                    .map_err(multipart_rejection)?;
                decode_multipart(multipart).await.map(Payload)
            }
            BodyKind::Json => {
                let body = Bytes::from_request(req, state)
                    .await
                    .map_err(bytes_rejection)?;
                decode_json(&body).map(Payload)
            }
        }
    }
}

/// Decodes a JSON body whose top-level value must be an object.
pub fn decode_json<T: DeserializeOwned>(body: &[u8]) -> Result<T, Error> {
    match body.iter().find(|b| !b.is_ascii_whitespace()) {
        None => Err(Error::malformed("empty body")),
        Some(b'{') => serde_json::from_slice(body).map_err(|e| Error::malformed(e.to_string())),
        Some(_) => Err(Error::malformed("expected a JSON object")),
    }
}

/// Collects the text fields of a multipart body into `T`. File parts are
/// skipped and the first value of a repeated field wins.
async fn decode_multipart<T: DeserializeOwned>(mut multipart: Multipart) -> Result<T, Error> {
    let mut fields = Map::new();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        if field.file_name().is_some() || fields.contains_key(&name) {
            continue;
        }

        let text = field.text().await.map_err(multipart_error)?;
        fields.insert(name, Value::String(text));
    }

    serde_json::from_value(Value::Object(fields)).map_err(|e| Error::malformed(e.to_string()))
}

fn body_kind(headers: &HeaderMap) -> BodyKind {
    let essence = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(str::trim);

    match essence {
        Some(t) if t.eq_ignore_ascii_case("application/x-www-form-urlencoded") => BodyKind::Form,
        Some(t) if t.eq_ignore_ascii_case("multipart/form-data") => BodyKind::Multipart,
        _ => BodyKind::Json,
    }
}

fn rejection_error(status: StatusCode, text: String) -> Error {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        Error::PayloadTooLarge(text)
    } else {
        Error::malformed(text)
    }
}

fn bytes_rejection(rejection: BytesRejection) -> Error {
    rejection_error(rejection.status(), rejection.body_text())
}

fn form_rejection(rejection: FormRejection) -> Error {
    rejection_error(rejection.status(), rejection.body_text())
}

fn multipart_rejection(rejection: MultipartRejection) -> Error {
    rejection_error(rejection.status(), rejection.body_text())
}

fn multipart_error(error: MultipartError) -> Error {
    rejection_error(error.status(), error.body_text())
}
