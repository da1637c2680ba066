//! Custom Axum extractors for customer request parameters
//!
//! Parameters are read as ordered key/value pairs and the first value of a
//! key wins, so `?id=1&id=2` reads as id 1.

use axum::extract::{Form, FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::http::{header, Method};

use super::error::ApiError;

type Pairs = Vec<(String, String)>;

/// First value of `key`, if present.
fn first<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

/// Extract and parse the `id` query parameter as an i64.
///
/// A missing or non-numeric id is a bad request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CustomerId(pub i64);

impl<S> FromRequestParts<S> for CustomerId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs): Query<Pairs> = Query::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::BadRequest {
                reason: e.body_text(),
            })?;

        let raw = first(&pairs, "id").unwrap_or_default();
        let id = raw.parse::<i64>().map_err(|e| ApiError::BadRequest {
            reason: format!("id {:?}: {}", raw, e),
        })?;

        Ok(Self(id))
    }
}

/// What a save request asks for, decided by its `id` field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveCommand {
    Create { name: String, phone: String },
    Update { id: i64, name: String, phone: String },
}

/// Extract the `id`, `name` and `phone` fields of a save request.
///
/// Fields are looked up in a urlencoded body first (POST, PUT and PATCH
/// only), then in the query string. Any other body is ignored. Unlike
/// `CustomerId`, an unparseable id here is an internal error, not a bad
/// request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveForm(pub SaveCommand);

fn has_form_body(req: &Request) -> bool {
    let body_method = [Method::POST, Method::PUT, Method::PATCH].contains(req.method());
    let urlencoded = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    body_method && urlencoded
}

impl<S> FromRequest<S> for SaveForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let (mut parts, body) = req.into_parts();
        let Query(query): Query<Pairs> = Query::from_request_parts(&mut parts, state)
            .await
            .map_err(|e| ApiError::Internal {
                message: format!("save query: {}", e.body_text()),
            })?;

        let req = Request::from_parts(parts, body);
        let mut pairs = if has_form_body(&req) {
            let Form(form): Form<Pairs> = Form::from_request(req, state)
                .await
                .map_err(|e| ApiError::Internal {
                    message: format!("save form: {}", e.body_text()),
                })?;
            form
        } else {
            Vec::new()
        };
        pairs.extend(query);

        Ok(Self(SaveCommand::from_pairs(&pairs)?))
    }
}

impl SaveCommand {
    fn from_pairs(pairs: &[(String, String)]) -> Result<Self, ApiError> {
        let raw = first(pairs, "id").unwrap_or_default();
        let id = raw.parse::<i64>().map_err(|e| ApiError::Internal {
            message: format!("save id {:?}: {}", raw, e),
        })?;

        let name = first(pairs, "name").unwrap_or_default().to_owned();
        let phone = first(pairs, "phone").unwrap_or_default().to_owned();

        Ok(if id == 0 {
            Self::Create { name, phone }
        } else {
            Self::Update { id, name, phone }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::StatusCode;

    async fn customer_id(uri: &str) -> Result<CustomerId, ApiError> {
        let req = axum::http::Request::builder().uri(uri).body(()).unwrap();
        let (mut parts, _) = req.into_parts();
        CustomerId::from_request_parts(&mut parts, &()).await
    }

    async fn save_form(
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> Result<SaveCommand, ApiError> {
        let mut builder = axum::http::Request::builder().method(method).uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header(header::CONTENT_TYPE, ct);
        }
        let req = builder.body(Body::from(body.to_owned())).unwrap();
        SaveForm::from_request(req, &()).await.map(|SaveForm(cmd)| cmd)
    }

    fn pairs(items: &[(&str, &str)]) -> Pairs {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    const URLENCODED: Option<&str> = Some("application/x-www-form-urlencoded");

    #[tokio::test]
    async fn parses_numeric_id() {
        assert_eq!(customer_id("/x?id=42").await.unwrap(), CustomerId(42));
        assert_eq!(customer_id("/x?id=-3").await.unwrap(), CustomerId(-3));
    }

    #[tokio::test]
    async fn repeated_id_takes_first_value() {
        assert_eq!(customer_id("/x?id=1&id=2").await.unwrap(), CustomerId(1));
        assert_eq!(customer_id("/x?other=a&id=5&id=x").await.unwrap(), CustomerId(5));
    }

    #[tokio::test]
    async fn rejects_malformed_id_as_bad_request() {
        for uri in ["/x?id=abc", "/x?id=", "/x", "/x?id=1.5", "/x?id=99999999999999999999"] {
            let err = customer_id(uri).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST, "{uri}");
        }
    }

    #[test]
    fn zero_id_selects_create() {
        let cmd = SaveCommand::from_pairs(&pairs(&[
            ("id", "0"),
            ("name", "Alice"),
            ("phone", "555-0100"),
        ]))
        .unwrap();
        assert_eq!(
            cmd,
            SaveCommand::Create {
                name: "Alice".into(),
                phone: "555-0100".into()
            }
        );
    }

    #[test]
    fn nonzero_id_selects_update() {
        let cmd = SaveCommand::from_pairs(&pairs(&[("id", "12"), ("name", "A")])).unwrap();
        assert_eq!(
            cmd,
            SaveCommand::Update {
                id: 12,
                name: "A".into(),
                phone: String::new()
            }
        );
    }

    #[test]
    fn unparseable_save_id_is_internal() {
        for items in [vec![("id", "abc")], vec![("id", "")], vec![("name", "A")]] {
            let err = SaveCommand::from_pairs(&pairs(&items)).unwrap_err();
            assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }

    #[tokio::test]
    async fn save_form_reads_urlencoded_body() {
        let cmd = save_form("POST", "/customers.save", URLENCODED, "id=0&name=Alice&phone=555-0100")
            .await
            .unwrap();
        assert!(matches!(cmd, SaveCommand::Create { .. }));
    }

    #[tokio::test]
    async fn save_form_falls_back_to_query_without_form_body() {
        let uri = "/customers.save?id=0&name=Bob&phone=555-0101";
        for content_type in [None, Some("application/json"), URLENCODED] {
            let cmd = save_form("POST", uri, content_type, "").await.unwrap();
            assert_eq!(
                cmd,
                SaveCommand::Create {
                    name: "Bob".into(),
                    phone: "555-0101".into()
                },
                "{content_type:?}"
            );
        }
    }

    #[tokio::test]
    async fn save_form_body_wins_over_query() {
        let cmd = save_form(
            "POST",
            "/customers.save?id=9&name=Query&phone=555-0102",
            URLENCODED,
            "id=0&name=Body",
        )
        .await
        .unwrap();
        assert_eq!(
            cmd,
            SaveCommand::Create {
                name: "Body".into(),
                phone: "555-0102".into()
            }
        );
    }

    #[tokio::test]
    async fn save_form_ignores_body_on_get() {
        let cmd = save_form(
            "GET",
            "/customers.save?id=0&name=Query&phone=1",
            URLENCODED,
            "name=Body",
        )
        .await
        .unwrap();
        assert!(matches!(cmd, SaveCommand::Create { ref name, .. } if name == "Query"));
    }
}
