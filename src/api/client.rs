use std::rc::Rc;

use reqwest::Client as HttpClient;
use serde_json::Value;
use url::Url;

use crate::api::error::ApiError;
use crate::api::models::{
    ContactPage, CreatedBody, CreatedContact, ErrorBody, NewContact, PageBody,
};

/// Operations the contact engines need from the remote collection.
///
/// The engines are generic over this trait so they can be driven by the
/// HTTP client in the application and by an in-memory fake in tests.
#[allow(async_fn_in_trait)]
pub trait ContactApi {
    async fn list_contacts(&self, limit: u32, after: Option<&str>) -> Result<ContactPage, ApiError>;
    async fn create_contact(&self, contact: &NewContact) -> Result<CreatedContact, ApiError>;
    async fn delete_contact(&self, id: &str) -> Result<(), ApiError>;
}

impl<T: ContactApi + ?Sized> ContactApi for Rc<T> {
    async fn list_contacts(&self, limit: u32, after: Option<&str>) -> Result<ContactPage, ApiError> {
        (**self).list_contacts(limit, after).await
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<CreatedContact, ApiError> {
        (**self).create_contact(contact).await
    }

    async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        (**self).delete_contact(id).await
    }
}

/// `reqwest` backed client for the `/api/contacts` collection.
#[derive(Clone)]
pub struct HttpContactApi {
    http: HttpClient,
    collection: Url,
}

impl HttpContactApi {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let base = crate::utils::normalize_url(base_url);
        let collection = Url::parse(&format!("{}/contacts", Self::base_api(&base)))
            .map_err(|e| ApiError::Network(format!("invalid API base URL {base:?}: {e}")))?;
        Ok(Self { http: HttpClient::new(), collection })
    }

    fn base_api(base_url: &str) -> String {
        let trimmed = base_url.trim_end_matches('/');
        if trimmed.ends_with("/api") { trimmed.to_string() } else { format!("{}/api", trimmed) }
    }

    pub fn list_url(&self, limit: u32, after: Option<&str>) -> Url {
        let mut url = self.collection.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &limit.to_string());
            if let Some(cursor) = after {
                query.append_pair("after", cursor);
            }
        }
        url
    }

    pub fn item_url(&self, id: &str) -> Url {
        let mut url = self.collection.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<(u16, Vec<u8>), ApiError> {
        crate::utils::on_runtime(async move {
            let resp = req.send().await?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await?;
            Ok::<_, ApiError>((status, body.to_vec()))
        })
        .await
        .map_err(ApiError::network)?
    }
}

impl ContactApi for HttpContactApi {
    async fn list_contacts(&self, limit: u32, after: Option<&str>) -> Result<ContactPage, ApiError> {
        let url = self.list_url(limit, after);
        log::debug!("GET {url}");
        let (status, body) = self.execute(self.http.get(url)).await?;
        decode_page(status, &body)
    }

    async fn create_contact(&self, contact: &NewContact) -> Result<CreatedContact, ApiError> {
        log::debug!("POST {}", self.collection);
        let req = self.http.post(self.collection.clone()).json(contact);
        let (status, body) = self.execute(req).await?;
        decode_created(status, &body)
    }

    async fn delete_contact(&self, id: &str) -> Result<(), ApiError> {
        let url = self.item_url(id);
        log::debug!("DELETE {url}");
        let (status, body) = self.execute(self.http.delete(url)).await?;
        decode_deleted(status, &body)
    }
}

fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

pub(crate) fn decode_page(status: u16, body: &[u8]) -> Result<ContactPage, ApiError> {
    if status != 200 {
        return Err(remote_error(status, body));
    }
    serde_json::from_slice::<PageBody>(body)
        .map(ContactPage::from)
        .map_err(|e| ApiError::Network(format!("invalid list response: {e}")))
}

pub(crate) fn decode_created(status: u16, body: &[u8]) -> Result<CreatedContact, ApiError> {
    if !is_success(status) {
        return Err(remote_error(status, body));
    }
    let parsed: CreatedBody = serde_json::from_slice(body)
        .map_err(|e| ApiError::Network(format!("invalid create response: {e}")))?;
    let id = parsed
        .id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::Network("create response carried no id".into()))?;
    let updated = parsed.status.as_deref() == Some("updated");
    if updated {
        log::info!("contact {id} already existed and was updated");
    }
    Ok(CreatedContact { id, updated })
}

pub(crate) fn decode_deleted(status: u16, body: &[u8]) -> Result<(), ApiError> {
    if is_success(status) { Ok(()) } else { Err(remote_error(status, body)) }
}

pub(crate) fn remote_error(status: u16, body: &[u8]) -> ApiError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP {status}"));
    log::warn!("contact API rejected request: {status} {message}");
    ApiError::Remote { status, message }
}

/// Pulls `detail` out of an error body. Structured details (validation
/// error lists) are rendered as compact JSON.
fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api() -> HttpContactApi {
        HttpContactApi::new("localhost:8000").unwrap()
    }

    #[test]
    fn list_url_carries_limit_and_encoded_cursor() {
        let url = api().list_url(50, None);
        assert_eq!(url.as_str(), "https://localhost:8000/api/contacts?limit=50");

        let url = api().list_url(50, Some("a b&c"));
        assert_eq!(url.query(), Some("limit=50&after=a+b%26c"));
    }

    #[test]
    fn base_url_with_api_suffix_is_not_doubled() {
        let api = HttpContactApi::new("http://host/api/").unwrap();
        assert_eq!(api.item_url("42").as_str(), "http://host/api/contacts/42");
    }

    #[test]
    fn item_url_escapes_identifier() {
        assert_eq!(api().item_url("a/b").path(), "/api/contacts/a%2Fb");
    }

    #[test]
    fn page_decoding() {
        let body = br#"{"results":[{"id":"1","properties":{"email":"a@x.com"}}],"paging":{}}"#;
        let page = decode_page(200, body).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.after, None);

        let err = decode_page(200, b"not json").unwrap_err();
        assert!(matches!(err, ApiError::Network(_)));
    }

    #[test]
    fn error_detail_becomes_message() {
        let err = decode_page(502, br#"{"detail":"HubSpot API error: 500"}"#).unwrap_err();
        assert_eq!(
            err,
            ApiError::Remote { status: 502, message: "HubSpot API error: 500".into() }
        );

        let err = decode_deleted(404, b"").unwrap_err();
        assert_eq!(err.to_string(), "HTTP 404");

        let err = decode_created(422, br#"{"detail":[{"msg":"bad email"}]}"#).unwrap_err();
        assert_eq!(err.to_string(), r#"[{"msg":"bad email"}]"#);
    }

    #[test]
    fn non_json_error_body_falls_back_to_status() {
        let html = b"<html><body><h1>502 Bad Gateway</h1></body></html>";
        let err = decode_created(502, html).unwrap_err();
        assert_eq!(err, ApiError::Remote { status: 502, message: "HTTP 502".into() });
    }

    #[test]
    fn created_decoding() {
        let created = decode_created(200, br#"{"status":"created","id":"901"}"#).unwrap();
        assert_eq!(created, CreatedContact { id: "901".into(), updated: false });

        let created = decode_created(201, br#"{"status":"updated","id":901}"#).unwrap();
        assert!(created.updated);
        assert_eq!(created.id, "901");

        assert!(matches!(decode_created(200, br#"{"status":"created"}"#), Err(ApiError::Network(_))));
    }

    #[test]
    fn delete_accepts_any_success_status() {
        assert!(decode_deleted(200, br#"{"status":"deleted"}"#).is_ok());
        assert!(decode_deleted(204, b"").is_ok());
    }
}
