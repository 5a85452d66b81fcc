use serde::{Deserialize, Deserializer, Serialize};

/// A contact as returned by the list endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    #[serde(deserialize_with = "id_as_string")]
    pub id: String,
    #[serde(default)]
    pub properties: ContactProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactProperties {
    #[serde(default)]
    pub firstname: Option<String>,
    #[serde(default)]
    pub lastname: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ContactRecord {
    pub fn firstname(&self) -> Option<&str> {
        non_empty(self.properties.firstname.as_deref())
    }

    pub fn lastname(&self) -> Option<&str> {
        non_empty(self.properties.lastname.as_deref())
    }

    pub fn email(&self) -> Option<&str> {
        non_empty(self.properties.email.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// One batch of the collection plus the cursor for the next batch, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactPage {
    pub results: Vec<ContactRecord>,
    pub after: Option<String>,
}

/// Request body for `POST /api/contacts`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NewContact {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedContact {
    pub id: String,
    /// The backend matched an existing contact by email and updated it.
    pub updated: bool,
}

// Wire shapes

#[derive(Debug, Deserialize)]
pub(crate) struct PageBody {
    #[serde(default)]
    pub results: Vec<ContactRecord>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Paging {
    #[serde(default)]
    pub next: Option<NextPage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NextPage {
    #[serde(default)]
    pub after: Option<String>,
}

impl From<PageBody> for ContactPage {
    fn from(body: PageBody) -> Self {
        let after = body
            .paging
            .and_then(|p| p.next)
            .and_then(|n| n.after)
            .filter(|a| !a.is_empty());
        Self { results: body.results, after }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedBody {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "opt_id_as_string")]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

fn id_as_string<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
    RawId::deserialize(de).map(String::from)
}

fn opt_id_as_string<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<RawId>::deserialize(de)?.map(String::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_become_strings() {
        let rec: ContactRecord =
            serde_json::from_str(r#"{"id": 42, "properties": {"email": "a@x.com"}}"#).unwrap();
        assert_eq!(rec.id, "42");
        assert_eq!(rec.email(), Some("a@x.com"));
        assert_eq!(rec.firstname(), None);
    }

    #[test]
    fn missing_properties_and_empty_values() {
        let rec: ContactRecord =
            serde_json::from_str(r#"{"id": "7", "properties": {"firstname": ""}}"#).unwrap();
        assert_eq!(rec.firstname(), None);

        let bare: ContactRecord = serde_json::from_str(r#"{"id": "8"}"#).unwrap();
        assert_eq!(bare.properties, ContactProperties::default());
    }

    #[test]
    fn page_cursor_is_optional() {
        let body: PageBody = serde_json::from_str(
            r#"{"results": [{"id": "1"}], "paging": {"next": {"after": "abc"}}}"#,
        )
        .unwrap();
        let page = ContactPage::from(body);
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.after.as_deref(), Some("abc"));

        let body: PageBody = serde_json::from_str(r#"{"results": [], "paging": {}}"#).unwrap();
        assert_eq!(ContactPage::from(body).after, None);

        let body: PageBody = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(ContactPage::from(body), ContactPage::default());
    }
}
