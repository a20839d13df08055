//! Publication credits read from a bundle's `colophon.json`.

use serde::Deserialize;

/// Colophon (publication rights and credits) page content.
///
/// Every key is optional. Keys missing from the JSON are left out of the
/// rendered page instead of being shown with a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Colophon {
    pub title: Option<String>,
    pub first_published: Option<String>,
    pub author: Option<String>,
    pub translator: Option<String>,
    pub publisher: Option<Publisher>,
    pub publication_registration: Option<Registration>,
    pub address: Option<Address>,
    pub contact: Option<Contact>,
    pub isbn: Option<String>,
    pub price: Option<String>,
    pub copyright_notice: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Publisher {
    pub editor: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Registration {
    pub date: Option<String>,
    pub number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Contact {
    pub email: Option<String>,
    pub fax: Option<String>,
}

impl Colophon {
    /// True when no recognised key carries a value.
    pub fn is_empty(&self) -> bool {
        *self == Colophon::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_keys() {
        let json = r#"{
            "title": "판권",
            "publisher": {"name": "출판사", "unknown": 1},
            "contact": {"email": "a@b.c"},
            "extra": true
        }"#;
        let colophon: Colophon = serde_json::from_str(json).unwrap();
        assert_eq!(colophon.title.as_deref(), Some("판권"));
        let publisher = colophon.publisher.unwrap();
        assert_eq!(publisher.name.as_deref(), Some("출판사"));
        assert!(publisher.editor.is_none());
        assert!(colophon.contact.unwrap().fax.is_none());
        assert!(colophon.isbn.is_none());
    }

    #[test]
    fn test_empty_object_is_empty() {
        let colophon: Colophon = serde_json::from_str("{}").unwrap();
        assert!(colophon.is_empty());
    }
}
