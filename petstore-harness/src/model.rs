//! Petstore entity types in the wire shape of the `/pet` endpoints.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Sale status of a pet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    Available,
    Pending,
    Sold,
}

impl PetStatus {
    pub const ALL: [PetStatus; 3] = [PetStatus::Available, PetStatus::Pending, PetStatus::Sold];

    pub fn as_str(&self) -> &'static str {
        match self {
            PetStatus::Available => "available",
            PetStatus::Pending => "pending",
            PetStatus::Sold => "sold",
        }
    }
}

impl fmt::Display for PetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "available" => Ok(PetStatus::Available),
            "pending" => Ok(PetStatus::Pending),
            "sold" => Ok(PetStatus::Sold),
            other => Err(format!("unknown pet status '{}'", other)),
        }
    }
}

/// A label record used for both categories and tags.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tag {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Tag {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            name: Some(name.into()),
        }
    }
}

/// The pet record exchanged with `/pet`.
///
/// `photo_urls` is order-significant: two pets with the same URLs in a
/// different order are not equal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub name: String,
    #[serde(default)]
    pub photo_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<Tag>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PetStatus>,
}

impl Pet {
    /// Creates a pet with only a name set.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_status(mut self, status: PetStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_photo_urls<I, S>(mut self, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.photo_urls = urls.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_tags(mut self, tags: Vec<Tag>) -> Self {
        self.tags = Some(tags);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pet_serializes_camel_case() {
        let pet = Pet::new("doggie")
            .with_id(12345)
            .with_status(PetStatus::Available)
            .with_photo_urls(["http://example.com/photo1"]);

        let json = serde_json::to_value(&pet).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 12345,
                "name": "doggie",
                "photoUrls": ["http://example.com/photo1"],
                "status": "available"
            })
        );
    }

    #[test]
    fn test_pet_deserializes_petstore_payload() {
        let body = r#"{
            "id": 7,
            "category": {"id": 1, "name": "Dogs"},
            "name": "rex",
            "photoUrls": ["a", "b"],
            "tags": [{"id": 3, "name": "friendly"}],
            "status": "sold"
        }"#;

        let pet: Pet = serde_json::from_str(body).unwrap();
        assert_eq!(pet.id, Some(7));
        assert_eq!(pet.category, Some(Category::new(1, "Dogs")));
        assert_eq!(pet.photo_urls, vec!["a", "b"]);
        assert_eq!(pet.tags, Some(vec![Tag::new(3, "friendly")]));
        assert_eq!(pet.status, Some(PetStatus::Sold));
    }

    #[test]
    fn test_pet_missing_photo_urls_defaults_to_empty() {
        let pet: Pet = serde_json::from_str(r#"{"id": 1, "name": "x"}"#).unwrap();
        assert!(pet.photo_urls.is_empty());
        assert_eq!(pet.status, None);
    }

    #[test]
    fn test_photo_url_order_is_significant() {
        let a = Pet::new("x").with_photo_urls(["1", "2"]);
        let b = Pet::new("x").with_photo_urls(["2", "1"]);
        assert_ne!(a, b);
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Pending".parse::<PetStatus>(), Ok(PetStatus::Pending));
        assert_eq!(" sold ".parse::<PetStatus>(), Ok(PetStatus::Sold));
        assert!("adopted".parse::<PetStatus>().is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(PetStatus::Available.to_string(), "available");
    }
}
