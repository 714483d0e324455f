use serde::{Deserialize, Serialize};

use coopmember_core::{Provisioned, RuleError, RuleResult, StoreError};

/// Tag slug: the unique key of a catalog classification tag.
///
/// Slugs are lowercase ASCII letters, digits and `-` (e.g. "coop-discount").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TagSlug(String);

impl TagSlug {
    pub fn parse(raw: impl Into<String>) -> RuleResult<Self> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(RuleError::config("tag slug cannot be empty"));
        }
        if let Some(bad) = raw
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(RuleError::config(format!(
                "tag slug '{raw}' contains invalid character '{bad}'"
            )));
        }
        Ok(Self(raw))
    }

    /// Wrap a compile-time slug literal.
    ///
    /// The literal must already be a valid slug (checked in debug builds).
    pub fn from_static(raw: &'static str) -> Self {
        debug_assert!(Self::parse(raw).is_ok(), "invalid static tag slug: {raw}");
        Self(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TagSlug {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<TagSlug> for String {
    fn from(value: TagSlug) -> Self {
        value.0
    }
}

impl core::fmt::Display for TagSlug {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog classification tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub slug: TagSlug,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Tag {
    pub fn new(slug: TagSlug, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            slug,
            name: name.into(),
            description: description.into(),
        }
    }
}

/// Host tag taxonomy.
pub trait TagStore: Send + Sync {
    fn exists(&self, slug: &TagSlug) -> Result<bool, StoreError>;

    /// Insert a tag. Stores may reject a slug that already exists.
    fn create(&self, tag: Tag) -> Result<(), StoreError>;
}

/// Insert `tag` unless a tag with the same slug already exists.
///
/// Idempotent: calling it twice leaves exactly one tag with the slug and the
/// second call reports [`Provisioned::AlreadyExists`]. A store rejection comes
/// back as [`RuleError::ExternalStore`]; callers log it and continue without
/// the tag.
pub fn ensure_tag(store: &dyn TagStore, tag: &Tag) -> RuleResult<Provisioned> {
    if store.exists(&tag.slug)? {
        tracing::info!(slug = %tag.slug, "product tag already exists");
        return Ok(Provisioned::AlreadyExists);
    }

    store.create(tag.clone())?;
    tracing::info!(slug = %tag.slug, name = %tag.name, "created product tag");
    Ok(Provisioned::Created)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    struct Taxonomy {
        tags: Mutex<BTreeMap<TagSlug, Tag>>,
        down: bool,
    }

    impl TagStore for Taxonomy {
        fn exists(&self, slug: &TagSlug) -> Result<bool, StoreError> {
            if self.down {
                return Err(StoreError::unavailable("taxonomy offline"));
            }
            Ok(self.tags.lock().unwrap().contains_key(slug))
        }

        fn create(&self, tag: Tag) -> Result<(), StoreError> {
            let mut tags = self.tags.lock().unwrap();
            if tags.contains_key(&tag.slug) {
                return Err(StoreError::rejected(format!("duplicate slug {}", tag.slug)));
            }
            tags.insert(tag.slug.clone(), tag);
            Ok(())
        }
    }

    fn discount_tag() -> Tag {
        Tag::new(
            TagSlug::parse("coop-discount").unwrap(),
            "Coop Discount",
            "Members get a discount on products with this tag.",
        )
    }

    #[test]
    fn slug_accepts_kebab_case() {
        assert_eq!(TagSlug::parse("coop-membership-2").unwrap().as_str(), "coop-membership-2");
    }

    #[test]
    fn slug_rejects_empty_and_uppercase() {
        assert!(matches!(TagSlug::parse(""), Err(RuleError::Config(_))));
        match TagSlug::parse("Coop Discount") {
            Err(RuleError::Config(msg)) => assert!(msg.contains("invalid character 'C'")),
            other => panic!("Expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn slug_deserialization_validates() {
        assert!(serde_json::from_str::<TagSlug>("\"coop-discount\"").is_ok());
        assert!(serde_json::from_str::<TagSlug>("\"not a slug\"").is_err());
    }

    #[test]
    fn ensure_tag_twice_leaves_exactly_one_tag() {
        let store = Taxonomy::default();

        assert_eq!(ensure_tag(&store, &discount_tag()), Ok(Provisioned::Created));
        assert_eq!(ensure_tag(&store, &discount_tag()), Ok(Provisioned::AlreadyExists));

        let tags = store.tags.lock().unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags.values().next().unwrap().name, "Coop Discount");
    }

    #[test]
    fn ensure_tag_reports_store_failure() {
        let store = Taxonomy {
            down: true,
            ..Taxonomy::default()
        };

        let err = ensure_tag(&store, &discount_tag()).unwrap_err();
        assert!(matches!(err, RuleError::ExternalStore(StoreError::Unavailable(_))));
        assert!(store.tags.lock().unwrap().is_empty());
    }
}
