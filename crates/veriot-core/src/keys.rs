//! Composite and simple key construction.
//!
//! A composite key is encoded as
//!
//! ```text
//! U+0000 category U+0000 attr_1 U+0000 attr_2 U+0000 ... attr_n U+0000
//! ```
//!
//! Every component is terminated by `U+0000`, and no component may contain
//! `U+0000`, so the attribute tuple can always be recovered by splitting. Two
//! different tuples under the same category therefore never produce the same
//! key. `U+10FFFF` is also reserved so callers can form exclusive range ends.
//!
//! Simple keys (used verbatim, e.g. device IDs) must be non-empty and follow
//! the same component rules. They therefore never start with `U+0000`, which
//! keeps them disjoint from every composite key, and can always be used as a
//! composite-key attribute.

/// Leading marker and component terminator of composite keys.
pub const COMPOSITE_KEY_NAMESPACE: char = '\u{0}';

/// Highest unicode scalar value; reserved for range-scan upper bounds.
pub const MAX_UNICODE_RUNE: char = '\u{10FFFF}';

/// Errors from building or parsing keys.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    /// Composite key category was empty
    #[error("composite key category must not be empty")]
    EmptyCategory,

    /// Simple key was empty
    #[error("key must not be empty")]
    EmptyKey,

    /// A component contains a reserved character
    #[error("invalid key component {component:?}: {reason}")]
    InvalidComponent {
        /// The offending component
        component: String,
        /// Which rule it broke
        reason: String,
    },

    /// The key does not live in the composite namespace
    #[error("key is not a composite key")]
    NotComposite,

    /// The key starts like a composite key but is not well formed
    #[error("malformed composite key: {0}")]
    Malformed(String),
}

fn validate_component(component: &str) -> Result<(), KeyError> {
    if component.contains(COMPOSITE_KEY_NAMESPACE) {
        return Err(KeyError::InvalidComponent {
            component: component.to_string(),
            reason: "contains U+0000".to_string(),
        });
    }
    if component.contains(MAX_UNICODE_RUNE) {
        return Err(KeyError::InvalidComponent {
            component: component.to_string(),
            reason: "contains U+10FFFF".to_string(),
        });
    }
    Ok(())
}

fn encode(category: &str, attributes: &[&str]) -> Result<String, KeyError> {
    if category.is_empty() {
        return Err(KeyError::EmptyCategory);
    }
    validate_component(category)?;

    let capacity = 2 + category.len() + attributes.iter().map(|a| a.len() + 1).sum::<usize>();
    let mut key = String::with_capacity(capacity);
    key.push(COMPOSITE_KEY_NAMESPACE);
    key.push_str(category);
    key.push(COMPOSITE_KEY_NAMESPACE);
    for attribute in attributes {
        validate_component(attribute)?;
        key.push_str(attribute);
        key.push(COMPOSITE_KEY_NAMESPACE);
    }
    Ok(key)
}

/// Build the composite key for `category` and the full attribute tuple.
pub fn create_composite_key(category: &str, attributes: &[&str]) -> Result<String, KeyError> {
    encode(category, attributes)
}

/// Build the prefix shared by every composite key whose attribute tuple starts
/// with `attributes`. Use with [`crate::LedgerEffects::list_keys`].
pub fn partial_composite_key(category: &str, attributes: &[&str]) -> Result<String, KeyError> {
    encode(category, attributes)
}

/// Recover `(category, attributes)` from a composite key.
pub fn split_composite_key(key: &str) -> Result<(String, Vec<String>), KeyError> {
    let body = key
        .strip_prefix(COMPOSITE_KEY_NAMESPACE)
        .ok_or(KeyError::NotComposite)?;
    let body = body
        .strip_suffix(COMPOSITE_KEY_NAMESPACE)
        .ok_or_else(|| KeyError::Malformed("missing trailing terminator".to_string()))?;

    let mut components = body.split(COMPOSITE_KEY_NAMESPACE);
    let category = components
        .next()
        .filter(|c| !c.is_empty())
        .ok_or_else(|| KeyError::Malformed("empty category".to_string()))?;

    Ok((
        category.to_string(),
        components.map(str::to_string).collect(),
    ))
}

/// Check that `key` can be used verbatim as a storage key.
pub fn validate_simple_key(key: &str) -> Result<(), KeyError> {
    if key.is_empty() {
        return Err(KeyError::EmptyKey);
    }
    validate_component(key)
}
