//! Newtype wrappers for string identifiers, providing compile-time type safety.
//!
//! All newtypes serialize/deserialize as plain strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Deref;

macro_rules! string_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance from a string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Return the inner string as a slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume self and return the inner `String`.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl PartialEq<String> for $name {
            fn eq(&self, other: &String) -> bool {
                self.0 == *other
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }
    };
}

string_newtype!(
    /// Easyconfig file name for one build request, e.g. `GCC-10.2.0.eb`.
    TargetId
);

string_newtype!(
    /// Operator-supplied tag used to include or exclude build requests.
    Label
);

/// Ordered, deduplicated set of labels.
pub type LabelSet = BTreeSet<Label>;

/// Build a [`LabelSet`] from anything yielding label-like strings.
pub fn label_set<I, S>(labels: I) -> LabelSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    labels.into_iter().map(Label::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_id_display_and_as_ref() {
        let id = TargetId::new("foo-1.0.eb");
        assert_eq!(id.to_string(), "foo-1.0.eb");
        assert_eq!(id.as_str(), "foo-1.0.eb");
        assert_eq!(AsRef::<str>::as_ref(&id), "foo-1.0.eb");
    }

    #[test]
    fn target_id_serializes_as_plain_string() {
        let id = TargetId::new("bar-2.0.eb");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"bar-2.0.eb\"");
        let back: TargetId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn label_set_sorts_and_dedups() {
        let set = label_set(["gpu", "cpu", "gpu"]);
        let labels: Vec<&str> = set.iter().map(Label::as_str).collect();
        assert_eq!(labels, vec!["cpu", "gpu"]);
    }

    #[test]
    fn label_compares_with_str() {
        assert_eq!(Label::from("a"), "a");
        assert_eq!(Label::from(String::from("b")).into_inner(), "b");
    }
}
