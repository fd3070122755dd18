//! Domain identifier types with validation
//!
//! Newtype wrappers keep project, photo and drawing identifiers from being
//! mixed up, and carry the validation rules for each.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a non-empty string identifier newtype.
///
/// An optional `fn(&str) -> Result<(), String>` adds a type-specific check.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        string_id!($(#[$meta])* $name, $label, |_: &str| Ok(()));
    };
    ($(#[$meta:meta])* $name:ident, $label:literal, $check:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, rejecting blank values
            pub fn new(id: impl Into<String>) -> Result<Self, String> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(concat!($label, " cannot be empty").to_string());
                }
                let check: fn(&str) -> Result<(), String> = $check;
                check(&id)?;
                Ok(Self(id))
            }

            /// Returns the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consumes self and returns the inner String
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = String;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of the construction project being exported
    ///
    /// # Examples
    ///
    /// ```
    /// use photopack::domain::ids::ProjectId;
    ///
    /// let project = ProjectId::new("bridge-2024-07").unwrap();
    /// assert_eq!(project.as_str(), "bridge-2024-07");
    /// assert!(ProjectId::new("../bridge").is_err());
    /// ```
    ProjectId,
    "Project ID",
    single_path_component
);

/// Project ids name manifests and archives, so they must be one file name
fn single_path_component(id: &str) -> Result<(), String> {
    if id.contains(['/', '\\', '\0']) || id == "." || id == ".." {
        return Err(format!("Project ID must be a single path component: {id}"));
    }
    Ok(())
}

string_id!(
    /// Identifier of a classified photo in the relational store
    PhotoId,
    "Photo ID"
);

string_id!(
    /// Identifier of a classified drawing in the relational store
    DrawingId,
    "Drawing ID"
);

string_id!(
    /// Caller identity presented to the authorization collaborator
    Principal,
    "Principal"
);

/// Reference to a binary owned by the storage collaborator
///
/// A relative, slash-separated path. Absolute paths and `..` components are
/// rejected so a reference can never escape the storage root.
///
/// # Examples
///
/// ```
/// use photopack::domain::ids::BinaryRef;
///
/// let reference = BinaryRef::new("site-a/2024/IMG_0001.jpeg").unwrap();
/// assert_eq!(reference.extension(), Some("jpeg"));
/// assert!(BinaryRef::new("../etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BinaryRef(String);

impl BinaryRef {
    /// Creates a new binary reference
    pub fn new(reference: impl Into<String>) -> Result<Self, String> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err("Binary reference cannot be empty".to_string());
        }
        if reference.starts_with('/') || reference.starts_with('\\') {
            return Err(format!("Binary reference must be relative, got: {reference}"));
        }
        if reference
            .split(['/', '\\'])
            .any(|component| component == "..")
        {
            return Err(format!(
                "Binary reference must not contain '..' components, got: {reference}"
            ));
        }
        Ok(Self(reference))
    }

    /// Returns the reference as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// File extension of the referenced binary, without the dot
    pub fn extension(&self) -> Option<&str> {
        let file_name = self.0.rsplit(['/', '\\']).next()?;
        let (stem, ext) = file_name.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext)
    }
}

impl fmt::Display for BinaryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BinaryRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for BinaryRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BinaryRef> for String {
    fn from(reference: BinaryRef) -> Self {
        reference.0
    }
}

/// Export job identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Generates a fresh random job ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for JobId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|e| format!("Invalid job ID '{s}': {e}"))
    }
}
