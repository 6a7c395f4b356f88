//! Time-ordered entity identifiers shared across the pipeline.
//!
//! Every entity (`Conversation`, `Message`, `Job`, `SanitizationLog`,
//! `Learning`) is keyed by a 26-character, lexicographically sortable,
//! time-ordered id — a ULID. Each entity gets its own newtype so ids can't
//! be swapped between tables at the type level, the way `bm_core::ids`
//! scopes `WorkspaceId` to a single kind of identity.

use ulid::Ulid;

const ID_LEN: usize = 26;

#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IdError {
    WrongLength { actual: usize },
    InvalidChar { ch: char, index: usize },
}

impl std::fmt::Display for IdError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdError::WrongLength { actual } => {
                write!(f, "id must be {ID_LEN} characters, got {actual}")
            }
            IdError::InvalidChar { ch, index } => {
                write!(f, "id has invalid character {ch:?} at index {index}")
            }
        }
    }
}

impl std::error::Error for IdError {}

fn validate_ulid_str(value: &str) -> Result<(), IdError> {
    if value.len() != ID_LEN {
        return Err(IdError::WrongLength {
            actual: value.len(),
        });
    }
    for (index, ch) in value.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() {
            return Err(IdError::InvalidChar { ch, index });
        }
    }
    Ok(())
}

macro_rules! entity_id {
    ($name:ident) => {
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generates a fresh, time-ordered id from the current wall clock.
            pub fn generate() -> Self {
                Self(Ulid::new().to_string())
            }

            pub fn try_new(value: impl Into<String>) -> Result<Self, IdError> {
                let value = value.into();
                validate_ulid_str(&value)?;
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

entity_id!(ConversationId);
entity_id!(MessageId);
entity_id!(JobId);
entity_id!(SanitizationLogId);
entity_id!(LearningId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_round_trip_through_validation() {
        let id = ConversationId::generate();
        let reparsed = ConversationId::try_new(id.as_str()).unwrap();
        assert_eq!(id, reparsed);
        assert_eq!(id.as_str().len(), ID_LEN);
    }

    #[test]
    fn generated_ids_are_monotonic_under_millisecond_resolution() {
        let a = MessageId::generate();
        let b = MessageId::generate();
        // ULIDs generated in the same or later millisecond sort >=.
        assert!(b.as_str() >= a.as_str());
    }

    #[test]
    fn rejects_wrong_length() {
        let err = JobId::try_new("too-short").unwrap_err();
        assert!(matches!(err, IdError::WrongLength { .. }));
    }

    #[test]
    fn rejects_invalid_characters() {
        let bogus = "!".repeat(ID_LEN);
        let err = LearningId::try_new(bogus).unwrap_err();
        assert!(matches!(err, IdError::InvalidChar { .. }));
    }
}
