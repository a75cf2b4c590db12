use std::fmt::{self, Display, Formatter};

use chrono::NaiveDate;
use rand::{distributions::Alphanumeric, Rng};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    profile::{FitnessProfile, ProfileFields, ProfilePayload},
    validation::{nest, replace_field, ReadErrors},
};

/// Opaque login handle assigned to every user at sign up.
#[derive(Clone, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Username(String);

impl Username {
    pub const LENGTH: usize = 16;

    /// Draws a fresh handle of [`Username::LENGTH`] characters from `[A-Za-z0-9]`.
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(
            rng.sample_iter(&Alphanumeric)
                .take(Self::LENGTH)
                .map(char::from)
                .collect(),
        )
    }

    pub fn random() -> Self {
        Self::generate(&mut rand::thread_rng())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Username {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for Username {
    fn from(username: String) -> Self {
        Self(username)
    }
}

impl From<&str> for Username {
    fn from(username: &str) -> Self {
        Self(username.to_owned())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct User {
    pub id: i64,
    pub username: Username,
    pub name: String,
    pub fitness_profile: FitnessProfile,
}

impl User {
    pub fn absolute_url(&self) -> String {
        format!("/users/{}/", self.username)
    }
}

/// Account creation request: a display name and the nested profile.
#[derive(Clone, Debug, Default, PartialEq, Validate)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreateUserRequest {
    #[validate(length(
        max = 255,
        message = "Ensure this field has no more than 255 characters."
    ))]
    #[cfg_attr(feature = "serde", serde(default))]
    pub name: String,
    pub fitness_profile: ProfilePayload,
}

/// A validated [`CreateUserRequest`], ready to be stored under a new username.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub name: String,
    pub fitness_profile: ProfileFields,
}

impl CreateUserRequest {
    /// Validates the name and the nested profile, with profile errors kept
    /// under `fitness_profile`.
    pub fn validate_at(&self, today: NaiveDate) -> Result<NewUser, ValidationErrors> {
        self.check(today, ReadErrors::new(), Ok(ReadErrors::new()))
    }

    /// Validates a JSON body. Missing or mistyped fields are reported under
    /// their own names next to the rule failures of the other fields.
    #[cfg(feature = "serde")]
    pub fn from_json(value: &serde_json::Value, today: NaiveDate) -> Result<NewUser, ValidationErrors> {
        use crate::{
            input::{FieldReader, NOT_A_STRING},
            validation::{error, non_field, REQUIRED},
        };

        let mut reader = FieldReader::new(value).map_err(non_field)?;
        let name = reader.read("name", NOT_A_STRING).unwrap_or_default();
        let (fitness_profile, profile_read) = match reader.get("fitness_profile") {
            None => (ProfilePayload::default(), Err(error("required", REQUIRED))),
            Some(profile) => match ProfilePayload::read(profile) {
                Ok((payload, read_errors)) => (payload, Ok(read_errors)),
                Err(error) => (ProfilePayload::default(), Err(error)),
            },
        };

        let request = Self {
            name,
            fitness_profile,
        };
        request.check(today, reader.finish(), profile_read)
    }

    fn check(
        &self,
        today: NaiveDate,
        read_errors: ReadErrors,
        profile_read: Result<ReadErrors, ValidationError>,
    ) -> Result<NewUser, ValidationErrors> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        for (field, error) in read_errors {
            replace_field(&mut errors, field, error);
        }

        let fitness_profile = match profile_read {
            Ok(profile_errors) => match self.fitness_profile.check(today, profile_errors) {
                Ok(fields) => Some(fields),
                Err(profile_errors) => {
                    nest(&mut errors, "fitness_profile", profile_errors);
                    None
                }
            },
            Err(error) => {
                errors.add("fitness_profile", error);
                None
            }
        };

        match fitness_profile {
            Some(fitness_profile) if errors.is_empty() => Ok(NewUser {
                name: self.name.clone(),
                fitness_profile,
            }),
            _ => Err(errors),
        }
    }
}
