use chrono::{NaiveDate, Utc};
use validator::{Validate, ValidateArgs, ValidationErrors};

use crate::{
    choices::{FitnessGoal, Gender},
    mobile_number::MobileNumber,
    validation::{
        replace_field, validate_date_of_birth, validate_fits_u32, validate_gender, validate_goal,
        validate_mobile_number, ReadErrors,
    },
};

/// Current date as used for date of birth validation and age computation.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole years between `date_of_birth` and `today`, counted as 365 day blocks.
///
/// Leap days are not accounted for, so the result can be one year ahead of the
/// calendar age in the days before a birthday.
pub fn compute_age(date_of_birth: NaiveDate, today: NaiveDate) -> u32 {
    let days = (today - date_of_birth).num_days();
    u32::try_from(days.div_euclid(365)).unwrap_or(0)
}

/// Body mass index, rounded to two decimal places.
pub fn compute_bmi(height_cm: u32, weight_kg: u32) -> f64 {
    let height_m = height_cm as f64 / 100.0;
    let bmi = weight_kg as f64 / (height_m * height_m);
    (bmi * 100.0).round() / 100.0
}

/// Profile data as submitted by a client, before validation.
///
/// Rules that compare against the current date take it as the validation
/// context.
#[derive(Clone, Debug, Default, PartialEq, Validate)]
#[validate(context = NaiveDate)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfilePayload {
    #[validate(custom(function = "validate_gender"))]
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub gender: Option<String>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_date_of_birth", use_context)
    )]
    pub date_of_birth: Option<NaiveDate>,
    #[validate(
        required(message = "This field is required."),
        custom(function = "validate_mobile_number")
    )]
    pub contact_number: Option<String>,
    #[validate(
        required(message = "This field is required."),
        range(min = 1, message = "Height must be a positive value."),
        custom(function = "validate_fits_u32")
    )]
    pub height: Option<i64>,
    #[validate(
        required(message = "This field is required."),
        range(min = 1, message = "Weight must be a positive value."),
        custom(function = "validate_fits_u32")
    )]
    pub weight: Option<i64>,
    pub joining_date: Option<NaiveDate>,
    #[validate(custom(function = "validate_goal"))]
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub goal: Option<String>,
}

impl ProfilePayload {
    /// Checks every field, reporting all failures at once, and converts the
    /// payload into [`ProfileFields`].
    pub fn validate_at(&self, today: NaiveDate) -> Result<ProfileFields, ValidationErrors> {
        self.check(today, ReadErrors::new())
    }

    /// Validates a JSON body the way [`ProfilePayload::validate_at`] does,
    /// reporting missing and mistyped fields under their own names.
    #[cfg(feature = "serde")]
    pub fn from_json(
        value: &serde_json::Value,
        today: NaiveDate,
    ) -> Result<ProfileFields, ValidationErrors> {
        let (payload, read_errors) = Self::read(value).map_err(crate::validation::non_field)?;
        payload.check(today, read_errors)
    }

    #[cfg(feature = "serde")]
    pub(crate) fn read(
        value: &serde_json::Value,
    ) -> Result<(Self, ReadErrors), validator::ValidationError> {
        use crate::input::{FieldReader, BAD_DATE, NOT_AN_INTEGER, NOT_A_STRING};

        let mut reader = FieldReader::new(value)?;
        let payload = Self {
            gender: reader.read("gender", NOT_A_STRING),
            date_of_birth: reader.read("date_of_birth", BAD_DATE),
            contact_number: reader.read("contact_number", NOT_A_STRING),
            height: reader.read("height", NOT_AN_INTEGER),
            weight: reader.read("weight", NOT_AN_INTEGER),
            joining_date: reader.read("joining_date", BAD_DATE),
            goal: reader.read("goal", NOT_A_STRING),
        };
        Ok((payload, reader.finish()))
    }

    pub(crate) fn check(
        &self,
        today: NaiveDate,
        read_errors: ReadErrors,
    ) -> Result<ProfileFields, ValidationErrors> {
        let mut errors = match self.validate_with_args(&today) {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };
        for (field, error) in read_errors {
            replace_field(&mut errors, field, error);
        }

        match self.fields() {
            Some(fields) if errors.is_empty() => Ok(fields),
            _ => Err(errors),
        }
    }

    fn fields(&self) -> Option<ProfileFields> {
        Some(ProfileFields {
            gender: match self.gender.as_deref() {
                None => Gender::default(),
                Some(code) => code.parse::<Gender>().ok()?,
            },
            date_of_birth: self.date_of_birth?,
            contact_number: self.contact_number.as_deref()?.parse().ok()?,
            height: u32::try_from(self.height?).ok()?,
            weight: u32::try_from(self.weight?).ok()?,
            joining_date: self.joining_date,
            goal: match self.goal.as_deref() {
                None => FitnessGoal::default(),
                Some(code) => code.parse::<FitnessGoal>().ok()?,
            },
        })
    }
}

/// Validated, user supplied profile data.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileFields {
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub contact_number: MobileNumber,
    pub height: u32,
    pub weight: u32,
    pub joining_date: Option<NaiveDate>,
    pub goal: FitnessGoal,
}

/// Fitness profile of a user.
///
/// `age` and `bmi` cannot be set directly: they are derived from the profile
/// fields whenever a profile is built or refreshed. Decoding a stored row
/// (`sqlx` feature) or a server response (`serde` feature) keeps the values
/// read. Repository writes take [`ProfileFields`], never a `FitnessProfile`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FitnessProfile {
    #[cfg_attr(feature = "serde", serde(flatten))]
    fields: ProfileFields,
    age: u32,
    bmi: f64,
}

impl FitnessProfile {
    pub fn new(fields: ProfileFields, today: NaiveDate) -> Self {
        let mut profile = Self {
            fields,
            age: 0,
            bmi: 0.0,
        };
        profile.refresh(today);
        profile
    }

    /// Recomputes the derived fields.
    pub fn refresh(&mut self, today: NaiveDate) {
        self.age = compute_age(self.fields.date_of_birth, today);
        self.bmi = compute_bmi(self.fields.height, self.fields.weight);
    }

    pub fn fields(&self) -> &ProfileFields {
        &self.fields
    }
    pub fn gender(&self) -> Gender {
        self.fields.gender
    }
    pub fn date_of_birth(&self) -> NaiveDate {
        self.fields.date_of_birth
    }
    pub fn contact_number(&self) -> MobileNumber {
        self.fields.contact_number
    }
    pub fn height_cm(&self) -> u32 {
        self.fields.height
    }
    pub fn height_m(&self) -> f64 {
        self.fields.height as f64 / 100.0
    }
    pub fn weight_kg(&self) -> u32 {
        self.fields.weight
    }
    pub fn joining_date(&self) -> Option<NaiveDate> {
        self.fields.joining_date
    }
    pub fn goal(&self) -> FitnessGoal {
        self.fields.goal
    }
    pub fn age(&self) -> u32 {
        self.age
    }
    pub fn bmi(&self) -> f64 {
        self.bmi
    }
}

#[cfg(feature = "sqlx")]
mod row {
    use std::str::FromStr;

    use sqlx::{sqlite::SqliteRow, FromRow, Row};

    use super::{FitnessProfile, ProfileFields};

    fn parse_column<T>(row: &SqliteRow, column: &str) -> Result<T, sqlx::Error>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let value: String = row.try_get(column)?;
        value.parse().map_err(|e: T::Err| sqlx::Error::ColumnDecode {
            index: column.to_owned(),
            source: Box::new(e),
        })
    }

    /// Reads the derived values persisted with the profile instead of
    /// recomputing them.
    impl<'r> FromRow<'r, SqliteRow> for FitnessProfile {
        fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
            Ok(Self {
                fields: ProfileFields {
                    gender: parse_column(row, "gender")?,
                    date_of_birth: row.try_get("date_of_birth")?,
                    contact_number: parse_column(row, "contact_number")?,
                    height: row.try_get("height")?,
                    weight: row.try_get("weight")?,
                    joining_date: row.try_get("joining_date")?,
                    goal: parse_column(row, "goal")?,
                },
                age: row.try_get("age")?,
                bmi: row.try_get("bmi")?,
            })
        }
    }
}
