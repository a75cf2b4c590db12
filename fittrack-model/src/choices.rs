use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Gender of a user, stored and transmitted as a single letter code.
#[derive(Clone, Copy, Debug, Default, Display, EnumIter, EnumString, Eq, IntoStaticStr, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
pub enum Gender {
    #[default]
    #[strum(serialize = "M")]
    Male,
    #[strum(serialize = "F")]
    Female,
    #[strum(serialize = "O")]
    Other,
    #[strum(serialize = "N")]
    PreferNotToSay,
}

impl Gender {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer Not to Say",
        }
    }
}

/// Training goal of a user, stored and transmitted as a two letter code.
/// Defaults to general fitness when a profile does not name one.
#[derive(Clone, Copy, Debug, Default, Display, EnumIter, EnumString, Eq, IntoStaticStr, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
pub enum FitnessGoal {
    #[strum(serialize = "WL")]
    WeightLoss,
    #[default]
    #[strum(serialize = "GF")]
    GeneralFitness,
    #[strum(serialize = "SF")]
    SportsFitness,
    #[strum(serialize = "WG")]
    WeightGain,
    #[strum(serialize = "BR")]
    BodyRecomposition,
}

impl FitnessGoal {
    pub fn code(&self) -> &'static str {
        self.into()
    }

    pub fn label(&self) -> &'static str {
        match self {
            FitnessGoal::WeightLoss => "Weight Loss",
            FitnessGoal::GeneralFitness => "General Fitness",
            FitnessGoal::SportsFitness => "Sports Fitness",
            FitnessGoal::WeightGain => "Weight Gain",
            FitnessGoal::BodyRecomposition => "Body Recomposition",
        }
    }
}
