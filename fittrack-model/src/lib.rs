pub mod choices;
#[cfg(feature = "serde")]
pub mod input;
pub mod mobile_number;
pub mod profile;
pub mod user;
pub mod validation;

pub use validator;
