use std::{
    fmt::{self, Debug, Display, Formatter},
    str::FromStr,
};

const LENGTH: usize = 10;

/// A ten digit mobile number.
///
/// Only the ASCII digits `0`-`9` are accepted. Digits from other scripts are
/// rejected even though Unicode classifies them as numeric.
#[derive(Clone, Copy, Eq, Hash, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde_with::SerializeDisplay, serde_with::DeserializeFromStr)
)]
pub struct MobileNumber([u8; LENGTH]);

impl MobileNumber {
    pub const LENGTH: usize = LENGTH;

    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidMobileNumber;

impl Display for InvalidMobileNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Enter a valid {}-digit mobile number.", MobileNumber::LENGTH)
    }
}

impl std::error::Error for InvalidMobileNumber {}

impl Display for MobileNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Debug for MobileNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MobileNumber({})", self.as_str())
    }
}

impl FromStr for MobileNumber {
    type Err = InvalidMobileNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: [u8; LENGTH] = s.as_bytes().try_into().map_err(|_| InvalidMobileNumber)?;
        if digits.iter().all(u8::is_ascii_digit) {
            Ok(Self(digits))
        } else {
            Err(InvalidMobileNumber)
        }
    }
}
