use crate::error::FtlError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrewType {
    #[default]
    FlightCrew,
    CabinCrew,
}

/// In-flight rest facility classes, best (bunk) to worst (seat).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestFacility {
    #[default]
    None,
    Class1,
    Class2,
    Class3,
}

/// Crew carried in addition to the minimum certified crew.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum AdditionalCrew {
    #[default]
    One,
    Two,
}

/// Sector bucket an in-flight rest duty is planned for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestSectors {
    #[default]
    OneOrTwo,
    Three,
}

impl fmt::Display for CrewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrewType::FlightCrew => write!(f, "flight crew"),
            CrewType::CabinCrew => write!(f, "cabin crew"),
        }
    }
}

impl fmt::Display for RestFacility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestFacility::None => write!(f, "none"),
            RestFacility::Class1 => write!(f, "class_1"),
            RestFacility::Class2 => write!(f, "class_2"),
            RestFacility::Class3 => write!(f, "class_3"),
        }
    }
}

impl FromStr for CrewType {
    type Err = FtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "flight" | "fc" | "pilot" => Ok(CrewType::FlightCrew),
            "cabin" | "cc" => Ok(CrewType::CabinCrew),
            _ => Err(FtlError::InvalidValue { field: "crew type", value: s.to_string() }),
        }
    }
}

impl FromStr for RestFacility {
    type Err = FtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(RestFacility::None),
            "1" | "class1" | "class_1" => Ok(RestFacility::Class1),
            "2" | "class2" | "class_2" => Ok(RestFacility::Class2),
            "3" | "class3" | "class_3" => Ok(RestFacility::Class3),
            _ => Err(FtlError::InvalidValue { field: "rest facility", value: s.to_string() }),
        }
    }
}

impl TryFrom<u8> for AdditionalCrew {
    type Error = FtlError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(AdditionalCrew::One),
            2 => Ok(AdditionalCrew::Two),
            _ => Err(FtlError::InvalidValue { field: "additional crew", value: value.to_string() }),
        }
    }
}

impl From<AdditionalCrew> for u8 {
    fn from(value: AdditionalCrew) -> Self {
        match value {
            AdditionalCrew::One => 1,
            AdditionalCrew::Two => 2,
        }
    }
}

impl FromStr for AdditionalCrew {
    type Err = FtlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .map_err(|_| FtlError::InvalidValue { field: "additional crew", value: s.to_string() })
            .and_then(AdditionalCrew::try_from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_additional_crew_serializes_as_count() {
        assert_eq!("2", serde_json::to_string(&AdditionalCrew::Two).unwrap());
        assert_eq!(AdditionalCrew::One, serde_json::from_str::<AdditionalCrew>("1").unwrap());
        assert!(serde_json::from_str::<AdditionalCrew>("3").is_err());
    }

    #[test]
    fn test_parse_prompt_values() {
        assert_eq!(RestFacility::Class2, "2".parse().unwrap());
        assert_eq!(RestFacility::Class3, "CLASS_3".parse().unwrap());
        assert_eq!(CrewType::CabinCrew, "cabin".parse().unwrap());
        assert!("bunk".parse::<RestFacility>().is_err());
        assert!("0".parse::<AdditionalCrew>().is_err());
    }
}
