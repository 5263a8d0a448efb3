// used to recognize the accepted date layouts
use lazy_static::lazy_static;
use regex::Regex;

// used when parsing tokens into data types
use std::str::FromStr;
// used to print out readable forms of a data type
use std::fmt;

use crate::error::{GeneaError, Result};

lazy_static! {
    static ref DAY_MONTH_YEAR: Regex = Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{3,4})$").unwrap();
    static ref MONTH_YEAR: Regex = Regex::new(r"^(\d{1,2})/(\d{3,4})$").unwrap();
    static ref YEAR: Regex = Regex::new(r"^(\d{3,4})$").unwrap();
}

// ------------- Sex -------------
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug)]
pub enum Sex {
    Male,
    Female,
}
impl Sex {
    pub fn letter(&self) -> char {
        match self {
            Sex::Male => 'M',
            Sex::Female => 'F',
        }
    }
}
impl FromStr for Sex {
    type Err = GeneaError;
    fn from_str(s: &str) -> Result<Sex> {
        match s {
            "M" => Ok(Sex::Male),
            "F" => Ok(Sex::Female),
            _ => Err(GeneaError::InvalidSex(s.to_string())),
        }
    }
}
impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

// ------------- Date -------------
// A calendar date where only the trailing components may be known.
// The variants make "day without month" or "month without year" unrepresentable.
#[derive(Eq, PartialEq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default)]
pub enum Date {
    #[default]
    Unknown,
    Year(u16),
    YearMonth(u16, u8),
    Full(u16, u8, u8),
}
impl Date {
    pub const UNKNOWN: &'static str = "?";

    pub fn year(&self) -> Option<u16> {
        match *self {
            Date::Unknown => None,
            Date::Year(y) | Date::YearMonth(y, _) | Date::Full(y, _, _) => Some(y),
        }
    }
    pub fn month(&self) -> Option<u8> {
        match *self {
            Date::YearMonth(_, m) | Date::Full(_, m, _) => Some(m),
            _ => None,
        }
    }
    pub fn day(&self) -> Option<u8> {
        match *self {
            Date::Full(_, _, d) => Some(d),
            _ => None,
        }
    }
}
impl FromStr for Date {
    type Err = GeneaError;
    // Most specific layout first, the unknown sentinel last.
    fn from_str(s: &str) -> Result<Date> {
        let invalid = || GeneaError::InvalidDate(s.to_string());
        if let Some(c) = DAY_MONTH_YEAR.captures(s) {
            return Ok(Date::Full(
                c[3].parse().map_err(|_| invalid())?,
                c[2].parse().map_err(|_| invalid())?,
                c[1].parse().map_err(|_| invalid())?,
            ));
        }
        if let Some(c) = MONTH_YEAR.captures(s) {
            return Ok(Date::YearMonth(
                c[2].parse().map_err(|_| invalid())?,
                c[1].parse().map_err(|_| invalid())?,
            ));
        }
        if let Some(c) = YEAR.captures(s) {
            return Ok(Date::Year(c[1].parse().map_err(|_| invalid())?));
        }
        if s == Date::UNKNOWN {
            return Ok(Date::Unknown);
        }
        Err(invalid())
    }
}
impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Date::Unknown => write!(f, "{}", Date::UNKNOWN),
            Date::Year(y) => write!(f, "{}", y),
            Date::YearMonth(y, m) => write!(f, "{}/{}", m, y),
            Date::Full(y, m, d) => write!(f, "{}/{}/{}", d, m, y),
        }
    }
}

// ------------- Death -------------
// Whether a death has been recorded at all is distinct from its date being
// unknown: `Known(Date::Unknown)` is a person known to be dead at an unknown date.
#[derive(Eq, PartialEq, Hash, Clone, Copy, Debug, Default)]
pub enum Death {
    #[default]
    Unknown,
    Known(Date),
}
impl Death {
    pub fn date(&self) -> Option<&Date> {
        match self {
            Death::Known(date) => Some(date),
            Death::Unknown => None,
        }
    }
}
impl fmt::Display for Death {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Death::Known(date) => write!(f, "{}", date),
            Death::Unknown => Ok(()),
        }
    }
}
