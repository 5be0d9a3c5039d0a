//! Sort direction for ranked listings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::PaginationError;

/// Ordering applied to a listing's ranking key.
///
/// The set is closed, so [`SortDirection::as_sql`] is safe to splice into a
/// statement where a bind parameter cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest ranking key first.
    Asc,
    /// Largest ranking key first.
    #[default]
    Desc,
}

impl SortDirection {
    /// SQL keyword for this direction.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }

    /// Lower-case wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = PaginationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(PaginationError::UnknownSortDirection {
                value: value.to_owned(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("asc", SortDirection::Asc)]
    #[case("DESC", SortDirection::Desc)]
    #[case(" Asc ", SortDirection::Asc)]
    fn parses_known_directions(#[case] raw: &str, #[case] expected: SortDirection) {
        assert_eq!(raw.parse::<SortDirection>().expect("known direction"), expected);
    }

    #[rstest]
    #[case("")]
    #[case("likes; DROP TABLE users")]
    fn rejects_unknown_directions(#[case] raw: &str) {
        assert!(raw.parse::<SortDirection>().is_err());
    }

    #[rstest]
    fn defaults_to_descending() {
        assert_eq!(SortDirection::default(), SortDirection::Desc);
        assert_eq!(SortDirection::default().as_sql(), "DESC");
    }

    #[rstest]
    fn serialises_lowercase() {
        let json = serde_json::to_string(&SortDirection::Asc).expect("serialise");
        assert_eq!(json, "\"asc\"");
    }
}
