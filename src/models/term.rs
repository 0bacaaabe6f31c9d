//! Term ordering algebra.
//!
//! Terms are totally ordered by `(year, season rank)` with the season rank
//! fixed as Spring < Summer < Summer1 < Summer2 < Fall. Generic (catalog)
//! terms instead rank seasons in school-year order, Fall first. The
//! `Transfer` term holds unplaced transfer credit and sorts before every
//! real term.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic seasons in rank order.
///
/// The derived `Ord` is the season rank used for term comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Season {
    #[serde(rename = "S")]
    Spring,
    #[serde(rename = "Su")]
    Summer,
    #[serde(rename = "Su1")]
    Summer1,
    #[serde(rename = "Su2")]
    Summer2,
    #[serde(rename = "F")]
    Fall,
}

/// The default season policy: skip summer terms entirely.
pub const SKIP_SUMMER: &[Season] = &[Season::Spring, Season::Fall];

/// Season policy including the full summer term but not its halves.
pub const WITH_SUMMER: &[Season] = &[Season::Spring, Season::Summer, Season::Fall];

/// Every season, half terms included.
pub const ALL_SEASONS: &[Season] = &[
    Season::Spring,
    Season::Summer,
    Season::Summer1,
    Season::Summer2,
    Season::Fall,
];

impl Season {
    /// Short label code ("S", "Su", "Su1", "Su2", "F").
    pub fn code(&self) -> &'static str {
        match self {
            Season::Spring => "S",
            Season::Summer => "Su",
            Season::Summer1 => "Su1",
            Season::Summer2 => "Su2",
            Season::Fall => "F",
        }
    }

    /// Parse a season code or full name.
    ///
    /// Accepts the abbreviation and full-name aliases used in catalogs and
    /// transcripts ("F"/"Fall", "Su1"/"Summer1", ...).
    pub fn parse(s: &str) -> Result<Season> {
        match s {
            "S" | "Spring" => Ok(Season::Spring),
            "Su" | "Summer" => Ok(Season::Summer),
            "Su1" | "Summer1" => Ok(Season::Summer1),
            "Su2" | "Summer2" => Ok(Season::Summer2),
            "F" | "Fall" => Ok(Season::Fall),
            _ => Err(Error::InvalidFormat(format!(
                "unrecognized season: {s} (expected one of F, S, Su, Su1, Su2)"
            ))),
        }
    }
}

impl FromStr for Season {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Season::parse(s)
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A term label: either the transfer-credit bucket or a (year, season) pair.
///
/// Years below 100 are *generic* terms ("2S" = second year, Spring), used by
/// catalogs before a student's calendar is known. Calendar years are always
/// four digits after normalization, so the two forms cannot collide.
///
/// Ordering: calendar terms follow the season rank within a year. Generic
/// terms follow the school year instead, which is the lexicographic order of
/// their labels: "1F" < "1S" < "2F" (fall starts the school year).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Term {
    /// Unplaced transfer credit. Sorts before all real terms.
    Transfer,
    At {
        year: u16,
        season: Season,
    },
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        // School-year season order, i.e. label-lexicographic.
        fn generic_rank(season: Season) -> u8 {
            match season {
                Season::Fall => 0,
                Season::Spring => 1,
                Season::Summer => 2,
                Season::Summer1 => 3,
                Season::Summer2 => 4,
            }
        }

        match (self, other) {
            (Term::Transfer, Term::Transfer) => Ordering::Equal,
            (Term::Transfer, _) => Ordering::Less,
            (_, Term::Transfer) => Ordering::Greater,
            (
                Term::At { year: y1, season: s1 },
                Term::At { year: y2, season: s2 },
            ) => y1.cmp(y2).then_with(|| {
                if *y1 < 100 {
                    generic_rank(*s1).cmp(&generic_rank(*s2))
                } else {
                    s1.cmp(s2)
                }
            }),
        }
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Term {
    pub fn at(year: u16, season: Season) -> Term {
        Term::At { year, season }
    }

    /// A generic (catalog-relative) term such as "2S".
    pub fn generic(ordinal: u16, season: Season) -> Term {
        Term::At {
            year: ordinal,
            season,
        }
    }

    /// Normalize loose year/season strings into a term label.
    ///
    /// Two-digit years are assumed to be in the 2000s. The season accepts
    /// the alias table from [`Season::parse`]. "Transfer" in either position
    /// maps to the transfer bucket.
    pub fn normalize(year: &str, season: &str) -> Result<Term> {
        if year == "Transfer" || season == "Transfer" {
            return Ok(Term::Transfer);
        }
        let year = normalize_year(year)?;
        Ok(Term::At {
            year,
            season: Season::parse(season)?,
        })
    }

    /// Whether this is a catalog-relative term ("1F", "2S", ...).
    pub fn is_generic(&self) -> bool {
        matches!(self, Term::At { year, .. } if *year < 100)
    }

    pub fn season(&self) -> Option<Season> {
        match self {
            Term::Transfer => None,
            Term::At { season, .. } => Some(*season),
        }
    }

    /// The next term whose season is in `allowed`, rolling the year forward
    /// when the allowed seasons for the current year are exhausted.
    ///
    /// `Transfer` is a fixed point.
    pub fn successor(self, allowed: &[Season]) -> Term {
        let Term::At { year, season } = self else {
            return self;
        };
        if allowed.is_empty() {
            return self;
        }
        match allowed.iter().copied().filter(|s| *s > season).min() {
            Some(next) => Term::At { year, season: next },
            None => Term::At {
                year: year + 1,
                season: allowed.iter().copied().min().unwrap(),
            },
        }
    }

    /// The previous term whose season is in `allowed`. Inverse of
    /// [`Term::successor`] under a matching policy, away from boundaries.
    pub fn predecessor(self, allowed: &[Season]) -> Term {
        let Term::At { year, season } = self else {
            return self;
        };
        if allowed.is_empty() {
            return self;
        }
        match allowed.iter().copied().filter(|s| *s < season).max() {
            Some(prev) => Term::At { year, season: prev },
            None => Term::At {
                year: year.saturating_sub(1),
                season: allowed.iter().copied().max().unwrap(),
            },
        }
    }

    /// Strict "before" comparison; `inclusive` also accepts equality.
    pub fn is_earlier(&self, other: &Term, inclusive: bool) -> bool {
        if inclusive {
            self <= other
        } else {
            self < other
        }
    }
}

fn normalize_year(year: &str) -> Result<u16> {
    if year.is_empty() || !year.chars().all(|c| c.is_ascii_digit()) {
        return Err(Error::InvalidFormat(format!("malformed year: {year:?}")));
    }
    match year.len() {
        2 => Ok(2000 + year.parse::<u16>().unwrap()),
        4 => {
            let year_num = year.parse::<u16>().unwrap();
            // Years below 100 are the generic-term range.
            if year_num < 100 {
                return Err(Error::InvalidFormat(format!(
                    "calendar year out of range: {year:?}"
                )));
            }
            Ok(year_num)
        }
        _ => Err(Error::InvalidFormat(format!(
            "year must be 2 or 4 digits: {year:?}"
        ))),
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Transfer => write!(f, "Transfer"),
            Term::At { year, season } if *year < 100 => write!(f, "{year}{season}"),
            Term::At { year, season } => write!(f, "{year:04}-{season}"),
        }
    }
}

impl FromStr for Term {
    type Err = Error;

    fn from_str(s: &str) -> Result<Term> {
        if s == "Transfer" {
            return Ok(Term::Transfer);
        }
        if let Some((year, season)) = s.split_once('-') {
            return Term::normalize(year, season);
        }
        // Generic form: leading ordinal digits followed by a season code.
        let digits: String = s.chars().take_while(|c| c.is_ascii_digit()).collect();
        let rest = &s[digits.len()..];
        if digits.is_empty() || rest.is_empty() {
            return Err(Error::InvalidFormat(format!("unrecognized term: {s:?}")));
        }
        let ordinal: u16 = digits
            .parse()
            .map_err(|_| Error::InvalidFormat(format!("unrecognized term: {s:?}")))?;
        if ordinal >= 100 {
            return Err(Error::InvalidFormat(format!(
                "generic term ordinal out of range: {s:?}"
            )));
        }
        Ok(Term::generic(ordinal, Season::parse(rest)?))
    }
}

impl From<Term> for String {
    fn from(t: Term) -> String {
        t.to_string()
    }
}

impl TryFrom<String> for Term {
    type Error = Error;

    fn try_from(s: String) -> Result<Term> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_rank_order() {
        assert!(Season::Spring < Season::Summer);
        assert!(Season::Summer < Season::Summer1);
        assert!(Season::Summer1 < Season::Summer2);
        assert!(Season::Summer2 < Season::Fall);
    }

    #[test]
    fn test_season_aliases() {
        assert_eq!(Season::parse("Fall").unwrap(), Season::Fall);
        assert_eq!(Season::parse("F").unwrap(), Season::Fall);
        assert_eq!(Season::parse("Summer1").unwrap(), Season::Summer1);
        assert!(Season::parse("Winter").is_err());
    }

    #[test]
    fn test_normalize_two_digit_year() {
        assert_eq!(
            Term::normalize("25", "Spring").unwrap(),
            Term::at(2025, Season::Spring)
        );
        assert_eq!(
            Term::normalize("2025", "S").unwrap(),
            Term::at(2025, Season::Spring)
        );
        assert_eq!(Term::normalize("Transfer", "Fall").unwrap(), Term::Transfer);
        assert_eq!(Term::normalize("2025", "Transfer").unwrap(), Term::Transfer);
    }

    #[test]
    fn test_normalize_rejects_malformed_year() {
        assert!(Term::normalize("20x5", "F").is_err());
        assert!(Term::normalize("202", "F").is_err());
        assert!(Term::normalize("", "F").is_err());
        // Four-digit years below 100 would collide with generic terms.
        assert!(Term::normalize("0025", "F").is_err());
        assert!(Term::normalize("0000", "F").is_err());
    }

    #[test]
    fn test_normalize_is_idempotent_through_display() {
        for term in [
            Term::at(2024, Season::Fall),
            Term::at(2025, Season::Summer1),
            Term::generic(2, Season::Spring),
            Term::Transfer,
        ] {
            let reparsed: Term = term.to_string().parse().unwrap();
            assert_eq!(reparsed, term);
            // And again, to make sure the round trip is stable.
            assert_eq!(reparsed.to_string().parse::<Term>().unwrap(), term);
        }
    }

    #[test]
    fn test_display_forms() {
        assert_eq!(Term::at(2024, Season::Fall).to_string(), "2024-F");
        assert_eq!(Term::generic(1, Season::Fall).to_string(), "1F");
        assert_eq!(Term::Transfer.to_string(), "Transfer");
    }

    #[test]
    fn test_parse_generic_form() {
        assert_eq!(
            "2S".parse::<Term>().unwrap(),
            Term::generic(2, Season::Spring)
        );
        assert!("2S".parse::<Term>().unwrap().is_generic());
        assert!(!"2024-S".parse::<Term>().unwrap().is_generic());
        assert!("F".parse::<Term>().is_err());
        assert!("12".parse::<Term>().is_err());
    }

    #[test]
    fn test_total_order() {
        let spring = Term::at(2024, Season::Spring);
        let fall = Term::at(2024, Season::Fall);
        let next_spring = Term::at(2025, Season::Spring);

        assert!(spring < fall);
        assert!(fall < next_spring);
        assert!(Term::Transfer < spring);
        assert!(Term::Transfer < Term::generic(1, Season::Fall));
    }

    #[test]
    fn test_generic_terms_order_by_school_year() {
        // Fall starts the school year, so "1F" precedes "1S".
        assert!(Term::generic(1, Season::Fall) < Term::generic(1, Season::Spring));
        assert!(Term::generic(1, Season::Spring) < Term::generic(2, Season::Fall));
        // Calendar terms keep the season rank within the year.
        assert!(Term::at(2024, Season::Spring) < Term::at(2024, Season::Fall));
    }

    #[test]
    fn test_is_earlier_strictness() {
        let a = Term::at(2024, Season::Spring);
        let b = Term::at(2024, Season::Fall);

        assert!(a.is_earlier(&b, false));
        assert!(!b.is_earlier(&a, false));
        assert!(a.is_earlier(&a, true));
        assert!(!a.is_earlier(&a, false));
    }

    #[test]
    fn test_successor_skip_summer() {
        let spring = Term::at(2024, Season::Spring);
        assert_eq!(
            spring.successor(SKIP_SUMMER),
            Term::at(2024, Season::Fall)
        );
        assert_eq!(
            Term::at(2024, Season::Fall).successor(SKIP_SUMMER),
            Term::at(2025, Season::Spring)
        );
        // A summer term not in the allowed set advances to fall.
        assert_eq!(
            Term::at(2024, Season::Summer).successor(SKIP_SUMMER),
            Term::at(2024, Season::Fall)
        );
    }

    #[test]
    fn test_successor_with_summer() {
        assert_eq!(
            Term::at(2024, Season::Spring).successor(WITH_SUMMER),
            Term::at(2024, Season::Summer)
        );
        assert_eq!(
            Term::at(2024, Season::Summer).successor(WITH_SUMMER),
            Term::at(2024, Season::Fall)
        );
    }

    #[test]
    fn test_predecessor_inverts_successor() {
        for policy in [SKIP_SUMMER, WITH_SUMMER, ALL_SEASONS] {
            let mut term = Term::at(2024, Season::Fall);
            for _ in 0..6 {
                let next = term.successor(policy);
                assert_eq!(next.predecessor(policy), term);
                term = next;
            }
        }
    }

    #[test]
    fn test_transfer_is_fixed_point() {
        assert_eq!(Term::Transfer.successor(SKIP_SUMMER), Term::Transfer);
        assert_eq!(Term::Transfer.predecessor(SKIP_SUMMER), Term::Transfer);
    }
}
