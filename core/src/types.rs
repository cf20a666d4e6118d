//! Core vocabulary types for the burrito club domain.
//!
//! Every type here has a stable wire representation used by the flat row
//! codec (see [`crate::codec`]): enums encode to fixed snake_case tags,
//! `OrderDate` to `yyyy-mm-dd`, `Money` to its minor-unit integer string.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error produced when parsing a wire string into a vocabulary type fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value:?}")]
pub struct ParseValueError {
    /// Which vocabulary type rejected the input.
    pub kind: &'static str,
    /// The offending input.
    pub value: String,
}

impl ParseValueError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Identifier of a chat-platform user.
///
/// The chat platform authenticates users before commands reach the core, so
/// this is an opaque, trusted string (e.g. `"U1337"`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new `UserId` from a string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for UserId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Calendar date used as the unique business key of an order.
///
/// Wire format is strictly `yyyy-mm-dd`. Parsing rejects both malformed
/// shapes (`"2019-1-1"`, `"201-01-01"`) and impossible dates (`"2019-11-666"`).
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct OrderDate(NaiveDate);

impl OrderDate {
    /// Creates an `OrderDate` from an already-validated calendar date.
    #[must_use]
    pub const fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Returns the underlying calendar date.
    #[must_use]
    pub const fn as_naive(self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for OrderDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for OrderDate {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // chrono alone accepts unpadded fields, so enforce the shape first.
        let bytes = s.as_bytes();
        let shape_ok = bytes.len() == 10
            && bytes[4] == b'-'
            && bytes[7] == b'-'
            && bytes
                .iter()
                .enumerate()
                .all(|(i, b)| matches!(i, 4 | 7) || b.is_ascii_digit());
        if !shape_ok {
            return Err(ParseValueError::new("order date", s));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(Self)
            .map_err(|_| ParseValueError::new("order date", s))
    }
}

/// Money amount in minor currency units (grosze), kept integral to avoid
/// floating-point drift.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates a money amount from minor currency units.
    #[must_use]
    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    /// Returns the amount in minor currency units.
    #[must_use]
    pub const fn minor(self) -> i64 {
        self.0
    }

    /// Human-readable major-unit rendering with a comma decimal separator
    /// and no trailing zero fraction: `2430` → `"24,3"`, `4242` → `"42,42"`,
    /// `100` → `"1"`, `-2430` → `"-24,3"`.
    #[must_use]
    pub fn readable(self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let major = abs / 100;
        let frac = abs % 100;
        if frac == 0 {
            format!("{sign}{major}")
        } else if frac % 10 == 0 {
            format!("{sign}{major},{}", frac / 10)
        } else {
            format!("{sign}{major},{frac:02}")
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.readable())
    }
}

impl std::ops::Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Sub for Money {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, std::ops::Add::add)
    }
}

impl FromStr for Money {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|_| ParseValueError::new("money amount", s))
    }
}

/// The four things the shop sells.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    /// Large burrito, drink included.
    BigBurrito,
    /// Small burrito, no drink.
    SmallBurrito,
    /// Single quesadilla, no drink.
    Quesadilla,
    /// Double quesadilla, drink included.
    DoubleQuesadilla,
}

impl ItemType {
    /// All item types, in menu order.
    pub const ALL: [Self; 4] = [
        Self::BigBurrito,
        Self::SmallBurrito,
        Self::Quesadilla,
        Self::DoubleQuesadilla,
    ];

    /// Stable wire tag of this item type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BigBurrito => "big_burrito",
            Self::SmallBurrito => "small_burrito",
            Self::Quesadilla => "quesadilla",
            Self::DoubleQuesadilla => "double_quesadilla",
        }
    }

    /// Whether this item comes with a drink choice.
    #[must_use]
    pub const fn includes_drink(self) -> bool {
        matches!(self, Self::BigBurrito | Self::DoubleQuesadilla)
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "big_burrito" => Ok(Self::BigBurrito),
            "small_burrito" => Ok(Self::SmallBurrito),
            "quesadilla" => Ok(Self::Quesadilla),
            "double_quesadilla" => Ok(Self::DoubleQuesadilla),
            other => Err(ParseValueError::new("item type", other)),
        }
    }
}

/// Filling choice, common to every item type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Filling {
    /// Beef ("wół" on the SMS).
    Beef,
    /// Pork ("wieprz").
    Pork,
    /// Chicken ("kura").
    Chicken,
    /// Vegetables ("wege").
    Vegetables,
}

impl Filling {
    /// All fillings, in dialog order.
    pub const ALL: [Self; 4] = [Self::Beef, Self::Pork, Self::Chicken, Self::Vegetables];

    /// Stable wire tag of this filling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Beef => "beef",
            Self::Pork => "pork",
            Self::Chicken => "chicken",
            Self::Vegetables => "vegetables",
        }
    }
}

impl fmt::Display for Filling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Filling {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "beef" => Ok(Self::Beef),
            "pork" => Ok(Self::Pork),
            "chicken" => Ok(Self::Chicken),
            "vegetables" => Ok(Self::Vegetables),
            other => Err(ParseValueError::new("filling", other)),
        }
    }
}

/// Sauce choice; the shop numbers its sauces 1 through 7.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Sauce(u8);

impl Sauce {
    /// Creates a sauce from its menu number.
    ///
    /// # Errors
    ///
    /// Returns `ParseValueError` when the number is outside 1..=7.
    pub fn new(number: u8) -> Result<Self, ParseValueError> {
        if (1..=7).contains(&number) {
            Ok(Self(number))
        } else {
            Err(ParseValueError {
                kind: "sauce",
                value: number.to_string(),
            })
        }
    }

    /// Returns the menu number of this sauce.
    #[must_use]
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Sauce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Sauce {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u8>()
            .map_err(|_| ParseValueError::new("sauce", s))
            .and_then(Self::new)
    }
}

/// Drink choice for the item types that include one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drink {
    /// Mango lemonade ("mango").
    Mangolade,
    /// Plain lemonade ("lemon").
    Lemonade,
}

impl Drink {
    /// All drinks, in dialog order.
    pub const ALL: [Self; 2] = [Self::Mangolade, Self::Lemonade];

    /// Stable wire tag of this drink.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mangolade => "mangolade",
            Self::Lemonade => "lemonade",
        }
    }
}

impl fmt::Display for Drink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Drink {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mangolade" => Ok(Self::Mangolade),
            "lemonade" => Ok(Self::Lemonade),
            other => Err(ParseValueError::new("drink", other)),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect
mod tests {
    use super::*;

    mod order_date_tests {
        use super::*;

        #[test]
        fn parses_well_formed_date() {
            let date: OrderDate = "2019-11-01".parse().expect("date should parse");
            assert_eq!(date.to_string(), "2019-11-01");
        }

        #[test]
        fn rejects_malformed_shapes() {
            for input in ["2019-11-666", "201-01-01", "2019-1-1", "2019-0x-01", "", "order"] {
                assert!(input.parse::<OrderDate>().is_err(), "accepted {input:?}");
            }
        }

        #[test]
        fn rejects_impossible_date() {
            assert!("2019-13-01".parse::<OrderDate>().is_err());
            assert!("2019-02-30".parse::<OrderDate>().is_err());
        }
    }

    mod money_tests {
        use super::*;

        #[test]
        fn readable_drops_trailing_zero_fraction() {
            assert_eq!(Money::from_minor(2430).readable(), "24,3");
            assert_eq!(Money::from_minor(4242).readable(), "42,42");
            assert_eq!(Money::from_minor(100).readable(), "1");
            assert_eq!(Money::from_minor(30).readable(), "0,3");
            assert_eq!(Money::from_minor(0).readable(), "0");
        }

        #[test]
        fn readable_handles_negative_amounts() {
            assert_eq!(Money::from_minor(-2430).readable(), "-24,3");
            assert_eq!(Money::from_minor(-5).readable(), "-0,05");
        }

        #[test]
        fn arithmetic() {
            let a = Money::from_minor(1710);
            let b = Money::from_minor(720);
            assert_eq!(a + b, Money::from_minor(2430));
            assert_eq!(a - b, Money::from_minor(990));
            assert_eq!([a, b].into_iter().sum::<Money>(), Money::from_minor(2430));
        }
    }

    mod vocabulary_tests {
        use super::*;

        #[test]
        fn item_type_wire_tags_round_trip() {
            for item in ItemType::ALL {
                assert_eq!(item.as_str().parse::<ItemType>().unwrap(), item);
            }
        }

        #[test]
        fn drink_included_only_for_large_items() {
            assert!(ItemType::BigBurrito.includes_drink());
            assert!(ItemType::DoubleQuesadilla.includes_drink());
            assert!(!ItemType::SmallBurrito.includes_drink());
            assert!(!ItemType::Quesadilla.includes_drink());
        }

        #[test]
        fn sauce_accepts_menu_range_only() {
            assert!(Sauce::new(0).is_err());
            assert!(Sauce::new(8).is_err());
            for n in 1..=7 {
                assert_eq!(Sauce::new(n).unwrap().number(), n);
            }
            assert_eq!("7".parse::<Sauce>().unwrap(), Sauce::new(7).unwrap());
            assert!("x".parse::<Sauce>().is_err());
        }

        #[test]
        fn filling_and_drink_parse() {
            assert_eq!("beef".parse::<Filling>().unwrap(), Filling::Beef);
            assert_eq!("mangolade".parse::<Drink>().unwrap(), Drink::Mangolade);
            assert!("water".parse::<Drink>().is_err());
        }
    }
}
