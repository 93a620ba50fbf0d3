use std::fmt;
use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, digit0},
    combinator::{all_consuming, opt},
    sequence::{pair, preceded},
    IResult,
};

use crate::core::error::{AmountError, AmountResult};

const MAX_FRACTION_DIGITS: usize = 2;

/// A signed monetary amount with exact, unbounded decimal arithmetic.
///
/// The scale of the text it was parsed from is kept, so `100.00`
/// is written back as `100.00` and `42.5` as `42.5`.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Amount(BigDecimal);

fn fraction(input: &str) -> IResult<&str, &str> {
    take_while_m_n(0, MAX_FRACTION_DIGITS, |c: char| c.is_ascii_digit())(input)
}

/// `[+] DIGIT* [ "." DIGIT{0,2} ]`, split into integer and fraction digits.
/// At least one digit overall is checked by the caller.
fn monetary(input: &str) -> IResult<&str, (&str, &str)> {
    let (rest, (integer, fraction)) = preceded(
        opt(char('+')),
        all_consuming(pair(digit0, opt(preceded(char('.'), fraction))))
    )(input)?;
    Ok((rest, (integer, fraction.unwrap_or_default())))
}

impl Amount {
    pub fn zero() -> Amount {
        Amount(BigDecimal::zero())
    }

    /// Whether `input` (already trimmed and lower-cased) is an amount the
    /// user may enter: a decimal number without a minus sign and with at
    /// most two digits after the point. Magnitude is not limited.
    pub fn is_valid(input: &str) -> bool {
        Amount::parse(input).is_ok()
    }

    pub fn parse(input: &str) -> AmountResult<Amount> {
        let (_, (integer, fraction)) = monetary(input)
            .map_err(|_| AmountError::Invalid(input.to_owned()))?;
        if integer.is_empty() && fraction.is_empty() {
            return Err(AmountError::Invalid(input.to_owned()));
        }

        let integer = if integer.is_empty() { "0" } else { integer };
        let canonical = if fraction.is_empty() {
            integer.to_owned()
        } else {
            format!("{}.{}", integer, fraction)
        };
        BigDecimal::from_str(&canonical)
            .map(Amount)
            .map_err(|_| AmountError::Invalid(input.to_owned()))
    }

    /// Converts the text of a stored ledger cell. Unlike [`Amount::parse`]
    /// this accepts a sign, any number of decimals and scientific notation,
    /// since rows are written signed and the document may be edited by hand.
    pub fn from_cell(text: &str) -> AmountResult<Amount> {
        let text = text.trim();
        BigDecimal::from_str(text)
            .map(Amount)
            .map_err(|_| AmountError::Invalid(text.to_owned()))
    }

    pub fn negate(self) -> Amount {
        Amount(-self.0)
    }

    pub fn is_negative(&self) -> bool {
        self.0 < BigDecimal::zero()
    }

    /// Absolute value rounded half away from zero to whole cents.
    pub(crate) fn cents_magnitude(&self) -> BigDecimal {
        self.0.abs().with_scale_round(MAX_FRACTION_DIGITS as i64, RoundingMode::HalfUp)
    }
}

impl<'a> std::ops::Add<&'a Amount> for Amount {
    type Output = Amount;

    fn add(self, other: &'a Amount) -> Amount {
        Amount(self.0 + &other.0)
    }
}

impl From<BigDecimal> for Amount {
    fn from(value: BigDecimal) -> Self {
        Amount(value)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
