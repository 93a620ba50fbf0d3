use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmountError {
    /// Occurs when the text is not an unsigned decimal number
    /// with at most two digits after the point.
    #[error("not a valid monetary amount: '{0}'")]
    Invalid(String)
}

pub type AmountResult<T> = Result<T, AmountError>;
