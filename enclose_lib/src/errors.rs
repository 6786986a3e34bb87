#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The construction API was given a lower bound above the upper
    /// bound, or a bound value that is not a real number.  Arithmetic
    /// never produces this: every operation builds its result from case
    /// splits that respect the bound ordering.
    #[error("invalid bounds: {0}")]
    InvalidBounds(String),

    /// The whole input interval lies outside the mathematical domain of
    /// an elementary function.  Partial overlap does not raise; the
    /// input is silently restricted to the valid sub-domain.
    #[error("{func}: {input} is entirely outside the domain")]
    DomainError { func: &'static str, input: String },
}
