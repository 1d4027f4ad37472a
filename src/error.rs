pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Trapezoidal integration is undefined below two samples.
    #[error("at least 2 power samples are required, got {0}")]
    TooFewSamples(usize),

    /// A timestamp string the upstream coercion could not parse.
    #[error(transparent)]
    Timestamp(#[from] chrono::ParseError),
}
