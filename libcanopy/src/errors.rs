use crate::SourceId;

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// a tuning parameter lies outside its documented range
    #[error("invalid value for {param}: {value}")]
    InvalidParameter { param: &'static str, value: String },

    /// a source in the input stream cannot be indexed
    #[error("source {source_id}: {reason}")]
    InvalidSource {
        source_id: SourceId,
        reason: &'static str,
    },

    /// a structural guarantee of the builder failed to hold; always a defect
    #[error("broken invariant: {0}")]
    InvariantViolation(String),
}
