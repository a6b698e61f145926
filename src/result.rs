/// Short hand for a result (or an [`crate::error::FpeError`]).
pub type Result<T> = std::result::Result<T, crate::error::FpeError>;
