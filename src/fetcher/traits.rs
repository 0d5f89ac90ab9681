use crate::model::FetchError;

/// Source of the raw price index response body.
pub trait IndexSource {
    fn fetch(&self) -> Result<String, FetchError>;
}
