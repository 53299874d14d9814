/// Error enumeration shared by the document-store ports.
///
/// The remote store surfaces failures as message strings; callers render
/// them verbatim and do not retry.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}
