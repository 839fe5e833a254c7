use serde::de::DeserializeOwned;
use crate::error::Result;

/// Decodes a JSON array into records of type `T`, keeping the order of the array. \
/// Decoding is all or nothing: one bad element fails the whole body.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<Vec<T>> {
    let items: Vec<T> = serde_json::from_slice(bytes)?;
    log::trace!("Decoded {} items", items.len());
    Ok(items)
}
