use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::StorageError;

fn ser<E: core::fmt::Display>(key: &str, e: E) -> StorageError {
    StorageError::Serialization(format!("{key}: {e}"))
}

pub(crate) fn encode<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| ser(key, e))
}

pub(crate) fn decode<T: DeserializeOwned>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| ser(key, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use daily_core::model::{CommandId, IdSet};

    #[test]
    fn decode_error_names_the_key() {
        let err = decode::<IdSet>("learned", "{oops").unwrap_err();
        assert!(err.to_string().contains("learned"));
    }

    #[test]
    fn encode_then_decode_keeps_ids() {
        let ids: IdSet = [3, 1].into_iter().map(CommandId::new).collect();
        let raw = encode("favs", &ids).unwrap();
        assert_eq!(raw, "[1,3]");
        assert_eq!(decode::<IdSet>("favs", &raw).unwrap(), ids);
    }
}
