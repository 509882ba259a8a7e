use gateway_types::StoreError;

const LEVEL: i32 = 3;

pub(crate) fn compress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    zstd::encode_all(data, LEVEL).map_err(|e| StoreError::Compression(e.to_string()))
}

pub(crate) fn decompress(data: &[u8]) -> Result<Vec<u8>, StoreError> {
    zstd::decode_all(data).map_err(|e| StoreError::Compression(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_round_trip() {
        let key = b"q3Vt0m8vJ6c7qfZ1Jx0kY2m8Qy3w6c5aTz9rB1nL4sE=";
        let packed = compress(key).unwrap();
        assert_eq!(decompress(&packed).unwrap(), key);
    }

    #[test]
    fn test_decompress_garbage_fails() {
        assert!(matches!(
            decompress(b"definitely not zstd"),
            Err(StoreError::Compression(_))
        ));
    }
}
