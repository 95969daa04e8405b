//! # Export and Import Flows
//!
//! A persistence or transport layer only ever sees two things: the sparse
//! bit-index list and the serialized filter. These tests play that layer.

#[cfg(test)]
mod tests {
    use dbf_filter::{
        DistributedBloomFilter, FilterConfig, FilterError, NoOpMetrics, SharedFilter,
    };
    use std::sync::Arc;

    use crate::init_tracing;

    #[test]
    fn test_bit_indices_survive_json_transport() {
        init_tracing();
        let mut sender = DistributedBloomFilter::new(b"seed", 10, 0.5).unwrap();
        sender.add(b"something");
        sender.add(b"something else");

        // The transport layer picks its own wire format
        let wire = serde_json::to_string(&sender.bit_indices()).unwrap();
        assert_eq!(wire, "[0,2,4,8]");

        let received: Vec<usize> = serde_json::from_str(&wire).unwrap();
        let mut receiver = DistributedBloomFilter::new(b"seed", 10, 0.5).unwrap();
        receiver.merge_bit_indices(&received).unwrap();

        assert!(receiver.might_contain(b"something"));
        assert!(receiver.might_contain(b"something else"));
        assert_eq!(receiver.bit_indices(), sender.bit_indices());
    }

    #[test]
    fn test_snapshot_from_other_size_rejected() {
        init_tracing();
        let mut large = DistributedBloomFilter::new(b"seed", 1_000, 0.01).unwrap();
        for i in 0..200 {
            large.add(format!("item_{}", i).as_bytes());
        }
        let mut small = DistributedBloomFilter::new(b"seed", 10, 0.5).unwrap();

        let result = small.merge_bit_indices(&large.bit_indices());
        assert!(matches!(result, Err(FilterError::IndexOutOfRange { size: 15, .. })));
        assert!(small.bit_indices().is_empty());
    }

    #[test]
    fn test_serialized_filter_restores_on_another_node() {
        init_tracing();
        let config = FilterConfig::from_json(
            r#"{"expected_elements": 250, "target_fpr": 0.02, "max_size_bits": 100000}"#,
        )
        .unwrap();
        let origin = SharedFilter::new(b"persisted", &config).unwrap();
        for i in 0..250 {
            origin.add(format!("entry_{}", i).as_bytes());
        }

        let bytes = origin.snapshot().to_bytes().unwrap();
        let restored = DistributedBloomFilter::from_bytes(&bytes).unwrap();
        let resumed = SharedFilter::from_filter(restored, Arc::new(NoOpMetrics));

        assert_eq!(resumed.bit_indices(), origin.bit_indices());
        for i in 0..250 {
            assert!(resumed.might_contain(format!("entry_{}", i).as_bytes()));
        }

        // A fresh node with the same seed can still merge the restored state
        let fresh = DistributedBloomFilter::from_config(b"persisted", &config).unwrap();
        assert!(fresh.is_compatible(&resumed.snapshot()));
    }

    #[test]
    fn test_json_filter_with_mismatched_size_rejected() {
        init_tracing();
        let mut sender = DistributedBloomFilter::with_params(b"seed", 16, 2).unwrap();
        sender.add(b"payload");
        let wire = serde_json::to_string(&sender).unwrap();

        let received: DistributedBloomFilter = serde_json::from_str(&wire).unwrap();
        assert_eq!(received.bit_indices(), sender.bit_indices());

        // A receiver trusting this m would index past the 16-bit array
        let tampered = wire.replace("\"m\":16", "\"m\":4096");
        assert_ne!(tampered, wire);
        let result = serde_json::from_str::<DistributedBloomFilter>(&tampered)
            .map_err(FilterError::from);
        assert!(matches!(result, Err(FilterError::Serialization(_))));
    }

    #[test]
    fn test_truncated_bytes_rejected() {
        let filter = DistributedBloomFilter::new(b"seed", 100, 0.1).unwrap();
        let bytes = filter.to_bytes().unwrap();

        let result = DistributedBloomFilter::from_bytes(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(FilterError::Serialization(_))));
    }
}
