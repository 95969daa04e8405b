//! # Independent Participant Flows
//!
//! Several nodes build filters on their own from a shared seed and must
//! land on identical bit arrays without exchanging anything but that seed.

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use rand::{Rng, SeedableRng};
    use rand::rngs::StdRng;

    use dbf_filter::{
        combine, element_hashes, joint_seed, seed_hashes, DistributedBloomFilter,
        DistributedFilterApi, FilterConfigBuilder, Metrics, SharedFilter, ZERO_DIGEST,
    };

    use crate::init_tracing;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn random_elements(rng: &mut StdRng, count: usize) -> Vec<Vec<u8>> {
        (0..count)
            .map(|_| {
                let len = rng.gen_range(1..48);
                (0..len).map(|_| rng.gen()).collect()
            })
            .collect()
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_independent_nodes_build_identical_filters() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(7);
        let elements = random_elements(&mut rng, 200);

        // Each node receives the elements in a different order
        let mut nodes: Vec<DistributedBloomFilter> = (0..3)
            .map(|_| DistributedBloomFilter::new(b"cluster seed", 200, 0.01).unwrap())
            .collect();
        for (i, node) in nodes.iter_mut().enumerate() {
            let mut order: Vec<&Vec<u8>> = elements.iter().collect();
            order.rotate_left(i * 37);
            for element in order {
                node.add(element);
            }
        }

        let reference = nodes[0].bit_indices();
        for node in &nodes[1..] {
            assert_eq!(node.bit_indices(), reference);
        }
    }

    #[test]
    fn test_seed_and_element_hashes_scenario() {
        let base = seed_hashes(b"2", 10);
        let hashes = element_hashes(b"message", &base);

        assert_eq!(hashes.len(), 10);
        let mut all: HashSet<_> = base.iter().collect();
        for hash in &hashes {
            assert!(all.insert(hash), "element hash repeats a previous digest");
        }
    }

    #[test]
    fn test_joint_seed_flow() {
        init_tracing();
        // Each party keeps its own contribution and publishes only the joint value
        let alice_half = seed_hashes(b"alice private", 1)[0];
        let bob_half = seed_hashes(b"bob private", 1)[0];
        let joint = joint_seed(&alice_half, &bob_half);

        assert_ne!(joint, ZERO_DIGEST);
        assert_eq!(combine(&joint, &bob_half), alice_half);

        let mut alice = DistributedBloomFilter::new(&joint, 50, 0.05).unwrap();
        let mut bob = DistributedBloomFilter::new(&joint_seed(&bob_half, &alice_half), 50, 0.05)
            .unwrap();
        alice.add(b"shared record");
        bob.add(b"shared record");

        assert!(alice.is_compatible(&bob));
        assert_eq!(alice.bit_indices(), bob.bit_indices());
    }

    #[test]
    fn test_split_workload_merges_to_full_filter() {
        init_tracing();
        let mut rng = StdRng::seed_from_u64(42);
        let elements = random_elements(&mut rng, 300);

        let mut full = DistributedBloomFilter::new(b"split", 300, 0.02).unwrap();
        for element in &elements {
            full.add(element);
        }

        // Three nodes each see a third, then exchange sparse snapshots
        let mut partial: Vec<DistributedBloomFilter> = (0..3)
            .map(|_| DistributedBloomFilter::new(b"split", 300, 0.02).unwrap())
            .collect();
        for (i, element) in elements.iter().enumerate() {
            partial[i % 3].add(element);
        }
        let exports: Vec<Vec<usize>> = partial.iter().map(|f| f.bit_indices()).collect();

        let mut merged = DistributedBloomFilter::new(b"split", 300, 0.02).unwrap();
        for export in &exports {
            merged.merge_bit_indices(export).unwrap();
        }

        assert_eq!(merged.bit_indices(), full.bit_indices());
        for element in &elements {
            assert!(merged.might_contain(element));
        }
    }

    #[test]
    fn test_shared_filter_across_threads_matches_remote_node() {
        init_tracing();
        let config = FilterConfigBuilder::new()
            .expected_elements(1_000)
            .target_fpr(0.01)
            .build()
            .unwrap();
        let metrics = Arc::new(Metrics::new());
        let local = SharedFilter::with_metrics(b"threads", &config, metrics.clone()).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|t| {
                let api: Arc<dyn DistributedFilterApi> = Arc::new(local.clone());
                thread::spawn(move || {
                    for i in 0..250 {
                        api.add(format!("record_{}", t * 250 + i).as_bytes());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut remote = DistributedBloomFilter::from_config(b"threads", &config).unwrap();
        for i in 0..1_000 {
            remote.add(format!("record_{}", i).as_bytes());
        }

        assert_eq!(local.bit_indices(), remote.bit_indices());
        assert_eq!(metrics.snapshot().elements_added, 1_000);
    }

    #[test]
    fn test_false_positive_rate_near_target() {
        let mut rng = StdRng::seed_from_u64(1234);
        let target_fpr = 0.05;
        let inserted = random_elements(&mut rng, 500);
        let mut filter = DistributedBloomFilter::new(b"fpr", 500, target_fpr).unwrap();
        for element in &inserted {
            filter.add(element);
        }

        let trials = 20_000;
        let false_positives = (0..trials)
            .filter(|i| filter.might_contain(format!("absent_{}", i).as_bytes()))
            .count();

        let observed = false_positives as f64 / trials as f64;
        assert!(
            observed <= target_fpr * 2.0,
            "observed FPR {} too far above target {}",
            observed,
            target_fpr
        );
    }
}
