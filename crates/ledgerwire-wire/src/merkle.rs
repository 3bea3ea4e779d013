//! Merkle integrity payload: an ordered batch of timestamped elements with
//! a root hash and per-element inclusion proofs.
//!
//! Leaves and interior nodes are hashed with distinct domain prefixes so a
//! leaf can never be confused with a node. The tree is binary, built
//! bottom-up; an odd node at any level is promoted unchanged to the next
//! level (carry-up policy), not paired with itself.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use ledgerwire_core::{write_varint, Hash256, Value};
use ledgerwire_records::{RecordKind, ValidationOutcome};

/// Maximum total encoded size of a batch.
pub const MAX_BATCH_BYTES: usize = 1024 * 1024;

const LEAF_DOMAIN: u8 = 0x00;
const NODE_DOMAIN: u8 = 0x01;

/// One batch member: an opaque structured record plus a logical timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerkleElement {
    /// Kind of the record the body carries.
    pub kind: RecordKind,
    /// Logical timestamp (milliseconds); batch order key.
    pub timestamp: u64,
    /// The record body, encoded via the canonical value codec.
    pub body: Value,
}

impl MerkleElement {
    pub fn new(kind: RecordKind, timestamp: u64, body: Value) -> Self {
        Self {
            kind,
            timestamp,
            body,
        }
    }

    /// Canonical encoding: kind varint, timestamp varint, canonical body.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        write_varint(&mut buf, self.kind.code() as u128);
        write_varint(&mut buf, self.timestamp as u128);
        self.body.write_to(&mut buf);
        buf
    }

    /// Leaf hash, domain-separated from interior nodes.
    pub fn leaf_hash(&self) -> Hash256 {
        let mut input = Vec::with_capacity(64);
        input.push(LEAF_DOMAIN);
        input.extend_from_slice(&self.canonical_bytes());
        Hash256::digest(&input)
    }
}

/// Which side a proof step's sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

/// One step of an inclusion proof: the sibling hash and its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub sibling: Hash256,
    pub side: Side,
}

/// An inclusion proof: the published root plus the sibling path from one
/// leaf up to it. Levels where the running node was carried up unpaired
/// contribute no step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    pub root: Hash256,
    pub steps: Vec<ProofStep>,
}

/// The computed root along with a proof per element, in element order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerkleRoot {
    pub hash: Hash256,
    pub proofs: Vec<MerkleProof>,
}

fn node_hash(left: &Hash256, right: &Hash256) -> Hash256 {
    let mut input = Vec::with_capacity(65);
    input.push(NODE_DOMAIN);
    input.extend_from_slice(left.as_bytes());
    input.extend_from_slice(right.as_bytes());
    Hash256::digest(&input)
}

/// Recompute a root from one leaf hash and its proof path.
pub fn verify_proof(leaf_hash: &Hash256, proof: &MerkleProof) -> bool {
    let mut current = *leaf_hash;
    for step in &proof.steps {
        current = match step.side {
            Side::Left => node_hash(&step.sibling, &current),
            Side::Right => node_hash(&current, &step.sibling),
        };
    }
    current == proof.root
}

/// Read-only batch statistics; an observability aid, not part of the
/// integrity contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchStats {
    pub element_count: usize,
    pub total_bytes: usize,
    pub by_kind: BTreeMap<&'static str, usize>,
}

/// An ordered batch of timestamped elements.
///
/// The element list is kept in non-decreasing timestamp order at all
/// times; ties preserve insertion order (first inserted wins the earlier
/// slot).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BatchPayload {
    elements: Vec<MerkleElement>,
}

impl BatchPayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element, maintaining timestamp order. `None` is ignored.
    pub fn consider(&mut self, element: Option<MerkleElement>) {
        let Some(element) = element else {
            return;
        };
        // partition_point puts the new element after any equal timestamps
        // already present, which is exactly the stable tie-break.
        let at = self
            .elements
            .partition_point(|existing| existing.timestamp <= element.timestamp);
        self.elements.insert(at, element);
    }

    pub fn elements(&self) -> &[MerkleElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Build the Merkle tree over the current element order.
    ///
    /// Returns `None` for an empty batch (no tree, no root).
    pub fn compute_merkle_root(&self) -> Option<MerkleRoot> {
        if self.elements.is_empty() {
            return None;
        }

        let mut current: Vec<Hash256> =
            self.elements.iter().map(MerkleElement::leaf_hash).collect();

        // All levels, bottom (leaves) first.
        let mut levels: Vec<Vec<Hash256>> = Vec::new();
        while current.len() > 1 {
            let mut next = Vec::with_capacity(current.len().div_ceil(2));
            for pair in current.chunks(2) {
                match pair {
                    [left, right] => next.push(node_hash(left, right)),
                    // Odd node: promoted unchanged to the next level.
                    [single] => next.push(*single),
                    _ => unreachable!(),
                }
            }
            levels.push(current);
            current = next;
        }
        let root = current[0];
        levels.push(current);

        let proofs = (0..self.elements.len())
            .map(|leaf_index| {
                let mut steps = Vec::new();
                let mut index = leaf_index;
                for level in &levels[..levels.len() - 1] {
                    let sibling_index = index ^ 1;
                    if sibling_index < level.len() {
                        steps.push(ProofStep {
                            sibling: level[sibling_index],
                            side: if sibling_index < index {
                                Side::Left
                            } else {
                                Side::Right
                            },
                        });
                    }
                    index /= 2;
                }
                MerkleProof { root, steps }
            })
            .collect();

        Some(MerkleRoot { hash: root, proofs })
    }

    /// Recompute the root and compare against `expected`.
    pub fn verify_merkle_root(&self, expected: &Hash256) -> ValidationOutcome {
        match self.compute_merkle_root() {
            Some(root) if root.hash == *expected => ValidationOutcome::ok(),
            Some(root) => ValidationOutcome::fail(format!(
                "Merkle root mismatch: expected {}, computed {}",
                expected.to_hex(),
                root.hash.to_hex()
            )),
            None => ValidationOutcome::fail("Cannot verify Merkle root of an empty payload."),
        }
    }

    /// Structural check per element: the body must be a structured record.
    pub fn validate_elements(&self) -> ValidationOutcome {
        for (index, element) in self.elements.iter().enumerate() {
            if !matches!(element.body, Value::Map(_)) {
                return ValidationOutcome::fail(format!(
                    "Element {index} body must be a record map."
                ));
            }
        }
        ValidationOutcome::ok()
    }

    /// Defends against out-of-band mutation of the stored order.
    pub fn validate_timestamp_ordering(&self) -> ValidationOutcome {
        for (index, pair) in self.elements.windows(2).enumerate() {
            if pair[0].timestamp > pair[1].timestamp {
                return ValidationOutcome::fail(format!(
                    "Elements {index} and {} are out of timestamp order.",
                    index + 1
                ));
            }
        }
        ValidationOutcome::ok()
    }

    /// Total encoded size must stay within the payload bound.
    pub fn validate_size(&self) -> ValidationOutcome {
        let total: usize = self
            .elements
            .iter()
            .map(|e| e.canonical_bytes().len())
            .sum();
        if total > MAX_BATCH_BYTES {
            return ValidationOutcome::fail(format!(
                "Encoded payload of {total} bytes exceeds the {MAX_BATCH_BYTES} byte limit."
            ));
        }
        ValidationOutcome::ok()
    }

    /// Every validation layer, first failure wins.
    pub fn validate(&self) -> ValidationOutcome {
        for outcome in [
            self.validate_elements(),
            self.validate_timestamp_ordering(),
            self.validate_size(),
        ] {
            if !outcome.valid {
                return outcome;
            }
        }
        ValidationOutcome::ok()
    }

    pub fn is_valid(&self) -> bool {
        self.validate().valid
    }

    /// Element count, total encoded size, and a count-by-kind breakdown.
    pub fn stats(&self) -> BatchStats {
        let mut by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
        let mut total_bytes = 0;
        for element in &self.elements {
            *by_kind.entry(element.kind.name()).or_default() += 1;
            total_bytes += element.canonical_bytes().len();
        }
        BatchStats {
            element_count: self.elements.len(),
            total_bytes,
            by_kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn element(tag: &str, timestamp: u64) -> MerkleElement {
        let mut body = Map::new();
        body.insert("tag".to_string(), Value::from(tag));
        MerkleElement::new(RecordKind::Transfer, timestamp, Value::Map(body))
    }

    #[test]
    fn test_consider_orders_by_timestamp() {
        let mut batch = BatchPayload::new();
        batch.consider(Some(element("a", 30)));
        batch.consider(Some(element("b", 10)));
        batch.consider(Some(element("c", 20)));
        let order: Vec<u64> = batch.elements().iter().map(|e| e.timestamp).collect();
        assert_eq!(order, vec![10, 20, 30]);
    }

    #[test]
    fn test_consider_stable_on_ties() {
        let mut batch = BatchPayload::new();
        batch.consider(Some(element("first", 10)));
        batch.consider(Some(element("second", 10)));
        batch.consider(Some(element("third", 10)));
        let tags: Vec<&Value> = batch
            .elements()
            .iter()
            .map(|e| match &e.body {
                Value::Map(m) => m.get("tag").unwrap(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(
            tags,
            vec![&Value::from("first"), &Value::from("second"), &Value::from("third")]
        );
    }

    #[test]
    fn test_consider_ignores_none() {
        let mut batch = BatchPayload::new();
        batch.consider(None);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_empty_batch_has_no_root() {
        assert!(BatchPayload::new().compute_merkle_root().is_none());
    }

    #[test]
    fn test_root_deterministic() {
        let mut batch = BatchPayload::new();
        for ts in [30, 10, 20] {
            batch.consider(Some(element("x", ts)));
        }
        let a = batch.compute_merkle_root().unwrap();
        let b = batch.compute_merkle_root().unwrap();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn test_verify_own_root() {
        let mut batch = BatchPayload::new();
        for ts in 0..5 {
            batch.consider(Some(element("x", ts)));
        }
        let root = batch.compute_merkle_root().unwrap();
        assert!(batch.verify_merkle_root(&root.hash).valid);
    }

    #[test]
    fn test_removal_changes_root() {
        let mut full = BatchPayload::new();
        for ts in 0..4 {
            full.consider(Some(element("x", ts)));
        }
        let mut partial = BatchPayload::new();
        for ts in 0..3 {
            partial.consider(Some(element("x", ts)));
        }
        assert_ne!(
            full.compute_merkle_root().unwrap().hash,
            partial.compute_merkle_root().unwrap().hash
        );
    }

    #[test]
    fn test_reorder_changes_root() {
        let mut a = BatchPayload::new();
        a.consider(Some(element("one", 10)));
        a.consider(Some(element("two", 10)));
        let mut b = BatchPayload::new();
        b.consider(Some(element("two", 10)));
        b.consider(Some(element("one", 10)));
        assert_ne!(
            a.compute_merkle_root().unwrap().hash,
            b.compute_merkle_root().unwrap().hash
        );
    }

    #[test]
    fn test_mismatched_root_reported() {
        let mut batch = BatchPayload::new();
        batch.consider(Some(element("x", 1)));
        let outcome = batch.verify_merkle_root(&Hash256::ZERO);
        assert!(!outcome.valid);
        assert!(outcome.error.unwrap().contains("mismatch"));
    }

    #[test]
    fn test_proofs_verify_for_every_leaf() {
        // Sizes covering even, odd, and single-leaf trees, so the carry-up
        // path is exercised.
        for count in [1usize, 2, 3, 5, 8, 11] {
            let mut batch = BatchPayload::new();
            for ts in 0..count as u64 {
                batch.consider(Some(element("x", ts)));
            }
            let root = batch.compute_merkle_root().unwrap();
            assert_eq!(root.proofs.len(), count);
            for (element, proof) in batch.elements().iter().zip(&root.proofs) {
                assert!(verify_proof(&element.leaf_hash(), proof));
            }
        }
    }

    #[test]
    fn test_proof_for_wrong_leaf_fails() {
        let mut batch = BatchPayload::new();
        for ts in 0..4 {
            batch.consider(Some(element("x", ts)));
        }
        let root = batch.compute_merkle_root().unwrap();
        let wrong_leaf = batch.elements()[1].leaf_hash();
        assert!(!verify_proof(&wrong_leaf, &root.proofs[0]));
    }

    #[test]
    fn test_single_leaf_root_is_leaf() {
        let mut batch = BatchPayload::new();
        batch.consider(Some(element("only", 1)));
        let root = batch.compute_merkle_root().unwrap();
        assert_eq!(root.hash, batch.elements()[0].leaf_hash());
        assert!(root.proofs[0].steps.is_empty());
    }

    #[test]
    fn test_validate_elements_rejects_non_map_body() {
        let mut batch = BatchPayload::new();
        batch.consider(Some(MerkleElement::new(
            RecordKind::Transfer,
            1,
            Value::Bool(true),
        )));
        let outcome = batch.validate_elements();
        assert!(!outcome.valid);
        assert!(!batch.is_valid());
    }

    #[test]
    fn test_timestamp_ordering_detects_mutation() {
        let mut batch = BatchPayload::new();
        batch.consider(Some(element("a", 1)));
        batch.consider(Some(element("b", 2)));
        assert!(batch.validate_timestamp_ordering().valid);
        // Simulate out-of-band mutation through a decoded payload.
        batch.elements.swap(0, 1);
        assert!(!batch.validate_timestamp_ordering().valid);
    }

    #[test]
    fn test_stats() {
        let mut batch = BatchPayload::new();
        batch.consider(Some(element("a", 1)));
        batch.consider(Some(MerkleElement::new(
            RecordKind::Identity,
            2,
            Value::empty_map(),
        )));
        let stats = batch.stats();
        assert_eq!(stats.element_count, 2);
        assert_eq!(stats.by_kind.get("TRANSFER"), Some(&1));
        assert_eq!(stats.by_kind.get("IDENTITY"), Some(&1));
        assert!(stats.total_bytes > 0);
    }
}
