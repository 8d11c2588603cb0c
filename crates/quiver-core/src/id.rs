use derive_more::Display;
use quiver_schema::Value;
use serde::{Deserialize, Serialize};
use std::sync::{
    LazyLock, Mutex,
    atomic::{AtomicU64, Ordering},
};
use ulid::Ulid;

///
/// NodeId
///
/// Identity of one data node: a ULID in its canonical 26-character text
/// form. Lexicographically sortable, URL-safe, collision-resistant across
/// concurrent planners. Minted at plan time so that downstream mutactions
/// can address a freshly created node before it exists in storage.
///

#[derive(Clone, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct NodeId(String);

impl NodeId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Ulid> for NodeId {
    fn from(ulid: Ulid) -> Self {
        Self(ulid.to_string())
    }
}

impl From<&NodeId> for Value {
    fn from(id: &NodeId) -> Self {
        Self::Id(id.0.clone())
    }
}

impl From<NodeId> for Value {
    fn from(id: NodeId) -> Self {
        Self::Id(id.0)
    }
}

///
/// IdGenerator
///
/// Identity source for nested creates and upsert create branches. Injected
/// so tests can pin the sequence: two planner runs over equal input and an
/// equally seeded generator must produce identical mutaction vectors.
///

pub trait IdGenerator {
    fn generate(&self) -> NodeId;
}

///
/// MonotonicIdGenerator
///
/// Default production source. A single process-wide `ulid::Generator`
/// behind a mutex keeps ids strictly increasing within one process even
/// when several ids land in the same millisecond.
///

static GENERATOR: LazyLock<Mutex<ulid::Generator>> =
    LazyLock::new(|| Mutex::new(ulid::Generator::new()));

#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicIdGenerator;

impl IdGenerator for MonotonicIdGenerator {
    fn generate(&self) -> NodeId {
        let mut generator = GENERATOR.lock().expect("id generator mutex poisoned");

        // Overflow only happens after 2^80 ids inside one millisecond;
        // fall back to a fresh random ULID rather than failing the plan.
        generator
            .generate()
            .map_or_else(|_| Ulid::new().into(), Into::into)
    }
}

///
/// SequenceIdGenerator
///
/// Deterministic source for tests: ids are ULIDs built from a fixed seed
/// and an incrementing counter, so the emitted sequence is a pure function
/// of the seed.
///

#[derive(Debug)]
pub struct SequenceIdGenerator {
    seed: u64,
    next: AtomicU64,
}

impl SequenceIdGenerator {
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            next: AtomicU64::new(0),
        }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn generate(&self) -> NodeId {
        let n = self.next.fetch_add(1, Ordering::Relaxed);

        Ulid::from_parts(self.seed, u128::from(n)).into()
    }
}

///
/// TESTS
///
