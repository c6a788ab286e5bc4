//! Test fixtures for labeler integration tests
#![allow(dead_code)]

use labeler::InMemoryStore;

/// Three-row quantitative dataset
pub const QUANTI_CSV: &str = "Id.,Question,Answer\nq1,How many?,3\nq2,How often?,weekly\nq3,How long?,2h\n";

/// Two-row qualitative dataset with padded headers
pub const QUALI_CSV: &str = " Id. , Comment \nc1,Great\nc2,\"Slow, but fine\"\n";

/// Dataset without the identifier column
pub const NO_ID_CSV: &str = "Name,Comment\nx,y\n";

/// Saved progress for Julien: two rows judged
pub const JULIEN_STATE: &str =
    r#"{"row_index":2,"responses":[["q1","Keep","Julien"],["q2","Pass","Julien"]]}"#;

/// In-memory store seeded with both default datasets
pub async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert("quanti.csv", QUANTI_CSV).await;
    store.insert("quali.csv", QUALI_CSV).await;
    store
}
