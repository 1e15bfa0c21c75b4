use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::constants::DimConfig;
use crate::vectordb::error::VectorDbError;
use crate::vectordb::hybrid::HybridScorer;
use crate::vectordb::model::{RetrievalResult, VectorRecord};

/// In-memory vector index with hybrid ranking.
///
/// Records are immutable `Arc`s in insertion order. Queries clone the list under
/// a read guard and score outside the lock, so writers never wait on scoring.
#[derive(Debug)]
pub struct VectorIndex {
    dimension: usize,
    records: RwLock<Vec<Arc<VectorRecord>>>,
    scorer: HybridScorer,
}

impl VectorIndex {
    pub fn new(dimension: usize, scorer: HybridScorer) -> Result<Self, VectorDbError> {
        DimConfig::new(dimension).validate()?;
        Ok(Self {
            dimension,
            records: RwLock::new(Vec::new()),
            scorer,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn scorer(&self) -> &HybridScorer {
        &self.scorer
    }

    /// Inserts records, replacing any existing record with the same chunk id.
    ///
    /// The whole batch is validated before anything is written.
    pub fn upsert(&self, records: Vec<VectorRecord>) -> Result<usize, VectorDbError> {
        for record in &records {
            if record.vector.len() != self.dimension {
                return Err(VectorDbError::InvalidDimension {
                    expected: self.dimension,
                    actual: record.vector.len(),
                });
            }
            if record.document_id().is_empty() {
                return Err(VectorDbError::EmptyDocumentId {
                    chunk_index: record.metadata.chunk_index,
                });
            }
        }

        let count = records.len();
        let incoming: HashSet<String> = records.iter().map(|r| r.chunk_id().to_string()).collect();

        let mut guard = self.records.write();
        let before = guard.len();
        guard.retain(|existing| !incoming.contains(existing.chunk_id()));
        let replaced = before - guard.len();
        guard.extend(records.into_iter().map(Arc::new));

        debug!(inserted = count, replaced, total = guard.len(), "Upserted records");
        Ok(count)
    }

    /// Removes every record of `document_id`; returns how many were removed.
    pub fn delete_by_document(&self, document_id: &str) -> usize {
        let mut guard = self.records.write();
        let before = guard.len();
        guard.retain(|r| r.document_id() != document_id);
        let removed = before - guard.len();
        debug!(document_id, removed, "Deleted document records");
        removed
    }

    /// Top-`top_k` records by hybrid score, optionally restricted to one document.
    ///
    /// Ties keep insertion order.
    pub fn query(
        &self,
        vector: &[f32],
        query_text: &str,
        top_k: usize,
        document_filter: Option<&str>,
    ) -> Vec<RetrievalResult> {
        if top_k == 0 {
            return Vec::new();
        }

        let snapshot: Vec<Arc<VectorRecord>> = {
            let guard = self.records.read();
            guard
                .iter()
                .filter(|r| document_filter.is_none_or(|doc| r.document_id() == doc))
                .cloned()
                .collect()
        };

        let prepared = self.scorer.prepare(vector, query_text);
        let mut results: Vec<RetrievalResult> = snapshot
            .into_iter()
            .map(|record| {
                let (score, breakdown) = self.scorer.score(&prepared, &record.vector, &record.text);
                RetrievalResult {
                    record,
                    score,
                    breakdown,
                }
            })
            .collect();

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        results.truncate(top_k);
        results
    }

    /// Number of records, optionally for one document.
    pub fn count(&self, document_id: Option<&str>) -> usize {
        let guard = self.records.read();
        match document_id {
            Some(doc) => guard.iter().filter(|r| r.document_id() == doc).count(),
            None => guard.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}
