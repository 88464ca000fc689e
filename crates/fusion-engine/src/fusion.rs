//! Weighted Reciprocal Rank Fusion (RRF) for combining retrieval paths.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::warn;

use fusion_core::{FusedHit, FusionConfig, RankedHit};

/// Fuse the vector and text retrieval lists using weighted RRF.
///
/// Each distinct document gets
/// `vector_weight / (rrf_k + vector_rank) + text_weight / (rrf_k + text_rank)`,
/// where a term is zero when the document is absent from that path. Ranks
/// are 1-based so `rrf_k` damps the top hit too. The output is sorted
/// descending by fused score, ties broken by the best single-path rank and
/// then by document id, and truncated to `config.limit`.
///
/// Pure computation: no state survives the call, so identical inputs always
/// produce identical output.
///
/// A document present in both lists keeps the vector list's content and
/// metadata, which carry the fuller embedding-side fields. Duplicate ids
/// inside one list violate the retriever contract; the first occurrence
/// wins and later ones are dropped with a warning.
pub fn reciprocal_rank_fusion(
    vector: Vec<RankedHit>,
    text: Vec<RankedHit>,
    config: &FusionConfig,
) -> Vec<FusedHit> {
    let mut candidates: HashMap<String, FusedHit> =
        HashMap::with_capacity(vector.len() + text.len());

    for (idx, hit) in vector.into_iter().enumerate() {
        let rank = idx as u32 + 1;
        match candidates.entry(hit.document_id.clone()) {
            Entry::Occupied(_) => {
                warn!(
                    "Duplicate document {} in vector results, keeping first occurrence",
                    hit.document_id
                );
            }
            Entry::Vacant(slot) => {
                slot.insert(FusedHit {
                    document_id: hit.document_id,
                    rrf_score: 0.0,
                    vector_rank: Some(rank),
                    vector_score: Some(hit.score),
                    text_rank: None,
                    text_score: None,
                    content: hit.content,
                    metadata: hit.metadata,
                });
            }
        }
    }

    for (idx, hit) in text.into_iter().enumerate() {
        let rank = idx as u32 + 1;
        match candidates.entry(hit.document_id) {
            Entry::Occupied(mut slot) => {
                let candidate = slot.get_mut();
                if candidate.text_rank.is_some() {
                    warn!(
                        "Duplicate document {} in text results, keeping first occurrence",
                        candidate.document_id
                    );
                } else {
                    candidate.text_rank = Some(rank);
                    candidate.text_score = Some(hit.score);
                }
            }
            Entry::Vacant(slot) => {
                let document_id = slot.key().clone();
                slot.insert(FusedHit {
                    document_id,
                    rrf_score: 0.0,
                    vector_rank: None,
                    vector_score: None,
                    text_rank: Some(rank),
                    text_score: Some(hit.score),
                    content: hit.content,
                    metadata: hit.metadata,
                });
            }
        }
    }

    for candidate in candidates.values_mut() {
        candidate.rrf_score = rrf_term(config.vector_weight, candidate.vector_rank, config.rrf_k)
            + rrf_term(config.text_weight, candidate.text_rank, config.rrf_k);
    }

    let mut fused: Vec<FusedHit> = candidates.into_values().collect();
    fused.sort_by(|a, b| {
        b.rrf_score
            .partial_cmp(&a.rrf_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.best_rank().cmp(&b.best_rank()))
            .then_with(|| a.document_id.cmp(&b.document_id))
    });
    fused.truncate(config.limit);

    fused
}

/// One weighted reciprocal-rank term. Absence from a path contributes zero.
fn rrf_term(weight: f32, rank: Option<u32>, k: f32) -> f32 {
    match rank {
        Some(rank) => weight / (k + rank as f32),
        None => 0.0,
    }
}
