//! On-disk vector index.
//!
//! The index directory holds a single `index.json`:
//!
//! ```json
//! { "dimension": 3,
//!   "documents": [ { "id": "c1", "content": "...", "source": "lec1.txt",
//!                    "metadata": {"page": 2}, "embedding": [0.1, 0.2, 0.3] } ] }
//! ```
//!
//! The whole index is held in memory and searched by brute-force cosine
//! similarity.

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use super::errors::IndexError;
use super::store::{ChunkSearchResult, RagStore, StoredChunk};

pub const INDEX_FILE_NAME: &str = "index.json";

#[derive(Debug, Deserialize)]
struct IndexFile {
    dimension: usize,
    documents: Vec<IndexDocument>,
}

#[derive(Debug, Deserialize)]
struct IndexDocument {
    id: String,
    content: String,
    #[serde(default)]
    source: String,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
    embedding: Vec<f32>,
}

pub struct VectorIndex {
    path: PathBuf,
    dimension: usize,
    entries: Vec<(StoredChunk, Vec<f32>)>,
}

impl VectorIndex {
    /// Reads and validates the index stored under `dir`.
    pub fn load(dir: &Path) -> Result<Self, IndexError> {
        if !dir.is_dir() {
            return Err(IndexError::NotFound(dir.to_path_buf()));
        }

        let path = dir.join(INDEX_FILE_NAME);
        if !path.is_file() {
            return Err(IndexError::NotFound(path));
        }

        let contents = fs::read_to_string(&path).map_err(|source| IndexError::Io {
            path: path.clone(),
            source,
        })?;
        let file: IndexFile =
            serde_json::from_str(&contents).map_err(|source| IndexError::Parse {
                path: path.clone(),
                source,
            })?;

        if file.dimension == 0 {
            return Err(IndexError::Invalid("dimension must be positive".to_string()));
        }

        let mut entries = Vec::with_capacity(file.documents.len());
        for doc in file.documents {
            if doc.embedding.len() != file.dimension {
                return Err(IndexError::Invalid(format!(
                    "document '{}' has {} values, expected {}",
                    doc.id,
                    doc.embedding.len(),
                    file.dimension
                )));
            }
            entries.push((
                StoredChunk {
                    chunk_id: doc.id,
                    content: doc.content,
                    source: doc.source,
                    metadata: doc.metadata,
                },
                doc.embedding,
            ));
        }

        tracing::info!(
            "Loaded vector index {} ({} documents, dimension {})",
            path.display(),
            entries.len(),
            file.dimension
        );

        Ok(Self {
            path,
            dimension: file.dimension,
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl RagStore for VectorIndex {
    async fn search(
        &self,
        query_embedding: &[f32],
        limit: usize,
    ) -> Result<Vec<ChunkSearchResult>, IndexError> {
        if query_embedding.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query_embedding.len(),
            });
        }

        let mut scored: Vec<ChunkSearchResult> = self
            .entries
            .iter()
            .map(|(chunk, embedding)| ChunkSearchResult {
                chunk: chunk.clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored.truncate(limit.max(1));

        Ok(scored)
    }
}

pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a <= f32::EPSILON || norm_b <= f32::EPSILON {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn approx_eq(left: f32, right: f32) -> bool {
        (left - right).abs() < 1e-5
    }

    fn write_index(dir: &Path, value: serde_json::Value) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(INDEX_FILE_NAME), value.to_string()).unwrap();
    }

    fn sample_index() -> serde_json::Value {
        json!({
            "dimension": 2,
            "documents": [
                {"id": "a", "content": "Sorting algorithms", "source": "lec1.txt", "embedding": [0.8, 0.2]},
                {"id": "b", "content": "Graph search", "source": "lec1.txt", "embedding": [0.1, 0.9]},
                {"id": "c", "content": "Merge sort", "source": "lec1.txt", "embedding": [0.9, 0.0]}
            ]
        })
    }

    #[test]
    fn cosine_is_one_for_identical_vectors() {
        let vec = vec![1.0, 2.0, 3.0, 4.0];
        assert!(approx_eq(cosine_similarity(&vec, &vec), 1.0));
    }

    #[test]
    fn cosine_is_zero_for_orthogonal_vectors() {
        assert!(approx_eq(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0));
    }

    #[tokio::test]
    async fn search_returns_highest_similarity_first() {
        let tmp = tempfile::tempdir().unwrap();
        write_index(tmp.path(), sample_index());

        let index = VectorIndex::load(tmp.path()).unwrap();
        assert_eq!(index.len(), 3);

        let results = index.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.chunk_id, "c");
        assert_eq!(results[1].chunk.chunk_id, "a");
    }

    #[tokio::test]
    async fn search_rejects_wrong_query_dimension() {
        let tmp = tempfile::tempdir().unwrap();
        write_index(tmp.path(), sample_index());
        let index = VectorIndex::load(tmp.path()).unwrap();

        let err = index.search(&[1.0, 0.0, 0.0], 2).await.unwrap_err();
        assert!(matches!(
            err,
            IndexError::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        ));
    }

    #[test]
    fn missing_directory_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(&tmp.path().join("faiss_index")).err().unwrap();
        assert!(matches!(err, IndexError::NotFound(_)));
    }

    #[test]
    fn missing_index_file_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = VectorIndex::load(tmp.path()).err().unwrap();
        assert!(matches!(err, IndexError::NotFound(path) if path.ends_with(INDEX_FILE_NAME)));
    }

    #[test]
    fn corrupt_file_is_a_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join(INDEX_FILE_NAME), "{ not json").unwrap();

        let err = VectorIndex::load(tmp.path()).err().unwrap();
        assert!(matches!(err, IndexError::Parse { .. }));
    }

    #[test]
    fn inconsistent_embedding_length_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        write_index(
            tmp.path(),
            json!({
                "dimension": 3,
                "documents": [{"id": "a", "content": "x", "embedding": [1.0, 0.0]}]
            }),
        );

        let err = VectorIndex::load(tmp.path()).err().unwrap();
        assert!(err.to_string().contains("document 'a' has 2 values, expected 3"));
    }
}
