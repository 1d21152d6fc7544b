use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::errors::{IndexError, RetrievalError};
use super::index::VectorIndex;
use super::store::RagStore;
use crate::llm::LlmProvider;

/// A chunk handed to the chain for one question.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RetrievedDocument {
    pub content: String,
    pub source: String,
    pub score: f32,
}

/// Query interface over a [`RagStore`]: embeds the query text and returns the
/// `top_k` most similar chunks.
#[derive(Clone)]
pub struct Retriever {
    store: Arc<dyn RagStore>,
    embedder: Arc<dyn LlmProvider>,
    top_k: usize,
}

impl Retriever {
    pub fn new(store: Arc<dyn RagStore>, embedder: Arc<dyn LlmProvider>, top_k: usize) -> Self {
        Self {
            store,
            embedder,
            top_k: top_k.max(1),
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedDocument>, RetrievalError> {
        let mut vectors = self.embedder.embed(&[query.to_string()]).await?;
        let query_embedding = vectors.pop().ok_or(RetrievalError::EmptyEmbedding)?;

        let results = self.store.search(&query_embedding, self.top_k).await?;
        tracing::debug!("Retrieved {} documents", results.len());

        Ok(results
            .into_iter()
            .map(|result| RetrievedDocument {
                content: result.chunk.content,
                source: result.chunk.source,
                score: result.score,
            })
            .collect())
    }
}

/// Loads the persisted index under `dir` and wraps it in a retriever.
pub fn load_retriever(
    dir: &Path,
    embedder: Arc<dyn LlmProvider>,
    top_k: usize,
) -> Result<Retriever, IndexError> {
    let index = VectorIndex::load(dir)?;
    if index.is_empty() {
        tracing::warn!("Vector index {} holds no documents", index.path().display());
    }
    Ok(Retriever::new(Arc::new(index), embedder, top_k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::index::INDEX_FILE_NAME;
    use crate::test_support::ScriptedLlm;
    use serde_json::json;

    fn index_dir() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let value = json!({
            "dimension": 2,
            "documents": [
                {"id": "1", "content": "Big-O notation", "source": "lec1.txt", "embedding": [1.0, 0.0]},
                {"id": "2", "content": "Hash tables", "source": "lec2.txt", "embedding": [0.0, 1.0]},
                {"id": "3", "content": "Amortised analysis", "source": "lec1.txt", "embedding": [0.7, 0.7]}
            ]
        });
        std::fs::write(tmp.path().join(INDEX_FILE_NAME), value.to_string()).unwrap();
        tmp
    }

    #[tokio::test]
    async fn retrieves_top_k_documents_for_the_query() {
        let tmp = index_dir();
        let llm = Arc::new(ScriptedLlm::new().with_embedding(vec![1.0, 0.1]));
        let retriever = load_retriever(tmp.path(), llm.clone(), 2).unwrap();

        let docs = retriever.retrieve("complexity").await.unwrap();

        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "Big-O notation");
        assert_eq!(docs[1].content, "Amortised analysis");
        assert_eq!(llm.embedded_inputs(), vec!["complexity".to_string()]);
    }

    #[tokio::test]
    async fn embedding_failure_is_a_retrieval_error() {
        let tmp = index_dir();
        let llm = Arc::new(ScriptedLlm::new().failing_embeddings());
        let retriever = load_retriever(tmp.path(), llm, 4).unwrap();

        let err = retriever.retrieve("anything").await.unwrap_err();
        assert!(matches!(err, RetrievalError::Embedding(_)));
    }

    #[test]
    fn missing_index_fails_to_load() {
        let tmp = tempfile::tempdir().unwrap();
        let llm = Arc::new(ScriptedLlm::new());

        let result = load_retriever(&tmp.path().join("missing"), llm, 4);
        assert!(matches!(result, Err(IndexError::NotFound(_))));
    }
}
