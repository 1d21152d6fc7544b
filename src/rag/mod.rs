//! Retrieval side of the pipeline.
//!
//! - `VectorIndex`: the persisted index loaded from disk, searched by cosine similarity
//! - `Retriever`: embeds a query and returns the most similar chunks
//! - `RAGContextBuilder`: formats retrieved chunks into the answer prompt

mod context_builder;
mod errors;
mod index;
mod retriever;
mod store;

pub use context_builder::RAGContextBuilder;
pub use errors::{IndexError, RetrievalError};
pub use index::{VectorIndex, INDEX_FILE_NAME};
pub use retriever::{load_retriever, RetrievedDocument, Retriever};
pub use store::{ChunkSearchResult, RagStore, StoredChunk};
