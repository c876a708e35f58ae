pub mod normalize;
pub mod extraction;
pub mod structuring;
pub mod rag;
pub mod batch;
