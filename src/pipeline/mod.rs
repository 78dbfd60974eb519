pub mod extraction;
pub mod llm;
pub mod analyze;
pub mod storage;
