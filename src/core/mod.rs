pub mod llm;
pub mod logging;
pub mod persona_gen;
pub mod storage;
