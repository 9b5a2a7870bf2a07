//! Generated `ondewo.nlu` messages and clients (see `proto/` and `build.rs`).
//!
//! The query result types also derive `Serialize`: their snake_case rendering, with empty
//! strings omitted, is what the connector reports as `sourceData`.

tonic::include_proto!("ondewo.nlu");
