//! Repository 実装
//!
//! - `inmemory`: HashMap を使ったプロセス内実装（永続化なし）

pub mod inmemory;

pub use inmemory::InMemoryRoomRepository;
