pub mod amount;
pub mod codec;
pub mod engine;
pub mod model;

pub use amount::Amount;
pub use engine::Engine;
pub use model::{AccountId, Transaction, TxId, TxKind};
