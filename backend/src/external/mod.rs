//! External service clients

pub mod blockchain;

pub use blockchain::BlockchainClient;
