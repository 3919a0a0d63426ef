// Kagami image transformation library
//
// Request flow: router -> pipeline (storage, negotiation, imaging) -> proxy

pub mod config;
pub mod constants;
pub mod error;
pub mod imaging;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod proxy;
pub mod router;
pub mod storage;
pub mod transform;
