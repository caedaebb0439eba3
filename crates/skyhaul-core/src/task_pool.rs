use once_cell::sync::Lazy;
use tokio::runtime::Runtime;

/// Shared runtime for driving async transfers from the sync CLI flow.
pub static POOL: Lazy<Runtime> = Lazy::new(|| {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
});
