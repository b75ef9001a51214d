pub mod captures;
pub mod competencies;
pub mod log;
pub mod logs;
pub mod migrate;
pub mod observer;
pub mod record;
pub mod seed;
pub mod sessions;
pub mod stats;
pub mod store;

pub use observer::SubscriptionId;
pub use record::{Record, Table};
pub use seed::SeedOutcome;
pub use sessions::Completion;
pub use store::{Store, StoreOptions};
