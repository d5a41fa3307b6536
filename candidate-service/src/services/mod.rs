pub mod database;
pub mod host;
pub mod metrics;
pub mod store;

pub use database::MongoStore;
pub use host::{HostIdentity, StaticHostIdentity, SystemHostIdentity};
pub use metrics::{get_metrics, init_metrics};
pub use store::{Document, DocumentStore, InMemoryStore};
