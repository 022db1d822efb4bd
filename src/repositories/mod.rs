mod elastic_contact_store;
mod traits;

pub use elastic_contact_store::ElasticContactStore;
pub use traits::ContactStore;
