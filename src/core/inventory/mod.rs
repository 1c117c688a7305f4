mod scanner;

pub use scanner::{scan, LocalBucket, LocalEntry, LocalInventory, Orphan};
