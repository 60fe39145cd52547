pub mod walk;

pub use walk::WalkRequest;
