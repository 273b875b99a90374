#[derive(Debug, thiserror::Error)]
pub enum InventoryError {
    #[error("nothing to report: define at least one size with --define")]
    Empty,

    #[error("{name} is defined more than once")]
    Redefined { name: String },

    #[error("size of {name} overflows when scaled by {scale}")]
    Overflow { name: String, scale: u64 },
}
