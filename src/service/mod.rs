pub mod items;
pub mod predictions;

pub use items::{ItemService, Pagination};
pub use predictions::PredictionService;
