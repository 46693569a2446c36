pub mod encoder;

pub use encoder::{encode, ExportFile, ExportFormat};
