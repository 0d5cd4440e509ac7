use thiserror::Error;

#[derive(Debug, Error)]
pub enum SheetError {
    /// A caller handed `render` a record that violates its contract.
    /// The record is identified so the caller can fix its input; the
    /// renderer never retries.
    #[error("invalid record in group {item_name:?}: {reason}")]
    InvalidRecord { item_name: String, reason: String },

    #[error("SVG parse error: {0}")]
    Svg(String),

    #[error("pixmap allocation failed ({width}x{height})")]
    PixmapAlloc { width: u32, height: u32 },

    #[error("PNG encoding error: {0}")]
    Png(#[from] png::EncodingError),
}

pub type Result<T> = std::result::Result<T, SheetError>;
