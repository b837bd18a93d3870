use thiserror::Error;

#[derive(Debug, Error)]
pub enum GraphRenderError {
    #[error("not enough points to render")]
    NotEnoughPoints,
    #[error("render backend failure: {0}")]
    Backend(String),
    #[error("png encoding failure: {0}")]
    PngEncoding(String),
    #[error("render task join failure: {0}")]
    Join(String),
    #[error("render task panic: {0}")]
    Panic(String),
    #[error("render execution timeout after {0}s")]
    RenderTimeout(u64),
    #[error("failed to write chart {path}: {source}")]
    Write {
        path: String,
        source: std::io::Error,
    },
}

impl GraphRenderError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotEnoughPoints => "GRAPH_NOT_ENOUGH_POINTS",
            Self::Backend(_) => "GRAPH_BACKEND_ERROR",
            Self::PngEncoding(_) => "GRAPH_PNG_ENCODING_ERROR",
            Self::Join(_) => "GRAPH_TASK_JOIN_ERROR",
            Self::Panic(_) => "GRAPH_TASK_PANIC",
            Self::RenderTimeout(_) => "GRAPH_RENDER_TIMEOUT",
            Self::Write { .. } => "GRAPH_WRITE_ERROR",
        }
    }
}
