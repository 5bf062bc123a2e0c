use thiserror::Error;

pub type PipelineResult<T> = Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A raw source failed to download or parse. Fatal to the whole chart
    /// build; the renderer shows its fallback message instead of a chart.
    #[error("failed to load source '{name}': {reason}")]
    SourceFetch { name: String, reason: String },

    /// A lookup was requested on a series with no points.
    #[error("series is empty")]
    EmptySeries,

    /// A chart asked for a source the orchestrator never loaded.
    #[error("source '{0}' is not present in the bundle")]
    MissingSource(String),

    #[error("unknown chart '{0}'")]
    UnknownChart(String),
}
