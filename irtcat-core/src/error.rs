//! Error types for the adaptive testing engine.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("min_items ({min_items}) must not exceed max_items ({max_items})")]
    ItemLimits { min_items: usize, max_items: usize },

    #[error("max_items must be at least 1")]
    ZeroMaxItems,

    #[error("stopping_se must be a positive finite number, got {0}")]
    StoppingSe(f64),

    #[error("start_point_override must be finite, got {0}")]
    StartPoint(f64),

    #[error("item \"{item_id}\" has invalid discrimination {value} (must be finite and > 0)")]
    Discrimination { item_id: String, value: f64 },

    #[error("item \"{item_id}\" has non-finite difficulty {value}")]
    Difficulty { item_id: String, value: f64 },

    #[error("duplicate item id \"{0}\" in item bank")]
    DuplicateItem(String),

    #[error("unknown item id \"{0}\"")]
    UnknownItem(String),

    #[error("item \"{0}\" has already been administered in this session")]
    AlreadyAdministered(String),

    #[error("session has already stopped ({0})")]
    SessionStopped(crate::types::StopReason),

    #[error("unknown education level \"{0}\" (expected one of: elementary, middle_school, high_school, college, graduate)")]
    EducationLevel(String),
}

pub type Result<T> = std::result::Result<T, Error>;
