//! Ошибки модели

use thiserror::Error;

/// Ошибки инференса и загрузки модели
///
/// Модель чистая и детерминированная, поэтому повторный вызов с теми же
/// входами не имеет смысла: все ошибки окончательны для данного вызова.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Несовпадение размерностей: модель ожидает {expected} признаков, получено {got}")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Пустая последовательность: окно должно содержать хотя бы один шаг")]
    EmptySequence,

    #[error("Числовая нестабильность: прогноз не является конечным числом")]
    NonFinite,

    #[error("Снапшот несовместим с конфигурацией: {0}")]
    Snapshot(String),

    #[error("Ошибка сериализации снапшота: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("Ошибка файловой операции: {0}")]
    Io(#[from] std::io::Error),
}
