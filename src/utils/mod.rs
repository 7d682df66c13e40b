//! # Вспомогательные утилиты
//!
//! Метрики качества прогнозов и базовые уровни (реализованная
//! волатильность, средний объём) для сравнения с историей.

mod metrics;

pub use metrics::{average_volume, mae, mape, mse, realized_volatility, rmse};
