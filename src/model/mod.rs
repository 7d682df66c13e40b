//! # Модуль модели
//!
//! LSTM для регрессии "последовательность -> скаляр": окно дневных
//! признаков сворачивается в итоговое скрытое состояние, которое
//! линейно проецируется в прогноз.
//!
//! ## Пример использования
//!
//! ```rust
//! use stock_rnn::model::{LSTMConfig, LSTMPredictor};
//! use ndarray::Array3;
//!
//! // 25 признаков, 64 скрытых нейрона, один слой
//! let model = LSTMPredictor::from_config(LSTMConfig::new(25));
//!
//! // Батч из одной последовательности длиной 30
//! let x = Array3::zeros((1, 30, 25));
//! let prediction = model.forward(&x).unwrap();
//! assert_eq!(prediction.len(), 1);
//! ```

mod config;
mod error;
mod layers;
mod lstm;

pub use config::LSTMConfig;
pub use error::ModelError;
pub use layers::{xavier_uniform, Activation, Dense};
pub use lstm::{LSTMCell, LSTMPredictor};
