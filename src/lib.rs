//! # Stock RNN - Прогнозирование волатильности и объёма торгов
//!
//! Библиотека для прогнозирования будущей волатильности и объёма торгов
//! акций с использованием LSTM по скользящему окну дневных признаков.
//!
//! ## Модули
//!
//! - `data` - Типы рыночных данных и загрузка из CSV
//! - `features` - Построение окна признаков (контракт колонок)
//! - `model` - Реализация LSTM и выходного слоя
//! - `utils` - Метрики и базовые уровни для сравнения
//!
//! ## Быстрый старт
//!
//! ```rust,no_run
//! use stock_rnn::data::{load_bars_csv, FirmFundamentals, MacroSnapshot};
//! use stock_rnn::features::{TargetKind, WindowBuilder};
//! use stock_rnn::model::LSTMPredictor;
//!
//! fn main() -> anyhow::Result<()> {
//!     // 1. Загружаем дневные бары
//!     let bars = load_bars_csv("data/aapl_daily.csv")?;
//!
//!     // 2. Строим окно признаков: 30 дней, 25 колонок
//!     let builder = WindowBuilder::default();
//!     let window = builder.build(
//!         &bars,
//!         &MacroSnapshot::default(),
//!         &FirmFundamentals::default(),
//!         TargetKind::Volatility,
//!     )?;
//!
//!     // 3. Загружаем обученную модель и делаем прогноз
//!     let model = LSTMPredictor::load("models/lstm_volatility.bin")?;
//!     let predicted = model.predict(&window)?;
//!     println!("Прогноз волатильности: {:.4}", predicted);
//!
//!     Ok(())
//! }
//! ```

pub mod data;
pub mod features;
pub mod model;
pub mod utils;

// Реэкспорт основных типов для удобства
pub use data::{DailyBar, FirmFundamentals, MacroSnapshot};
pub use features::{FeatureWindow, TargetKind, WindowBuilder};
pub use model::{LSTMConfig, LSTMPredictor, ModelError};
