//! # Модуль построения признаков
//!
//! Сборка окна признаков для модели:
//! - фиксированный контракт колонок (25 признаков)
//! - производные колонки: momentum, скользящая волатильность
//! - трансляция макро- и фундаментальных показателей на каждую строку
//!
//! ## Пример использования
//!
//! ```rust
//! use stock_rnn::data::{DailyBar, FirmFundamentals, MacroSnapshot};
//! use stock_rnn::features::{TargetKind, WindowBuilder};
//!
//! let bars: Vec<DailyBar> = (0..30)
//!     .map(|i| DailyBar::new(i * 86_400_000, 100.0, 101.0, 99.0, 100.5, 1000.0))
//!     .collect();
//!
//! let builder = WindowBuilder::default();
//! let window = builder
//!     .build(
//!         &bars,
//!         &MacroSnapshot::default(),
//!         &FirmFundamentals::default(),
//!         TargetKind::Volume,
//!     )
//!     .unwrap();
//!
//! assert_eq!(window.len(), 30);
//! assert_eq!(window.feature_dim(), 25);
//! ```

mod columns;
mod window;

pub use columns::{column_names, TargetKind, DEFAULT_WINDOW, FEATURE_COUNT, TARGET_COLUMN};
pub use window::{FeatureWindow, WindowBuilder};
