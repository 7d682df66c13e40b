//! Типы рыночных данных: дневные бары, макропоказатели, фундаментальные
//! показатели компании

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Ошибки при загрузке данных
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Ошибка чтения CSV: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Ошибка файловой операции: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Файл не содержит ни одной строки данных: {0}")]
    Empty(String),
}

/// Дневной бар (OHLCV данные по одной торговой сессии)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBar {
    /// Время открытия сессии (Unix timestamp в миллисекундах)
    pub timestamp: i64,

    /// Цена открытия
    pub open: f64,

    /// Максимальная цена
    pub high: f64,

    /// Минимальная цена
    pub low: f64,

    /// Цена закрытия
    pub close: f64,

    /// Объём торгов (штуки)
    pub volume: f64,
}

impl DailyBar {
    /// Создаёт новый бар
    pub fn new(timestamp: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Возвращает время как DateTime
    pub fn datetime(&self) -> DateTime<Utc> {
        DateTime::from_timestamp_millis(self.timestamp).unwrap_or_default()
    }

    /// Рассчитывает изменение цены за сессию в процентах
    pub fn price_change_pct(&self) -> f64 {
        if self.open == 0.0 {
            0.0
        } else {
            (self.close - self.open) / self.open * 100.0
        }
    }

    /// Рассчитывает полный диапазон сессии (high - low)
    pub fn full_range(&self) -> f64 {
        self.high - self.low
    }
}

/// Снимок макроэкономических показателей на последнюю доступную дату
///
/// Порядок полей повторяет контракт колонок окна признаков
/// (см. `features::columns`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacroSnapshot {
    #[serde(rename = "GDP")]
    pub gdp: f64,
    #[serde(rename = "CPI")]
    pub cpi: f64,
    #[serde(rename = "Unemployment Rate")]
    pub unemployment_rate: f64,
    #[serde(rename = "Federal Funds Rate")]
    pub federal_funds_rate: f64,
    #[serde(rename = "Personal Consumption Expenditures")]
    pub personal_consumption: f64,
    #[serde(rename = "Industrial Production")]
    pub industrial_production: f64,
    #[serde(rename = "Retail Sales")]
    pub retail_sales: f64,
    #[serde(rename = "M2 Money Stock")]
    pub m2_money_stock: f64,
    #[serde(rename = "VIX")]
    pub vix: f64,
    #[serde(rename = "TED Spread")]
    pub ted_spread: f64,
    #[serde(rename = "sentiment_score")]
    pub sentiment_score: f64,
}

/// Фундаментальные показатели компании
///
/// Провайдер может не вернуть часть показателей - в этом случае
/// используется 0.0 (поведение `Default`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FirmFundamentals {
    /// Book-to-market
    pub bm: f64,
    /// Дивидендная доходность
    pub divyield: f64,
    /// CAPE (циклически скорректированный P/E)
    pub capei: f64,
    /// Валовая маржа
    pub gpm: f64,
    /// Чистая маржа
    pub npm: f64,
    /// Рентабельность активов
    pub roa: f64,
    /// Рентабельность капитала
    pub roe: f64,
    /// Коэффициент достаточности капитала
    pub capital_ratio: f64,
    /// Debt-to-equity
    pub de_ratio: f64,
    /// Коэффициент быстрой ликвидности
    pub quick_ratio: f64,
    /// Оборачиваемость запасов
    pub inv_turn: f64,
}
