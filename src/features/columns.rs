//! Контракт колонок окна признаков
//!
//! Порядок и состав колонок фиксированы для всего развёртывания:
//! модель обучена на этом порядке, и любое изменение требует
//! переобучения. Колонка с индексом 1 зависит от цели прогноза.

use serde::{Deserialize, Serialize};

/// Количество признаков в каждой строке окна
pub const FEATURE_COUNT: usize = 25;

/// Длина окна по умолчанию (торговых дней)
pub const DEFAULT_WINDOW: usize = 30;

/// Индекс колонки, зависящей от цели прогноза
pub const TARGET_COLUMN: usize = 1;

/// Цель прогноза
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetKind {
    /// Волатильность (скользящее стандартное отклонение доходностей)
    Volatility,
    /// Объём торгов (штуки за сессию)
    Volume,
}

/// Возвращает названия колонок для заданной цели
///
/// Колонки 0-3: цена и производные от котировок; 4-13: макропоказатели;
/// 14-24: фундаментальные показатели компании.
pub fn column_names(target: TargetKind) -> [&'static str; FEATURE_COUNT] {
    let target_col = match target {
        TargetKind::Volatility => "Volatility_5d",
        TargetKind::Volume => "VOL",
    };

    [
        "PRC",
        target_col,
        "Momentum",
        "sentiment_score",
        "GDP",
        "CPI",
        "Unemployment Rate",
        "Federal Funds Rate",
        "Personal Consumption Expenditures",
        "Industrial Production",
        "Retail Sales",
        "M2 Money Stock",
        "VIX",
        "TED Spread",
        "bm",
        "divyield",
        "capei",
        "gpm",
        "npm",
        "roa",
        "roe",
        "capital_ratio",
        "de_ratio",
        "quick_ratio",
        "inv_turn",
    ]
}
