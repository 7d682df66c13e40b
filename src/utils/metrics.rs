//! Метрики качества и базовые уровни для сравнения прогнозов

use crate::data::DailyBar;
use ndarray::Array1;

/// Mean Squared Error (среднеквадратичная ошибка)
pub fn mse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let diff = y_true - y_pred;
    let squared = diff.mapv(|x| x * x);
    squared.mean().unwrap_or(0.0)
}

/// Root Mean Squared Error (корень из MSE)
pub fn rmse(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    mse(y_true, y_pred).sqrt()
}

/// Mean Absolute Error (средняя абсолютная ошибка)
pub fn mae(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let diff = y_true - y_pred;
    let abs_diff = diff.mapv(|x| x.abs());
    abs_diff.mean().unwrap_or(0.0)
}

/// Mean Absolute Percentage Error (средняя абсолютная процентная ошибка)
pub fn mape(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> f64 {
    let n = y_true.len() as f64;
    let mut sum = 0.0;

    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        if *t != 0.0 {
            sum += ((t - p) / t).abs();
        }
    }

    (sum / n) * 100.0
}

/// Реализованная волатильность: выборочное стандартное отклонение
/// дневных доходностей за последние `period` сессий
///
/// Та же формула (делитель n-1), что и в колонке Volatility_5d окна
/// признаков, поэтому прогноз сравним с этим базовым уровнем напрямую.
pub fn realized_volatility(bars: &[DailyBar], period: usize) -> f64 {
    if bars.len() < period + 1 || period < 2 {
        return 0.0;
    }

    let tail = &bars[bars.len() - period - 1..];
    let returns: Vec<f64> = tail
        .windows(2)
        .filter(|w| w[0].close != 0.0)
        .map(|w| (w[1].close - w[0].close) / w[0].close)
        .collect();

    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

/// Средний объём торгов за последние `period` сессий
pub fn average_volume(bars: &[DailyBar], period: usize) -> f64 {
    if bars.is_empty() || period == 0 {
        return 0.0;
    }

    let start = bars.len().saturating_sub(period);
    let tail = &bars[start..];
    tail.iter().map(|b| b.volume).sum::<f64>() / tail.len() as f64
}
