//! Окно признаков и его построение из рыночных данных

use super::columns::{TargetKind, DEFAULT_WINDOW, FEATURE_COUNT, TARGET_COLUMN};
use crate::data::{DailyBar, FirmFundamentals, MacroSnapshot};
use anyhow::{anyhow, Result};
use ndarray::{Array2, Array3};

/// Окно признаков: упорядоченная матрица L x F, от старых строк к новым
///
/// Неизменяемо после создания. Пустые окна и нечисловые значения
/// отвергаются на входе: модель никогда не получает матрицу с пропусками.
#[derive(Debug, Clone)]
pub struct FeatureWindow {
    values: Array2<f64>,
    target: TargetKind,
}

impl FeatureWindow {
    /// Создаёт окно из готовой матрицы значений
    pub fn new(values: Array2<f64>, target: TargetKind) -> Result<Self> {
        if values.nrows() == 0 || values.ncols() == 0 {
            return Err(anyhow!("Окно признаков не может быть пустым"));
        }

        if values.iter().any(|v| !v.is_finite()) {
            return Err(anyhow!(
                "Окно признаков содержит нечисловые значения (NaN/inf)"
            ));
        }

        Ok(Self { values, target })
    }

    /// Длина окна (количество торговых дней)
    pub fn len(&self) -> usize {
        self.values.nrows()
    }

    /// Количество признаков в каждой строке
    pub fn feature_dim(&self) -> usize {
        self.values.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.values.nrows() == 0
    }

    /// Цель прогноза, под которую собрано окно
    pub fn target(&self) -> TargetKind {
        self.target
    }

    /// Матрица значений L x F
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Преобразует окно в батч из одной последовательности [1, L, F]
    pub fn to_batch(&self) -> Array3<f64> {
        let (rows, cols) = self.values.dim();
        self.values
            .clone()
            .into_shape((1, rows, cols))
            .expect("размерности совпадают по построению")
    }
}

/// Построитель окна признаков из дневных баров, макропоказателей
/// и фундаментальных показателей компании
///
/// Производные колонки (momentum, скользящая волатильность) считаются
/// внутри окна; для первых пяти строк истории не хватает, и они
/// заполняются нулями - так же обучалась модель.
#[derive(Debug, Clone)]
pub struct WindowBuilder {
    /// Длина окна (торговых дней)
    pub sequence_length: usize,
}

impl Default for WindowBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

impl WindowBuilder {
    /// Создаёт построитель с заданной длиной окна
    pub fn new(sequence_length: usize) -> Self {
        Self { sequence_length }
    }

    /// Строит окно признаков по последним `sequence_length` барам
    ///
    /// Макропоказатели и фундаментальные показатели публикуются реже,
    /// чем дневные бары, поэтому последние известные значения
    /// транслируются на каждую строку окна.
    pub fn build(
        &self,
        bars: &[DailyBar],
        macro_data: &MacroSnapshot,
        firm: &FirmFundamentals,
        target: TargetKind,
    ) -> Result<FeatureWindow> {
        if bars.len() < self.sequence_length {
            return Err(anyhow!(
                "Недостаточно данных: {} баров, нужно минимум {}",
                bars.len(),
                self.sequence_length
            ));
        }

        // Последние sequence_length баров, от старых к новым
        let tail = &bars[bars.len() - self.sequence_length..];

        let closes: Vec<f64> = tail.iter().map(|b| b.close).collect();
        let returns = daily_returns(&closes);

        let mut values = Array2::zeros((self.sequence_length, FEATURE_COUNT));

        for (i, bar) in tail.iter().enumerate() {
            values[[i, 0]] = bar.close; // PRC

            values[[i, TARGET_COLUMN]] = match target {
                TargetKind::Volatility => rolling_return_std(&returns, i, 5),
                TargetKind::Volume => bar.volume,
            };

            values[[i, 2]] = momentum(&closes, i, 5);
            values[[i, 3]] = macro_data.sentiment_score;

            // Макроблок (колонки 4-13)
            values[[i, 4]] = macro_data.gdp;
            values[[i, 5]] = macro_data.cpi;
            values[[i, 6]] = macro_data.unemployment_rate;
            values[[i, 7]] = macro_data.federal_funds_rate;
            values[[i, 8]] = macro_data.personal_consumption;
            values[[i, 9]] = macro_data.industrial_production;
            values[[i, 10]] = macro_data.retail_sales;
            values[[i, 11]] = macro_data.m2_money_stock;
            values[[i, 12]] = macro_data.vix;
            values[[i, 13]] = macro_data.ted_spread;

            // Фундаментальный блок (колонки 14-24)
            values[[i, 14]] = firm.bm;
            values[[i, 15]] = firm.divyield;
            values[[i, 16]] = firm.capei;
            values[[i, 17]] = firm.gpm;
            values[[i, 18]] = firm.npm;
            values[[i, 19]] = firm.roa;
            values[[i, 20]] = firm.roe;
            values[[i, 21]] = firm.capital_ratio;
            values[[i, 22]] = firm.de_ratio;
            values[[i, 23]] = firm.quick_ratio;
            values[[i, 24]] = firm.inv_turn;
        }

        FeatureWindow::new(values, target)
    }
}

/// Дневные доходности; для первой строки доходность не определена (None)
fn daily_returns(closes: &[f64]) -> Vec<Option<f64>> {
    let mut returns = vec![None; closes.len()];
    for i in 1..closes.len() {
        if closes[i - 1] != 0.0 {
            returns[i] = Some((closes[i] - closes[i - 1]) / closes[i - 1]);
        }
    }
    returns
}

/// Momentum: процентное изменение цены за `period` шагов, 0 пока
/// истории не хватает
fn momentum(closes: &[f64], idx: usize, period: usize) -> f64 {
    if idx < period || closes[idx - period] == 0.0 {
        0.0
    } else {
        (closes[idx] - closes[idx - period]) / closes[idx - period]
    }
}

/// Скользящее выборочное стандартное отклонение доходностей
///
/// Окно из `period` доходностей, заканчивающееся на `idx`; выборочная
/// дисперсия (делитель n-1). 0 пока в окне есть неопределённые доходности.
fn rolling_return_std(returns: &[Option<f64>], idx: usize, period: usize) -> f64 {
    if idx + 1 < period {
        return 0.0;
    }

    let window = &returns[idx + 1 - period..=idx];
    let mut vals = Vec::with_capacity(period);
    for r in window {
        match r {
            Some(v) => vals.push(*v),
            None => return 0.0,
        }
    }

    let n = vals.len() as f64;
    let mean = vals.iter().sum::<f64>() / n;
    let variance = vals.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_bars(n: usize) -> Vec<DailyBar> {
        (0..n)
            .map(|i| {
                let base = 100.0 + i as f64;
                DailyBar::new(
                    i as i64 * 86_400_000,
                    base,
                    base + 2.0,
                    base - 1.0,
                    base + 1.0,
                    1000.0 + i as f64 * 10.0,
                )
            })
            .collect()
    }

    fn test_macro() -> MacroSnapshot {
        MacroSnapshot {
            gdp: 27360.0,
            cpi: 307.5,
            vix: 13.2,
            sentiment_score: 0.35,
            ..Default::default()
        }
    }

    #[test]
    fn test_build_shape() {
        let bars = create_test_bars(60);
        let builder = WindowBuilder::default();
        let window = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volatility,
            )
            .unwrap();

        assert_eq!(window.len(), 30);
        assert_eq!(window.feature_dim(), FEATURE_COUNT);
    }

    #[test]
    fn test_insufficient_bars_fails() {
        let bars = create_test_bars(10);
        let builder = WindowBuilder::default();
        let result = builder.build(
            &bars,
            &test_macro(),
            &FirmFundamentals::default(),
            TargetKind::Volatility,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_price_column_is_close() {
        let bars = create_test_bars(40);
        let builder = WindowBuilder::new(30);
        let window = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volatility,
            )
            .unwrap();

        // Последняя строка окна = последний бар
        assert_eq!(window.values()[[29, 0]], bars[39].close);
    }

    #[test]
    fn test_volume_variant_overrides_target_column() {
        let bars = create_test_bars(40);
        let builder = WindowBuilder::new(30);

        let vol = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volatility,
            )
            .unwrap();
        let volume = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volume,
            )
            .unwrap();

        // Колонка 1: объём торгов вместо волатильности
        assert_eq!(volume.values()[[29, TARGET_COLUMN]], bars[39].volume);
        // Остальные колонки идентичны
        assert_eq!(vol.values()[[29, 0]], volume.values()[[29, 0]]);
        assert_eq!(vol.values()[[29, 2]], volume.values()[[29, 2]]);
    }

    #[test]
    fn test_momentum_warmup_is_zero() {
        let bars = create_test_bars(40);
        let builder = WindowBuilder::new(30);
        let window = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volatility,
            )
            .unwrap();

        // Первые 5 строк: истории для pct_change(5) не хватает
        for i in 0..5 {
            assert_eq!(window.values()[[i, 2]], 0.0);
        }
        assert!(window.values()[[5, 2]] > 0.0);
    }

    #[test]
    fn test_momentum_value() {
        let bars = create_test_bars(30);
        let builder = WindowBuilder::new(30);
        let window = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volatility,
            )
            .unwrap();

        // closes: 101, 102, ... momentum[10] = (111 - 106) / 106
        let expected = (111.0 - 106.0) / 106.0;
        assert!((window.values()[[10, 2]] - expected).abs() < 1e-12);
    }

    #[test]
    fn test_rolling_std_warmup_is_zero() {
        let bars = create_test_bars(40);
        let builder = WindowBuilder::new(30);
        let window = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volatility,
            )
            .unwrap();

        // Доходность первой строки не определена, поэтому первые 5 строк = 0
        for i in 0..5 {
            assert_eq!(window.values()[[i, 1]], 0.0);
        }
        assert!(window.values()[[5, 1]] > 0.0);
    }

    #[test]
    fn test_macro_broadcast_to_all_rows() {
        let bars = create_test_bars(35);
        let builder = WindowBuilder::new(30);
        let window = builder
            .build(
                &bars,
                &test_macro(),
                &FirmFundamentals::default(),
                TargetKind::Volatility,
            )
            .unwrap();

        for i in 0..30 {
            assert_eq!(window.values()[[i, 4]], 27360.0); // GDP
            assert_eq!(window.values()[[i, 12]], 13.2); // VIX
            assert_eq!(window.values()[[i, 3]], 0.35); // sentiment
        }
    }

    #[test]
    fn test_rolling_std_matches_sample_formula() {
        // Доходности окна считаются вручную
        let returns = vec![None, Some(0.01), Some(0.02), Some(0.03), Some(0.04), Some(0.05)];
        let std = rolling_return_std(&returns, 5, 5);

        // Выборочное std от [0.01..0.05]: mean=0.03, var=0.00025
        assert!((std - 0.00025_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_window_rejects_nan() {
        let values = array![[1.0, f64::NAN], [2.0, 3.0]];
        assert!(FeatureWindow::new(values, TargetKind::Volatility).is_err());
    }

    #[test]
    fn test_to_batch_shape() {
        let values = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let window = FeatureWindow::new(values, TargetKind::Volume).unwrap();
        let batch = window.to_batch();

        assert_eq!(batch.shape(), &[1, 3, 2]);
        assert_eq!(batch[[0, 2, 1]], 6.0);
    }
}
