//! Пример: Прогноз волатильности и объёма торгов по одному тикеру
//!
//! Этот пример демонстрирует:
//! - Загрузку дневных баров и макропоказателей из CSV
//! - Построение окна признаков для обеих целей прогноза
//! - Загрузку (или инициализацию) модели и генерацию прогнозов
//! - Сравнение прогнозов с историческими базовыми уровнями
//!
//! Запуск: cargo run --example predict

use std::env;
use stock_rnn::data::{load_bars_csv, load_macro_csv, DailyBar, FirmFundamentals, MacroSnapshot};
use stock_rnn::features::{TargetKind, WindowBuilder, FEATURE_COUNT};
use stock_rnn::model::{LSTMConfig, LSTMPredictor};
use stock_rnn::utils::{average_volume, realized_volatility};

fn main() -> anyhow::Result<()> {
    env_logger::init();

    println!("=== Прогноз волатильности и объёма торгов ===\n");

    let ticker = env::var("TICKER").unwrap_or_else(|_| "AAPL".to_string());
    let bars_path = env::var("BARS_CSV").unwrap_or_else(|_| format!("data/{}_daily.csv", ticker.to_lowercase()));
    let macro_path = env::var("MACRO_CSV").unwrap_or_else(|_| "data/realtime_macro.csv".to_string());

    // Дневные бары: из CSV или синтетический ряд для демонстрации
    let bars = if std::path::Path::new(&bars_path).exists() {
        load_bars_csv(&bars_path)?
    } else {
        println!("Файл {} не найден, используем синтетический ряд\n", bars_path);
        synthetic_bars(60)
    };

    let macro_data = if std::path::Path::new(&macro_path).exists() {
        load_macro_csv(&macro_path)?
    } else {
        MacroSnapshot::default()
    };

    println!("Тикер: {}", ticker);
    println!("Баров в истории: {}", bars.len());
    if let Some(last) = bars.last() {
        println!("Последняя сессия: {}", last.datetime().format("%Y-%m-%d"));
        println!("Цена закрытия: ${:.2}", last.close);
    }
    println!();

    // Строим окна признаков для обеих целей
    let builder = WindowBuilder::default();
    let firm = FirmFundamentals::default();

    let volatility_window = builder.build(&bars, &macro_data, &firm, TargetKind::Volatility)?;
    let volume_window = builder.build(&bars, &macro_data, &firm, TargetKind::Volume)?;

    // Загружаем обученные модели или инициализируем свежие
    let config = LSTMConfig::new(FEATURE_COUNT);
    let volatility_model = load_or_init("models/lstm_volatility.bin", &config)?;
    let volume_model = load_or_init("models/lstm_volume.bin", &config)?;

    let predicted_volatility = volatility_model.predict(&volatility_window)?;
    let predicted_volume = volume_model.predict(&volume_window)?;

    // Базовые уровни за то же окно
    let baseline_volatility = realized_volatility(&bars, 30);
    let baseline_volume = average_volume(&bars, 30);

    println!("=== ПРОГНОЗ ===\n");
    println!("Волатильность:");
    println!("  Прогноз:              {:.4}", predicted_volatility);
    println!("  30-дневная реализ.:   {:.4}", baseline_volatility);
    println!();
    println!("Объём торгов:");
    println!("  Прогноз:              {:.0}", predicted_volume);
    println!("  30-дневный средний:   {:.0}", baseline_volume);
    println!();
    println!("Отказ от ответственности: Это учебный пример.");
    println!("НЕ используйте для реальной торговли!");

    Ok(())
}

/// Загружает снапшот модели или создаёт новую со случайными весами
fn load_or_init(path: &str, config: &LSTMConfig) -> anyhow::Result<LSTMPredictor> {
    if std::path::Path::new(path).exists() {
        println!("Загружаем модель из {}...", path);
        Ok(LSTMPredictor::load_checked(path, config)?)
    } else {
        println!("Снапшот {} не найден, инициализируем случайные веса", path);
        println!("(прогноз необученной модели не имеет смысла)\n");
        Ok(LSTMPredictor::from_config(config.clone()))
    }
}

/// Детерминированный синтетический ряд баров
fn synthetic_bars(n: usize) -> Vec<DailyBar> {
    (0..n)
        .map(|i| {
            let t = i as f64;
            let close = 100.0 + 10.0 * (t * 0.2).sin() + t * 0.1;
            DailyBar::new(
                i as i64 * 86_400_000,
                close - 0.5,
                close + 1.0,
                close - 1.5,
                close,
                1_000_000.0 + 50_000.0 * (t * 0.4).cos(),
            )
        })
        .collect()
}
