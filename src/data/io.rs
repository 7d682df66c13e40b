//! Загрузка и сохранение данных в CSV

use super::types::{DailyBar, DataError, MacroSnapshot};
use std::path::Path;

/// Загружает дневные бары из CSV файла
///
/// Ожидаемые колонки: timestamp, open, high, low, close, volume
pub fn load_bars_csv<P: AsRef<Path>>(path: P) -> Result<Vec<DailyBar>, DataError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut bars = Vec::new();
    for result in reader.deserialize() {
        let bar: DailyBar = result?;
        bars.push(bar);
    }

    if bars.is_empty() {
        return Err(DataError::Empty(path.display().to_string()));
    }

    log::debug!("Загружено {} баров из {}", bars.len(), path.display());
    Ok(bars)
}

/// Сохраняет дневные бары в CSV файл
pub fn save_bars_csv<P: AsRef<Path>>(path: P, bars: &[DailyBar]) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;

    for bar in bars {
        writer.serialize(bar)?;
    }

    writer.flush()?;
    Ok(())
}

/// Загружает снимок макропоказателей из CSV файла
///
/// Файл содержит историю публикаций; актуальным считается последний ряд
/// (показатели публикуются с лагом и действуют до следующей публикации).
pub fn load_macro_csv<P: AsRef<Path>>(path: P) -> Result<MacroSnapshot, DataError> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;

    let mut latest: Option<MacroSnapshot> = None;
    for result in reader.deserialize() {
        let snapshot: MacroSnapshot = result?;
        latest = Some(snapshot);
    }

    latest.ok_or_else(|| DataError::Empty(path.display().to_string()))
}
