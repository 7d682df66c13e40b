//! # Модуль рыночных данных
//!
//! Типы дневных баров, макропоказателей и фундаментальных показателей,
//! а также загрузка их из CSV файлов.
//!
//! Источники данных (биржевые котировки, макростатистика, отчётность
//! компаний) находятся за пределами библиотеки: сюда попадают уже
//! полученные и выровненные по датам ряды.

mod io;
mod types;

pub use io::{load_bars_csv, load_macro_csv, save_bars_csv};
pub use types::{DailyBar, DataError, FirmFundamentals, MacroSnapshot};
