//! Реализация LSTM (Long Short-Term Memory)
//!
//! Модель сворачивает последовательность дневных признаков в итоговое
//! скрытое состояние и проецирует его в один скаляр - прогноз
//! волатильности или объёма торгов.

use super::config::LSTMConfig;
use super::error::ModelError;
use super::layers::{xavier_uniform, Activation, Dense};
use crate::features::FeatureWindow;
use ndarray::{s, Array1, Array2, Array3};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// LSTM ячейка
///
/// Все матрицы весов инициализируются по Xavier, все смещения - нулями.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LSTMCell {
    /// Размер входа
    pub input_size: usize,
    /// Размер скрытого состояния
    pub hidden_size: usize,

    // Веса для входного вентиля (input gate)
    w_ii: Array2<f64>, // input -> input gate
    w_hi: Array2<f64>, // hidden -> input gate
    b_i: Array1<f64>,

    // Веса для вентиля забывания (forget gate)
    w_if: Array2<f64>,
    w_hf: Array2<f64>,
    b_f: Array1<f64>,

    // Веса для кандидата ячейки (cell candidate)
    w_ig: Array2<f64>,
    w_hg: Array2<f64>,
    b_g: Array1<f64>,

    // Веса для выходного вентиля (output gate)
    w_io: Array2<f64>,
    w_ho: Array2<f64>,
    b_o: Array1<f64>,
}

impl LSTMCell {
    /// Создаёт новую LSTM ячейку
    pub fn new(input_size: usize, hidden_size: usize) -> Self {
        Self {
            input_size,
            hidden_size,
            // Input gate
            w_ii: xavier_uniform(hidden_size, input_size),
            w_hi: xavier_uniform(hidden_size, hidden_size),
            b_i: Array1::zeros(hidden_size),
            // Forget gate
            w_if: xavier_uniform(hidden_size, input_size),
            w_hf: xavier_uniform(hidden_size, hidden_size),
            b_f: Array1::zeros(hidden_size),
            // Cell candidate
            w_ig: xavier_uniform(hidden_size, input_size),
            w_hg: xavier_uniform(hidden_size, hidden_size),
            b_g: Array1::zeros(hidden_size),
            // Output gate
            w_io: xavier_uniform(hidden_size, input_size),
            w_ho: xavier_uniform(hidden_size, hidden_size),
            b_o: Array1::zeros(hidden_size),
        }
    }

    /// Прямой проход для одного временного шага
    ///
    /// # Аргументы
    ///
    /// * `x` - Входной вектор [input_size]
    /// * `h_prev` - Предыдущее скрытое состояние [hidden_size]
    /// * `c_prev` - Предыдущее состояние ячейки [hidden_size]
    ///
    /// # Возвращает
    ///
    /// (h_next, c_next) - Новые скрытое состояние и состояние ячейки
    pub fn forward(
        &self,
        x: &Array1<f64>,
        h_prev: &Array1<f64>,
        c_prev: &Array1<f64>,
    ) -> (Array1<f64>, Array1<f64>) {
        // Input gate: i = σ(W_ii * x + W_hi * h + b_i)
        let i_gate = sigmoid(&(self.w_ii.dot(x) + self.w_hi.dot(h_prev) + &self.b_i));

        // Forget gate: f = σ(W_if * x + W_hf * h + b_f)
        let f_gate = sigmoid(&(self.w_if.dot(x) + self.w_hf.dot(h_prev) + &self.b_f));

        // Cell candidate: g = tanh(W_ig * x + W_hg * h + b_g)
        let g = tanh(&(self.w_ig.dot(x) + self.w_hg.dot(h_prev) + &self.b_g));

        // Output gate: o = σ(W_io * x + W_ho * h + b_o)
        let o_gate = sigmoid(&(self.w_io.dot(x) + self.w_ho.dot(h_prev) + &self.b_o));

        // New cell state: c = f * c_prev + i * g
        let c_next = &f_gate * c_prev + &i_gate * &g;

        // New hidden state: h = o * tanh(c)
        let h_next = &o_gate * &tanh(&c_next);

        (h_next, c_next)
    }

    /// Инициализирует скрытое состояние нулями
    pub fn init_hidden(&self) -> (Array1<f64>, Array1<f64>) {
        (
            Array1::zeros(self.hidden_size),
            Array1::zeros(self.hidden_size),
        )
    }

    /// Проверяет согласованность размерностей весов
    fn validate(&self) -> Result<(), ModelError> {
        let ih = (self.hidden_size, self.input_size);
        let hh = (self.hidden_size, self.hidden_size);

        let ih_ok = [&self.w_ii, &self.w_if, &self.w_ig, &self.w_io]
            .iter()
            .all(|w| w.dim() == ih);
        let hh_ok = [&self.w_hi, &self.w_hf, &self.w_hg, &self.w_ho]
            .iter()
            .all(|w| w.dim() == hh);
        let b_ok = [&self.b_i, &self.b_f, &self.b_g, &self.b_o]
            .iter()
            .all(|b| b.len() == self.hidden_size);

        if ih_ok && hh_ok && b_ok {
            Ok(())
        } else {
            Err(ModelError::Snapshot(format!(
                "веса ячейки не соответствуют размерностям {}x{}",
                self.hidden_size, self.input_size
            )))
        }
    }
}

/// LSTM модель прогнозирования: последовательность признаков -> скаляр
///
/// Выход - последнее скрытое состояние последнего слоя, пропущенное
/// через линейный слой без активации. Интерпретация скаляра (волатильность
/// или объём) определяется тем, на какую цель обучались веса.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LSTMPredictor {
    /// Конфигурация модели
    pub config: LSTMConfig,
    /// LSTM ячейки (по одной на слой)
    cells: Vec<LSTMCell>,
    /// Выходной слой
    output_layer: Dense,
}

impl LSTMPredictor {
    /// Создаёт модель с конфигурацией по умолчанию
    /// (64 скрытых нейрона, один слой)
    pub fn new(input_size: usize) -> Self {
        Self::from_config(LSTMConfig::new(input_size))
    }

    /// Создаёт модель из конфигурации
    pub fn from_config(config: LSTMConfig) -> Self {
        let mut cells = Vec::with_capacity(config.num_layers);

        // Первый слой принимает входные признаки
        cells.push(LSTMCell::new(config.input_size, config.hidden_size));

        // Последующие слои принимают выход предыдущего слоя
        for _ in 1..config.num_layers {
            cells.push(LSTMCell::new(config.hidden_size, config.hidden_size));
        }

        let output_layer = Dense::new(config.hidden_size, 1, Activation::Linear);

        Self {
            config,
            cells,
            output_layer,
        }
    }

    /// Прямой проход через всю сеть
    ///
    /// # Аргументы
    ///
    /// * `x` - Батч последовательностей [batch_size, seq_len, input_size]
    ///
    /// # Возвращает
    ///
    /// Один скаляр на каждую последовательность батча.
    /// Последовательности батча независимы: состояние не переносится
    /// между ними. Шаги внутри последовательности обрабатываются строго
    /// по порядку. Dropout активен только при обучении, поэтому на
    /// инференсе не применяется.
    pub fn forward(&self, x: &Array3<f64>) -> Result<Array1<f64>, ModelError> {
        let batch_size = x.shape()[0];
        let seq_len = x.shape()[1];
        let n_features = x.shape()[2];

        if seq_len == 0 {
            return Err(ModelError::EmptySequence);
        }
        if n_features != self.config.input_size {
            return Err(ModelError::ShapeMismatch {
                expected: self.config.input_size,
                got: n_features,
            });
        }

        let mut outputs = Array1::zeros(batch_size);

        for b in 0..batch_size {
            // Свежие нулевые состояния для каждой последовательности
            let mut states: Vec<(Array1<f64>, Array1<f64>)> =
                self.cells.iter().map(|cell| cell.init_hidden()).collect();

            // Проходим по последовательности
            for t in 0..seq_len {
                let mut layer_input: Array1<f64> = x.slice(s![b, t, ..]).to_owned();

                // Проходим через все LSTM слои
                for (layer_idx, cell) in self.cells.iter().enumerate() {
                    let (h_prev, c_prev) = &states[layer_idx];
                    let (h_next, c_next) = cell.forward(&layer_input, h_prev, c_prev);

                    layer_input = h_next.clone();
                    states[layer_idx] = (h_next, c_next);
                }
            }

            // Берём последнее скрытое состояние последнего слоя
            let final_hidden = &states[self.cells.len() - 1].0;

            // Линейная проекция в скаляр
            let output = self.output_layer.forward(final_hidden);
            outputs[b] = output[0];
        }

        if outputs.iter().any(|v| !v.is_finite()) {
            return Err(ModelError::NonFinite);
        }

        Ok(outputs)
    }

    /// Делает прогноз для одного окна признаков
    pub fn predict(&self, window: &FeatureWindow) -> Result<f64, ModelError> {
        if window.feature_dim() != self.config.input_size {
            return Err(ModelError::ShapeMismatch {
                expected: self.config.input_size,
                got: window.feature_dim(),
            });
        }

        let outputs = self.forward(&window.to_batch())?;
        Ok(outputs[0])
    }

    /// Сохраняет модель в файл
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), ModelError> {
        let encoded = bincode::serialize(self)?;
        std::fs::write(path, encoded)?;
        Ok(())
    }

    /// Загружает модель из файла
    ///
    /// Размерности всех весов сверяются с конфигурацией из снапшота;
    /// повреждённый или несогласованный снапшот отвергается до первого
    /// прогноза.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelError> {
        let data = std::fs::read(path)?;
        let model: Self = bincode::deserialize(&data)?;
        model.validate()?;
        Ok(model)
    }

    /// Загружает модель и сверяет её конфигурацию с ожидаемой
    ///
    /// Отвергает снапшот, обученный с другими `input_size`,
    /// `hidden_size` или `num_layers`.
    pub fn load_checked<P: AsRef<Path>>(
        path: P,
        expected: &LSTMConfig,
    ) -> Result<Self, ModelError> {
        let model = Self::load(path)?;
        let config = &model.config;

        if config.input_size != expected.input_size
            || config.hidden_size != expected.hidden_size
            || config.num_layers != expected.num_layers
        {
            return Err(ModelError::Snapshot(format!(
                "снапшот обучен как {}x{}x{}, ожидалось {}x{}x{}",
                config.input_size,
                config.hidden_size,
                config.num_layers,
                expected.input_size,
                expected.hidden_size,
                expected.num_layers
            )));
        }

        Ok(model)
    }

    /// Проверяет согласованность снапшота
    fn validate(&self) -> Result<(), ModelError> {
        if self.cells.len() != self.config.num_layers {
            return Err(ModelError::Snapshot(format!(
                "слоёв в снапшоте {}, в конфигурации {}",
                self.cells.len(),
                self.config.num_layers
            )));
        }

        for (i, cell) in self.cells.iter().enumerate() {
            let expected_input = if i == 0 {
                self.config.input_size
            } else {
                self.config.hidden_size
            };

            if cell.input_size != expected_input || cell.hidden_size != self.config.hidden_size {
                return Err(ModelError::Snapshot(format!(
                    "слой {}: размерности {}x{}, ожидалось {}x{}",
                    i, cell.hidden_size, cell.input_size, self.config.hidden_size, expected_input
                )));
            }
            cell.validate()?;
        }

        if self.output_layer.input_size() != self.config.hidden_size
            || self.output_layer.output_size() != 1
        {
            return Err(ModelError::Snapshot(format!(
                "выходной слой {}x{}, ожидалось 1x{}",
                self.output_layer.output_size(),
                self.output_layer.input_size(),
                self.config.hidden_size
            )));
        }

        Ok(())
    }
}

// Вспомогательные функции

fn sigmoid(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| 1.0 / (1.0 + (-v).exp()))
}

fn tanh(x: &Array1<f64>) -> Array1<f64> {
    x.mapv(|v| v.tanh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::TargetKind;

    #[test]
    fn test_lstm_cell_shapes() {
        let cell = LSTMCell::new(5, 10);
        let x = Array1::zeros(5);
        let (h, c) = cell.init_hidden();

        let (h_next, c_next) = cell.forward(&x, &h, &c);

        assert_eq!(h_next.len(), 10);
        assert_eq!(c_next.len(), 10);
    }

    #[test]
    fn test_cell_biases_start_at_zero() {
        let cell = LSTMCell::new(5, 10);

        assert!(cell.b_i.iter().all(|&b| b == 0.0));
        assert!(cell.b_f.iter().all(|&b| b == 0.0));
        assert!(cell.b_g.iter().all(|&b| b == 0.0));
        assert!(cell.b_o.iter().all(|&b| b == 0.0));
    }

    #[test]
    fn test_cell_weights_within_xavier_bounds() {
        let input_size = 7;
        let hidden_size = 12;
        let cell = LSTMCell::new(input_size, hidden_size);

        let a_ih = (6.0 / (input_size + hidden_size) as f64).sqrt();
        let a_hh = (6.0 / (2 * hidden_size) as f64).sqrt();

        for w in [&cell.w_ii, &cell.w_if, &cell.w_ig, &cell.w_io] {
            assert!(w.iter().all(|&v| v.abs() <= a_ih));
        }
        for w in [&cell.w_hi, &cell.w_hf, &cell.w_hg, &cell.w_ho] {
            assert!(w.iter().all(|&v| v.abs() <= a_hh));
        }
    }

    #[test]
    fn test_forward_output_shape() {
        let model = LSTMPredictor::from_config(LSTMConfig::new(5).with_hidden_size(32));

        let x = Array3::zeros((2, 10, 5)); // batch=2, seq=10, features=5
        let output = model.forward(&x).unwrap();

        assert_eq!(output.len(), 2);
    }

    #[test]
    fn test_forward_rejects_feature_mismatch() {
        let model = LSTMPredictor::new(5);
        let x = Array3::zeros((1, 10, 4));

        match model.forward(&x) {
            Err(ModelError::ShapeMismatch { expected, got }) => {
                assert_eq!(expected, 5);
                assert_eq!(got, 4);
            }
            other => panic!("ожидался ShapeMismatch, получено {:?}", other),
        }
    }

    #[test]
    fn test_forward_rejects_empty_sequence() {
        let model = LSTMPredictor::new(5);
        let x = Array3::zeros((1, 0, 5));

        assert!(matches!(model.forward(&x), Err(ModelError::EmptySequence)));
    }

    #[test]
    fn test_forward_accepts_single_step() {
        let model = LSTMPredictor::from_config(LSTMConfig::new(5).with_hidden_size(8));
        let x = Array3::from_elem((1, 1, 5), 0.3);

        let output = model.forward(&x).unwrap();
        assert!(output[0].is_finite());
    }

    #[test]
    fn test_forward_is_deterministic() {
        let model = LSTMPredictor::from_config(LSTMConfig::new(3).with_hidden_size(8));
        let x = Array3::from_shape_fn((2, 6, 3), |(b, t, f)| {
            (b as f64 + 1.0) * 0.1 + t as f64 * 0.01 + f as f64 * 0.001
        });

        let first = model.forward(&x).unwrap();
        let second = model.forward(&x).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_batch_independence() {
        let model = LSTMPredictor::from_config(LSTMConfig::new(3).with_hidden_size(8));

        let a = Array2::from_shape_fn((6, 3), |(t, f)| t as f64 * 0.1 - f as f64 * 0.05);
        let b = Array2::from_shape_fn((6, 3), |(t, f)| 1.0 - t as f64 * 0.2 + f as f64 * 0.07);

        let mut pair = Array3::zeros((2, 6, 3));
        pair.slice_mut(s![0, .., ..]).assign(&a);
        pair.slice_mut(s![1, .., ..]).assign(&b);

        let mut single = Array3::zeros((1, 6, 3));
        single.slice_mut(s![0, .., ..]).assign(&a);

        let pair_out = model.forward(&pair).unwrap();
        let single_out = model.forward(&single).unwrap();

        assert_eq!(pair_out[0], single_out[0]);
    }

    #[test]
    fn test_forward_surfaces_non_finite() {
        let model = LSTMPredictor::from_config(LSTMConfig::new(3).with_hidden_size(4));
        let x = Array3::from_elem((1, 4, 3), f64::NAN);

        assert!(matches!(model.forward(&x), Err(ModelError::NonFinite)));
    }

    #[test]
    fn test_stacked_layers_cell_dimensions() {
        let model = LSTMPredictor::from_config(
            LSTMConfig::new(25).with_hidden_size(16).with_layers(3),
        );

        assert_eq!(model.cells.len(), 3);
        assert_eq!(model.cells[0].input_size, 25);
        assert_eq!(model.cells[1].input_size, 16);
        assert_eq!(model.cells[2].input_size, 16);
    }

    /// Ручная проверка рекуррентности с насыщенными вентилями:
    /// i ≈ 1, f ≈ 0, o ≈ 1, поэтому c_t = tanh(W_ig * x_t) и
    /// h_t = tanh(tanh(W_ig * x_t)) - зависит только от последнего шага.
    #[test]
    fn test_closed_form_recurrence() {
        let mut model =
            LSTMPredictor::from_config(LSTMConfig::new(3).with_hidden_size(4));

        {
            let cell = &mut model.cells[0];
            for w in [
                &mut cell.w_ii,
                &mut cell.w_hi,
                &mut cell.w_if,
                &mut cell.w_hf,
                &mut cell.w_hg,
                &mut cell.w_io,
                &mut cell.w_ho,
            ] {
                w.fill(0.0);
            }
            cell.b_i.fill(50.0); // sigmoid(50) ≈ 1
            cell.b_f.fill(-50.0); // sigmoid(-50) ≈ 0
            cell.b_o.fill(50.0);
            cell.b_g.fill(0.0);

            cell.w_ig.fill(0.0);
            for k in 0..3 {
                cell.w_ig[[k, k]] = 1.0;
            }
        }

        model.output_layer.weights.fill(1.0);
        model.output_layer.biases.fill(0.0);

        let x = Array3::from_shape_vec(
            (1, 3, 3),
            vec![1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        )
        .unwrap();

        let output = model.forward(&x).unwrap();

        // Последний вход [0,0,1]: h = tanh(tanh(1)) в третьем нейроне,
        // остальные tanh(tanh(0)) = 0; сумма по весам 1.0
        let expected = 1.0_f64.tanh().tanh();
        assert!((output[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn test_predict_window_checks_feature_dim() {
        let model = LSTMPredictor::new(5);
        let values = Array2::from_elem((10, 3), 0.5);
        let window = FeatureWindow::new(values, TargetKind::Volatility).unwrap();

        assert!(matches!(
            model.predict(&window),
            Err(ModelError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_snapshot_roundtrip_preserves_predictions() {
        let path = std::env::temp_dir().join("stock_rnn_test_model.bin");
        let model = LSTMPredictor::from_config(LSTMConfig::new(4).with_hidden_size(6));
        let x = Array3::from_elem((1, 5, 4), 0.25);

        let before = model.forward(&x).unwrap();

        model.save(&path).unwrap();
        let loaded = LSTMPredictor::load(&path).unwrap();
        let after = loaded.forward(&x).unwrap();

        assert_eq!(before, after);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_load_checked_rejects_wrong_config() {
        let path = std::env::temp_dir().join("stock_rnn_test_model_mismatch.bin");
        let model = LSTMPredictor::from_config(LSTMConfig::new(4).with_hidden_size(6));
        model.save(&path).unwrap();

        let expected = LSTMConfig::new(4).with_hidden_size(8);
        let result = LSTMPredictor::load_checked(&path, &expected);

        assert!(matches!(result, Err(ModelError::Snapshot(_))));
        std::fs::remove_file(&path).ok();
    }
}
