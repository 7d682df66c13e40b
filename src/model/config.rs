//! Конфигурация LSTM модели

use serde::{Deserialize, Serialize};

/// Конфигурация LSTM модели
///
/// `dropout` применяется только между LSTM слоями, поэтому при
/// `num_layers == 1` он принудительно обнуляется.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LSTMConfig {
    /// Количество входных признаков
    pub input_size: usize,
    /// Размер скрытого состояния
    pub hidden_size: usize,
    /// Количество LSTM слоёв
    pub num_layers: usize,
    /// Dropout между слоями (0.0 при одном слое)
    pub dropout: f64,
}

impl LSTMConfig {
    /// Создаёт конфигурацию с параметрами по умолчанию:
    /// 64 скрытых нейрона, один слой, без dropout
    pub fn new(input_size: usize) -> Self {
        Self {
            input_size,
            hidden_size: 64,
            num_layers: 1,
            dropout: 0.0,
        }
    }

    /// Устанавливает размер скрытого состояния
    pub fn with_hidden_size(mut self, hidden_size: usize) -> Self {
        self.hidden_size = hidden_size;
        self
    }

    /// Устанавливает количество слоёв
    pub fn with_layers(mut self, num_layers: usize) -> Self {
        self.num_layers = num_layers;
        self.dropout = self.effective_dropout(self.dropout);
        self
    }

    /// Устанавливает dropout между слоями
    pub fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = self.effective_dropout(dropout);
        self
    }

    /// Dropout между одним слоем и им самим не имеет смысла
    fn effective_dropout(&self, dropout: f64) -> f64 {
        if self.num_layers > 1 {
            dropout
        } else {
            0.0
        }
    }

    /// Маленькая модель: 32 скрытых нейрона, один слой
    pub fn small(input_size: usize) -> Self {
        Self::new(input_size).with_hidden_size(32)
    }

    /// Большая модель: 128 скрытых нейронов, два слоя, dropout 0.2
    pub fn large(input_size: usize) -> Self {
        Self::new(input_size)
            .with_hidden_size(128)
            .with_layers(2)
            .with_dropout(0.2)
    }
}
