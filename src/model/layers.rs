//! Выходной слой и инициализация весов

use ndarray::{Array1, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use serde::{Deserialize, Serialize};

/// Инициализация Xavier/Glorot: равномерное распределение на [-a, a],
/// где a = sqrt(6 / (fan_in + fan_out))
///
/// Матрица имеет форму [fan_out, fan_in] и применяется как `w.dot(x)`.
pub fn xavier_uniform(fan_out: usize, fan_in: usize) -> Array2<f64> {
    let a = (6.0 / (fan_in + fan_out) as f64).sqrt();
    Array2::random((fan_out, fan_in), Uniform::new(-a, a))
}

/// Функция активации слоя
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Activation {
    /// Без активации (регрессионный выход)
    Linear,
    Sigmoid,
    Tanh,
}

impl Activation {
    fn apply(&self, x: Array1<f64>) -> Array1<f64> {
        match self {
            Activation::Linear => x,
            Activation::Sigmoid => x.mapv(|v| 1.0 / (1.0 + (-v).exp())),
            Activation::Tanh => x.mapv(|v| v.tanh()),
        }
    }
}

/// Полносвязный слой
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dense {
    /// Матрица весов [output_size, input_size]
    pub weights: Array2<f64>,
    /// Вектор смещений [output_size]
    pub biases: Array1<f64>,
    /// Функция активации
    pub activation: Activation,
}

impl Dense {
    /// Создаёт слой с Xavier инициализацией весов и нулевыми смещениями
    pub fn new(input_size: usize, output_size: usize, activation: Activation) -> Self {
        Self {
            weights: xavier_uniform(output_size, input_size),
            biases: Array1::zeros(output_size),
            activation,
        }
    }

    /// Размер входа слоя
    pub fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    /// Размер выхода слоя
    pub fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    /// Прямой проход: activation(W * x + b)
    pub fn forward(&self, x: &Array1<f64>) -> Array1<f64> {
        self.activation.apply(self.weights.dot(x) + &self.biases)
    }
}
