use rand::Rng;
use serde::{Deserialize, Serialize};

/// Body accepted by `POST /api/dados`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadingPayload {
    pub temperatura: f64,
    pub umidade: f64,
    pub dispositivo: String,
}

impl ReadingPayload {
    pub fn random(rng: &mut impl Rng, dispositivo: String) -> Self {
        let temperatura = if rng.gen_bool(0.05) {
            rng.gen_range(-20.0..50.0) // 5% outliers
        } else {
            rng.gen_range(15.0..35.0)
        };

        let umidade = if rng.gen_bool(0.05) {
            rng.gen_range(0.0..100.0) // 5% outliers
        } else {
            rng.gen_range(30.0..80.0)
        };

        Self {
            temperatura: (temperatura * 10.0_f64).round() / 10.0,
            umidade: (umidade * 10.0_f64).round() / 10.0,
            dispositivo,
        }
    }
}
