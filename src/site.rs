//! # Módulo del Sitio de Minado
//!
//! Un sitio de minado es, para efectos de la simulación, únicamente una
//! fuente de duraciones aleatorias: cada vez que un camión comienza a minar,
//! el sitio sortea cuántos minutos durará ese período, uniformemente entre
//! [`MIN_MINING_MINS`] y [`MAX_MINING_MINS`].
//!
//! Cada camión posee su propio `MiningSite` con un generador independiente,
//! sembrado determinísticamente a partir de la semilla global de la corrida
//! y del id del camión. Así los sorteos de un camión no dependen del orden de
//! planificación de los hilos y una corrida con semilla fija es reproducible.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::config::{MAX_MINING_MINS, MIN_MINING_MINS};

/// Parte fraccionaria de la razón áurea en 64 bits; dispersa ids consecutivos
/// de camión sobre todo el espacio de semillas.
const SEED_MIX: u64 = 0x9e37_79b9_7f4a_7c15;

/// Fuente de duraciones de minado de un camión.
pub struct MiningSite {
    rng: SmallRng,
}

impl MiningSite {
    /// Crea el sitio de un camión, sembrado desde la semilla global de la
    /// corrida y el id del camión.
    pub fn for_truck(global_seed: u64, truck_id: u32) -> Self {
        let seed = global_seed ^ (truck_id as u64).wrapping_mul(SEED_MIX);
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Sortea la duración del próximo período de minado, en minutos
    /// simulados, uniforme en `[MIN_MINING_MINS, MAX_MINING_MINS]`.
    pub fn random_mining_duration(&mut self) -> u32 {
        self.rng.gen_range(MIN_MINING_MINS..=MAX_MINING_MINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_always_in_range() {
        let mut site = MiningSite::for_truck(99, 0);
        for _ in 0..10_000 {
            let duration = site.random_mining_duration();
            assert!(duration >= MIN_MINING_MINS);
            assert!(duration <= MAX_MINING_MINS);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = MiningSite::for_truck(1234, 7);
        let mut b = MiningSite::for_truck(1234, 7);
        for _ in 0..100 {
            assert_eq!(a.random_mining_duration(), b.random_mining_duration());
        }
    }

    #[test]
    fn test_different_trucks_different_sequences() {
        let mut a = MiningSite::for_truck(1234, 0);
        let mut b = MiningSite::for_truck(1234, 1);
        let draws_a: Vec<u32> = (0..32).map(|_| a.random_mining_duration()).collect();
        let draws_b: Vec<u32> = (0..32).map(|_| b.random_mining_duration()).collect();
        assert_ne!(draws_a, draws_b);
    }

    #[test]
    fn test_distribution_approximately_uniform() {
        // Chi-cuadrado sobre 8 clases: 7 de 30 valores y la última de 31
        // (el rango [60, 300] tiene 241 valores). Con 7 grados de libertad el
        // estadístico esperado es ~7; 30 deja una tolerancia muy holgada.
        const SAMPLES: u32 = 10_000;
        const VALUES: f64 = (MAX_MINING_MINS - MIN_MINING_MINS + 1) as f64;

        let mut observed = [0u32; 8];
        let mut site = MiningSite::for_truck(42, 3);
        for _ in 0..SAMPLES {
            let duration = site.random_mining_duration();
            let bin = ((duration - MIN_MINING_MINS) / 30).min(7) as usize;
            observed[bin] += 1;
        }

        let mut chi_square = 0.0;
        for (bin, &count) in observed.iter().enumerate() {
            let width = if bin == 7 { 31.0 } else { 30.0 };
            let expected = SAMPLES as f64 * width / VALUES;
            let delta = count as f64 - expected;
            chi_square += delta * delta / expected;
        }

        assert!(
            chi_square < 30.0,
            "distribución no uniforme: chi-cuadrado = {chi_square}"
        );
    }
}
