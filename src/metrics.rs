//! # Módulo de Métricas y Reportes
//!
//! Cotas teóricas del problema (puras, usables desde los tests o desde
//! cualquier consumidor de resultados) y generación del reporte final y de
//! los archivos CSV a partir de [`SimulationResults`].

use crate::config::{
    HELIUM_RATE_PER_MIN, MAX_CYCLE_MINS, MAX_MINING_MINS, MIN_CYCLE_MINS, MIN_MINING_MINS,
    TRAVEL_TIME_MINS, UNLOAD_TIME_MINS,
};
use crate::simulation::SimulationResults;

/// Máximo de viajes completos que un camión puede lograr en el horizonte:
/// todos los ciclos con el minado mínimo y sin esperas en cola.
pub fn max_trips_possible(horizon_mins: u32) -> u32 {
    horizon_mins / MIN_CYCLE_MINS
}

/// Viajes completos garantizables sin contención: todos los ciclos con el
/// minado máximo y sin esperas en cola. Bajo contención de cola la cota
/// inferior no aplica (la espera alarga los ciclos).
pub fn min_trips_possible(horizon_mins: u32) -> u32 {
    horizon_mins / MAX_CYCLE_MINS
}

/// Máximo helio teórico de un camión en el horizonte: ciclos completos de
/// minado máximo, más lo que se pueda minar del tiempo sobrante dejando
/// margen para llegar a descargar (un viaje más la descarga). Si el
/// sobrante no alcanza ni para eso, su aporte se recorta a cero; nunca
/// resta.
pub fn max_helium_possible(horizon_mins: u32) -> u32 {
    let full_cycles = horizon_mins / MAX_CYCLE_MINS;
    let mut helium = full_cycles * MAX_MINING_MINS * HELIUM_RATE_PER_MIN;

    let leftover = horizon_mins - full_cycles * MAX_CYCLE_MINS;
    let last_mining = leftover.saturating_sub(TRAVEL_TIME_MINS + UNLOAD_TIME_MINS);
    helium += last_mining * HELIUM_RATE_PER_MIN;
    helium
}

/// Helio garantizable sin contención: los viajes de `min_trips_possible`,
/// todos con el minado mínimo.
pub fn min_helium_possible(horizon_mins: u32) -> u32 {
    min_trips_possible(horizon_mins) * MIN_MINING_MINS * HELIUM_RATE_PER_MIN
}

/// Fracción del horizonte que un camión pasó esperando en cola.
pub fn average_queue_fraction(total_queue_wait: u32, horizon_mins: u32) -> f64 {
    if horizon_mins == 0 {
        return 0.0;
    }
    total_queue_wait as f64 / horizon_mins as f64
}

/// Eficiencia de un camión: helio extraído sobre el máximo teórico.
pub fn truck_efficiency(total_mined_helium: u32, horizon_mins: u32) -> f64 {
    let max_possible = max_helium_possible(horizon_mins);
    if max_possible == 0 {
        return 0.0;
    }
    total_mined_helium as f64 / max_possible as f64
}

/// Generador del reporte final y de las salidas CSV.
pub struct MetricsCalculator;

impl MetricsCalculator {
    pub fn new() -> Self {
        Self
    }

    /// Genera el reporte de texto con los resultados finales de cada camión,
    /// de cada estación y los totales de verificación.
    ///
    /// # Arguments
    ///
    /// * `results` - Estadísticas finales devueltas por la simulación
    ///
    /// # Returns
    ///
    /// String con el reporte formateado
    pub fn generate_report(&self, results: &SimulationResults) -> String {
        let horizon = results.horizon_mins;
        let max_helium = max_helium_possible(horizon);
        let max_trips = max_trips_possible(horizon);

        let mut report = String::new();
        report.push_str("\n=== RESULTADOS FINALES DE LA SIMULACION ===\n");
        report.push_str(&format!(
            "Horizonte: {} min | Máximo helio posible por camión: {} | Máximo de viajes posible: {}\n\n",
            horizon, max_helium, max_trips,
        ));

        for truck in &results.trucks {
            let queue_fraction = average_queue_fraction(truck.total_queue_wait, horizon);
            let efficiency = truck_efficiency(truck.total_mined_helium, horizon);
            report.push_str(&format!("CAMION {:02}:\n", truck.id));
            report.push_str(&format!(
                "  Helio total extraído               = {}\n",
                truck.total_mined_helium
            ));
            report.push_str(&format!(
                "  Tiempo total de minado             = {} minutos\n",
                truck.total_mining_time
            ));
            report.push_str(&format!(
                "  Duración de minado verificada      = {} minutos\n",
                truck.recorded_mining_time()
            ));
            report.push_str(&format!(
                "  Descargas exitosas                 = {}\n",
                truck.total_unloads
            ));
            report.push_str(&format!(
                "  Tiempo total de espera en cola     = {} minutos\n",
                truck.total_queue_wait
            ));
            report.push_str(&format!(
                "  Espera promedio sobre el horizonte = {:.2}%\n",
                queue_fraction * 100.0
            ));
            report.push_str(&format!(
                "  Eficiencia del camión              = {:.2}%\n\n",
                efficiency * 100.0
            ));
        }

        for station in &results.stations {
            report.push_str(&format!("ESTACION {}:\n", station.id));
            report.push_str(&format!(
                "  Helio total recibido               = {}\n",
                station.total_helium_received
            ));
            report.push_str(&format!(
                "  Camiones atendidos                 = {}\n\n",
                station.total_trucks_unloaded
            ));
        }

        let truck_helium: u64 = results
            .trucks
            .iter()
            .map(|t| t.total_mined_helium as u64)
            .sum();
        let station_helium: u64 = results
            .stations
            .iter()
            .map(|s| s.total_helium_received as u64)
            .sum();
        let truck_unloads: u64 = results.trucks.iter().map(|t| t.total_unloads as u64).sum();
        let station_unloads: u64 = results
            .stations
            .iter()
            .map(|s| s.total_trucks_unloaded as u64)
            .sum();

        report.push_str("=== TOTALES DE VERIFICACION ===\n");
        report.push_str(&format!(
            "Helio extraído (camiones) = {} | Helio recibido (estaciones) = {}\n",
            truck_helium, station_helium,
        ));
        report.push_str(&format!(
            "Descargas (camiones) = {} | Camiones atendidos (estaciones) = {}\n",
            truck_unloads, station_unloads,
        ));
        report
    }

    /// Genera los resultados por camión en formato CSV.
    pub fn generate_truck_csv(&self, results: &SimulationResults) -> String {
        let horizon = results.horizon_mins;
        let mut csv = String::new();
        csv.push_str("CamionID,HelioTotal,TiempoMinado,Descargas,EsperaEnCola,Eficiencia\n");
        for truck in &results.trucks {
            csv.push_str(&format!(
                "{},{},{},{},{},{:.4}\n",
                truck.id,
                truck.total_mined_helium,
                truck.total_mining_time,
                truck.total_unloads,
                truck.total_queue_wait,
                truck_efficiency(truck.total_mined_helium, horizon),
            ));
        }
        csv
    }

    /// Genera los resultados por estación en formato CSV.
    pub fn generate_station_csv(&self, results: &SimulationResults) -> String {
        let mut csv = String::new();
        csv.push_str("EstacionID,HelioRecibido,CamionesAtendidos\n");
        for station in &results.stations {
            csv.push_str(&format!(
                "{},{},{}\n",
                station.id, station.total_helium_received, station.total_trucks_unloaded,
            ));
        }
        csv
    }
}

impl Default for MetricsCalculator {
    fn default() -> Self {
        Self::new()
    }
}
