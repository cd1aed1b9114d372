//! # Simulador de Camiones Mineros
//!
//! Esta biblioteca implementa un simulador concurrente de una operación de
//! extracción de helio: una flota de camiones mineros independientes extrae
//! helio en sitios remotos y lo entrega en un conjunto compartido de
//! estaciones de descarga, durante un horizonte simulado fijo de 72 horas.
//!
//! ## Características principales
//!
//! - **Un hilo por unidad**: cada camión y cada estación corre en su propio
//!   hilo (`std::thread`); la única coordinación entre ellos es la cola de
//!   entregas compartida.
//! - **Sincronización**: la cola de entregas usa `Mutex` + `Condvar` para el
//!   bloqueo de consumidores, y canales de un solo uso (`std::sync::mpsc`)
//!   para confirmar a cada camión que su carga fue atendida.
//! - **Aleatoriedad reproducible**: cada camión posee su propio `SmallRng`
//!   derivado determinísticamente de una semilla global, de modo que una
//!   corrida con semilla fija produce los mismos sorteos de duración.
//! - **Métricas detalladas**: acumulados por camión (helio, tiempo de minado,
//!   descargas, espera en cola) y por estación (helio recibido, camiones
//!   atendidos), más cotas teóricas para verificación.
//!
//! ## Estructura del proyecto
//!
//! - `site`: fuente de duraciones aleatorias de minado
//! - `truck`: modelo del camión, su máquina de estados y su hilo agente
//! - `queue`: cola FIFO sincronizada de entregas camión → estación
//! - `station`: estación de descarga y su bucle consumidor
//! - `simulation`: controlador del ciclo de vida de la simulación
//! - `metrics`: cotas teóricas, reporte final y salida CSV

pub mod metrics;
pub mod queue;
pub mod simulation;
pub mod site;
pub mod station;
pub mod truck;

// Re-exportar las estructuras principales para facilitar su uso
pub use metrics::MetricsCalculator;
pub use queue::{HandoffQueue, HandoffRequest, ServiceReceipt, ServiceTicket};
pub use simulation::{
    ConfigError, Phase, Simulation, SimulationOptions, SimulationParams, SimulationResults,
};
pub use site::MiningSite;
pub use station::{Station, StationWorker};
pub use truck::{Truck, TruckAgent, TruckState};

/// Constantes de la simulación
pub mod config {
    use std::time::Duration;

    /// Tiempo de viaje de cada trayecto sitio ↔ estación, en minutos simulados
    pub const TRAVEL_TIME_MINS: u32 = 30;

    /// Tiempo de descarga en una estación, en minutos simulados
    pub const UNLOAD_TIME_MINS: u32 = 5;

    /// Tasa de minado: unidades de helio por minuto de minado
    pub const HELIUM_RATE_PER_MIN: u32 = 1;

    /// Duración mínima de un período de minado (1 hora)
    pub const MIN_MINING_MINS: u32 = 60;

    /// Duración máxima de un período de minado (5 horas)
    pub const MAX_MINING_MINS: u32 = 300;

    /// Horizonte total de la simulación: 72 horas en minutos simulados
    pub const HORIZON_MINS: u32 = 72 * 60;

    /// Quantum de sondeo de un camión mientras espera ser atendido
    pub const POLL_QUANTUM_MINS: u32 = 1;

    /// Ciclo completo más corto posible (minado mínimo, sin esperas en cola)
    pub const MIN_CYCLE_MINS: u32 = MIN_MINING_MINS + 2 * TRAVEL_TIME_MINS + UNLOAD_TIME_MINS;

    /// Ciclo completo más largo posible (minado máximo, sin esperas en cola)
    pub const MAX_CYCLE_MINS: u32 = MAX_MINING_MINS + 2 * TRAVEL_TIME_MINS + UNLOAD_TIME_MINS;

    /// Equivalencia por defecto entre tiempo simulado y tiempo real:
    /// 1 minuto simulado = 1 milisegundo de CPU
    pub fn default_minute() -> Duration {
        Duration::from_millis(1)
    }
}
