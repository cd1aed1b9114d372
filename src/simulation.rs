//! # Módulo de Simulación Principal
//!
//! El controlador de la simulación posee la cola de entregas y el ciclo de
//! vida completo: lanza N camiones y M estaciones como hilos independientes,
//! espera a que todos los camiones agoten su horizonte, emite la señal única
//! de cierre que drena a las estaciones, y recoge las estadísticas finales
//! de cada unidad.
//!
//! El orden es esencial: los camiones nunca esperan a las estaciones; solo
//! las estaciones esperan la señal de cierre, y esta se emite únicamente
//! cuando ya ningún camión puede producir. Como cada camión se bloquea hasta
//! que su entrega es atendida, al cerrarse la cola toda carga encolada ya
//! fue o será drenada antes de que las estaciones salgan.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;

use crate::config;
use crate::queue::HandoffQueue;
use crate::site::MiningSite;
use crate::station::{Station, StationWorker};
use crate::truck::{Truck, TruckAgent};

/// Errores de configuración, rechazados antes de construir el controlador.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("el número de camiones debe ser un entero positivo")]
    InvalidTruckCount,
    #[error("el número de estaciones debe ser un entero positivo")]
    InvalidStationCount,
}

/// Parámetros provistos por el usuario: cuántos camiones y cuántas
/// estaciones. Nada más afecta la semántica de coordinación del núcleo.
#[derive(Clone, Copy, Debug)]
pub struct SimulationParams {
    pub num_trucks: u32,
    pub num_stations: u32,
}

impl SimulationParams {
    /// Valida y construye los parámetros; ambos conteos deben ser positivos.
    ///
    /// # Arguments
    ///
    /// * `num_trucks` - Cantidad de camiones mineros a simular
    /// * `num_stations` - Cantidad de estaciones de descarga
    ///
    /// # Returns
    ///
    /// Los parámetros validados, o el [`ConfigError`] correspondiente al
    /// primer conteo inválido.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mining_truck_simulator::SimulationParams;
    ///
    /// assert!(SimulationParams::new(30, 3).is_ok());
    /// assert!(SimulationParams::new(0, 3).is_err());
    /// ```
    pub fn new(num_trucks: u32, num_stations: u32) -> Result<Self, ConfigError> {
        if num_trucks == 0 {
            return Err(ConfigError::InvalidTruckCount);
        }
        if num_stations == 0 {
            return Err(ConfigError::InvalidStationCount);
        }
        Ok(Self {
            num_trucks,
            num_stations,
        })
    }
}

/// Opciones de ejecución. Cambian el ritmo real, la reproducibilidad y el
/// detalle de la bitácora, pero no la semántica simulada.
#[derive(Clone, Debug)]
pub struct SimulationOptions {
    /// Horizonte de la corrida en minutos simulados
    pub horizon_mins: u32,
    /// Duración real de un minuto simulado
    pub minute: Duration,
    /// Semilla global; `None` siembra desde el sistema operativo
    pub seed: Option<u64>,
    /// Imprimir la bitácora de eventos por consola
    pub verbose: bool,
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            horizon_mins: config::HORIZON_MINS,
            minute: config::default_minute(),
            seed: None,
            verbose: true,
        }
    }
}

/// Fases del ciclo de vida del controlador.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Created,
    Running,
    DrainingStations,
    Complete,
}

/// Estadísticas finales de la corrida: cada camión y cada estación tal como
/// quedaron al terminar sus hilos.
#[derive(Debug)]
pub struct SimulationResults {
    pub trucks: Vec<Truck>,
    pub stations: Vec<Station>,
    pub horizon_mins: u32,
}

/// Orquestador de la simulación minera.
pub struct Simulation {
    params: SimulationParams,
    options: SimulationOptions,
    phase: Phase,
}

impl Simulation {
    /// Crea una simulación con las opciones por defecto (horizonte de 72
    /// horas, 1 minuto simulado = 1 ms, semilla del sistema, bitácora
    /// activa).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mining_truck_simulator::{Simulation, SimulationParams};
    ///
    /// let params = SimulationParams::new(5, 2).unwrap();
    /// let simulation = Simulation::new(params);
    /// ```
    pub fn new(params: SimulationParams) -> Self {
        Self::with_options(params, SimulationOptions::default())
    }

    /// Crea una simulación con opciones personalizadas (los tests usan un
    /// ritmo más rápido, semilla fija y bitácora apagada).
    pub fn with_options(params: SimulationParams, options: SimulationOptions) -> Self {
        Self {
            params,
            options,
            phase: Phase::Created,
        }
    }

    /// Fase actual del ciclo de vida.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Ejecuta la corrida completa y devuelve las estadísticas finales.
    ///
    /// 1. `Created → Running`: lanza un hilo por camión y uno por estación;
    ///    cada hilo es dueño de su propio `Truck`/`Station`.
    /// 2. `Running → DrainingStations`: espera a que terminen todos los
    ///    camiones y recién entonces cierra la cola (señal única, nunca se
    ///    revierte) despertando a todas las estaciones.
    /// 3. `DrainingStations → Complete`: espera a que las estaciones drenen
    ///    y salgan, y arma los resultados con los valores devueltos por cada
    ///    hilo.
    pub fn run(&mut self) -> SimulationResults {
        let seed = self.options.seed.unwrap_or_else(rand::random);
        let horizon_mins = self.options.horizon_mins;
        let minute = self.options.minute;
        let verbose = self.options.verbose;
        let queue = Arc::new(HandoffQueue::new());

        if verbose {
            println!(
                "[SIM] iniciando: {} camiones, {} estaciones, horizonte {} min, semilla {}",
                self.params.num_trucks, self.params.num_stations, horizon_mins, seed,
            );
        }
        self.phase = Phase::Running;

        let truck_handles: Vec<thread::JoinHandle<Truck>> = (0..self.params.num_trucks)
            .map(|id| {
                let agent = TruckAgent::new(
                    id,
                    MiningSite::for_truck(seed, id),
                    Arc::clone(&queue),
                    horizon_mins,
                    minute,
                    verbose,
                );
                thread::spawn(move || agent.run())
            })
            .collect();

        let station_handles: Vec<thread::JoinHandle<Station>> = (0..self.params.num_stations)
            .map(|id| {
                let worker = StationWorker::new(id, Arc::clone(&queue), minute, verbose);
                thread::spawn(move || worker.run())
            })
            .collect();

        let trucks: Vec<Truck> = truck_handles
            .into_iter()
            .map(|handle| handle.join().expect("un hilo de camión falló"))
            .collect();

        // todos los productores terminaron: señal de cierre y drenado
        self.phase = Phase::DrainingStations;
        queue.close();
        if verbose {
            println!(
                "[SIM] camiones terminados; drenando {} entregas pendientes",
                queue.len(),
            );
        }

        let stations: Vec<Station> = station_handles
            .into_iter()
            .map(|handle| handle.join().expect("un hilo de estación falló"))
            .collect();

        self.phase = Phase::Complete;
        if verbose {
            println!("[SIM] simulación completa");
        }

        SimulationResults {
            trucks,
            stations,
            horizon_mins,
        }
    }
}
