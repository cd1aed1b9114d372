//! # Módulo de Camiones
//!
//! Un camión recorre cíclicamente cuatro estados: minar, viajar a la
//! estación, descargar y volver al sitio de minado. La lógica de transición
//! está separada en una función pura de planificación ([`Truck::plan`]) que
//! no conoce hilos ni relojes reales, y un agente ([`TruckAgent`]) que
//! ejecuta el plan en su propio hilo: duerme las duraciones simuladas,
//! gestiona la entrega en la cola compartida y confirma la transición de
//! estado solo cuando la actividad terminó dentro del horizonte.
//!
//! Todos los campos del camión tienen un único hilo escritor durante toda la
//! corrida: el agente acumula sus métricas localmente y la estación solo le
//! responde por la señal de atención de cada entrega.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::{HELIUM_RATE_PER_MIN, POLL_QUANTUM_MINS, TRAVEL_TIME_MINS, UNLOAD_TIME_MINS};
use crate::queue::{HandoffQueue, HandoffRequest};
use crate::site::MiningSite;

/// Estados del ciclo de un camión. No hay estado terminal: el ciclo se corta
/// donde lo encuentre el horizonte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TruckState {
    /// Extrayendo helio en el sitio de minado
    Mining,
    /// Viajando del sitio de minado a la estación
    TravelToUnload,
    /// Descargando en la estación (incluye la espera en cola previa)
    Unloading,
    /// Viajando de la estación al sitio de minado
    TravelToMine,
}

/// Paso planificado para el estado actual: cuánto dormir, si corresponde
/// entregar la carga antes de dormir, y a qué estado pasar al terminar.
#[derive(Clone, Copy, Debug)]
pub struct Step {
    pub sleep_mins: u32,
    pub handoff: bool,
    pub next_state: TruckState,
}

/// Camión minero: identidad, estado actual, campos del viaje en curso y
/// acumulados de toda la corrida.
#[derive(Debug)]
pub struct Truck {
    /// Id estable del camión, asignado al crearlo
    pub id: u32,
    /// Estado activo (exactamente uno a la vez)
    pub state: TruckState,
    /// Duración sorteada del minado del viaje actual
    pub current_mining_time: u32,
    /// Helio extraído en el viaje actual
    pub current_mined_helium: u32,
    /// Espera en cola acumulada en el viaje actual
    pub current_trip_queue_wait: u32,
    /// Tiempo total de minado (monótono no decreciente)
    pub total_mining_time: u32,
    /// Helio total extraído (monótono no decreciente)
    pub total_mined_helium: u32,
    /// Descargas exitosas totales (monótono no decreciente)
    pub total_unloads: u32,
    /// Espera en cola total (monótona no decreciente)
    pub total_queue_wait: u32,
    /// Toda duración de minado sorteada, para verificación cruzada
    pub mining_durations: Vec<u32>,
}

impl Truck {
    /// Crea un camión listo para empezar a minar.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            state: TruckState::Mining,
            current_mining_time: 0,
            current_mined_helium: 0,
            current_trip_queue_wait: 0,
            total_mining_time: 0,
            total_mined_helium: 0,
            total_unloads: 0,
            total_queue_wait: 0,
            mining_durations: Vec::new(),
        }
    }

    /// Planifica el paso del estado actual: aplica los efectos de entrada al
    /// estado (acumulación de minado o de helio) y devuelve la duración a
    /// dormir, si hay entrega, y el estado siguiente. NO confirma la
    /// transición: eso lo hace el agente al terminar de dormir, para que un
    /// camión cortado por el horizonte quede registrado en el estado que
    /// estaba ejecutando.
    ///
    /// `mining_duration` solo se consume desde el estado `Mining`.
    pub fn plan(&mut self, mining_duration: u32) -> Step {
        match self.state {
            TruckState::Mining => {
                self.current_mining_time = mining_duration;
                self.current_mined_helium = mining_duration * HELIUM_RATE_PER_MIN;
                self.total_mining_time += mining_duration;
                self.mining_durations.push(mining_duration);
                Step {
                    sleep_mins: mining_duration,
                    handoff: false,
                    next_state: TruckState::TravelToUnload,
                }
            }
            TruckState::TravelToUnload => Step {
                sleep_mins: TRAVEL_TIME_MINS,
                handoff: false,
                next_state: TruckState::Unloading,
            },
            TruckState::Unloading => {
                self.total_mined_helium += self.current_mined_helium;
                Step {
                    sleep_mins: UNLOAD_TIME_MINS,
                    handoff: true,
                    next_state: TruckState::TravelToMine,
                }
            }
            TruckState::TravelToMine => Step {
                sleep_mins: TRAVEL_TIME_MINS,
                handoff: false,
                next_state: TruckState::Mining,
            },
        }
    }

    /// Registra que la estación atendió la entrega en curso: pliega la
    /// espera del viaje en el acumulado y reinicia el contador del viaje.
    pub fn register_service(&mut self) {
        self.total_unloads += 1;
        self.total_queue_wait += self.current_trip_queue_wait;
        self.current_trip_queue_wait = 0;
    }

    /// Recalcula el tiempo total de minado desde las duraciones registradas;
    /// debe coincidir con `total_mining_time`.
    pub fn recorded_mining_time(&self) -> u32 {
        self.mining_durations.iter().sum()
    }
}

/// Agente que ejecuta la máquina de estados de un camión en su propio hilo,
/// con su reloj simulado local.
pub struct TruckAgent {
    truck: Truck,
    site: MiningSite,
    queue: Arc<HandoffQueue>,
    horizon_mins: u32,
    minute: Duration,
    verbose: bool,
}

impl TruckAgent {
    pub fn new(
        id: u32,
        site: MiningSite,
        queue: Arc<HandoffQueue>,
        horizon_mins: u32,
        minute: Duration,
        verbose: bool,
    ) -> Self {
        Self {
            truck: Truck::new(id),
            site,
            queue,
            horizon_mins,
            minute,
            verbose,
        }
    }

    /// Bucle principal del camión: corre hasta que su reloj local alcance el
    /// horizonte y devuelve el camión con sus estadísticas finales.
    ///
    /// En cada vuelta: planifica el estado actual, realiza la entrega si
    /// corresponde (encolar y bloquear hasta ser atendido, ANTES de dormir
    /// la descarga), recorta el sueño para no pasarse del horizonte, duerme,
    /// y confirma la transición solo si el sueño no fue recortado.
    pub fn run(mut self) -> Truck {
        let mut elapsed: u32 = 0;

        if self.verbose {
            println!("[CAMION {:02}] hilo iniciado", self.truck.id);
        }

        while elapsed < self.horizon_mins {
            let mining_duration = match self.truck.state {
                TruckState::Mining => self.site.random_mining_duration(),
                _ => 0,
            };
            let step = self.truck.plan(mining_duration);

            if self.verbose {
                self.log_state(elapsed);
            }

            if step.handoff {
                elapsed = self.deliver_load(elapsed);
            }

            let remaining = self.horizon_mins.saturating_sub(elapsed);
            let clamped = step.sleep_mins > remaining;
            let sleep_mins = step.sleep_mins.min(remaining);
            if sleep_mins > 0 {
                thread::sleep(self.minute * sleep_mins);
            }
            elapsed += sleep_mins;

            if !clamped {
                self.truck.state = step.next_state;
            }
        }

        if self.verbose {
            println!(
                "[CAMION {:02}] t={}min: horizonte alcanzado en estado {:?} \
                 (helio total {}; descargas {})",
                self.truck.id,
                elapsed,
                self.truck.state,
                self.truck.total_mined_helium,
                self.truck.total_unloads,
            );
        }
        self.truck
    }

    /// Encola la carga del viaje actual y bloquea hasta que una estación la
    /// atienda. La espera se contabiliza en quantums enteros: un chequeo
    /// inicial sin bloqueo cubre el caso de atención inmediata, y cada
    /// espera cronometrada suma un quantum completo aunque la atención
    /// llegue a mitad de quantum: la espera medida se redondea hacia
    /// arriba, nunca se subcuenta. Devuelve el reloj local actualizado.
    fn deliver_load(&mut self, mut elapsed: u32) -> u32 {
        let (request, ticket) = HandoffRequest::new(self.truck.id, self.truck.current_mined_helium);
        let position = self.queue.enqueue(request);

        if self.verbose {
            println!(
                "[CAMION {:02}] t={}min: carga de {} encolada en posición {}",
                self.truck.id, elapsed, self.truck.current_mined_helium, position,
            );
        }

        if let Some(receipt) = ticket.try_claim() {
            self.truck.register_service();
            if self.verbose {
                println!(
                    "[CAMION {:02}] t={}min: atendido de inmediato por la estación {}",
                    self.truck.id, elapsed, receipt.station_id,
                );
            }
            return elapsed;
        }

        let quantum = self.minute * POLL_QUANTUM_MINS;
        loop {
            let outcome = ticket.wait_quantum(quantum);
            self.truck.current_trip_queue_wait += POLL_QUANTUM_MINS;
            elapsed += POLL_QUANTUM_MINS;

            match outcome {
                Some(receipt) => {
                    let waited = self.truck.current_trip_queue_wait;
                    self.truck.register_service();
                    if self.verbose {
                        println!(
                            "[CAMION {:02}] t={}min: atendido por la estación {} \
                             tras {} min de espera",
                            self.truck.id, elapsed, receipt.station_id, waited,
                        );
                    }
                    return elapsed;
                }
                None => {
                    if self.verbose {
                        let still_in_place = self.queue.is_pending(self.truck.id, position);
                        println!(
                            "[CAMION {:02}] t={}min: esperando atención \
                             (posición original {}: {}; espera acumulada {} min)",
                            self.truck.id,
                            elapsed,
                            position,
                            if still_in_place { "sin movimiento" } else { "ya rotada" },
                            self.truck.current_trip_queue_wait,
                        );
                    }
                }
            }
        }
    }

    fn log_state(&self, elapsed: u32) {
        let truck = &self.truck;
        match truck.state {
            TruckState::Mining => println!(
                "[CAMION {:02}] t={}min: minando {} min (helio del viaje {}; \
                 tiempo de minado total {})",
                truck.id,
                elapsed,
                truck.current_mining_time,
                truck.current_mined_helium,
                truck.total_mining_time,
            ),
            TruckState::TravelToUnload => println!(
                "[CAMION {:02}] t={}min: viajando a la estación ({} min)",
                truck.id, elapsed, TRAVEL_TIME_MINS,
            ),
            TruckState::Unloading => println!(
                "[CAMION {:02}] t={}min: descargando {} de helio (total {})",
                truck.id, elapsed, truck.current_mined_helium, truck.total_mined_helium,
            ),
            TruckState::TravelToMine => println!(
                "[CAMION {:02}] t={}min: volviendo al sitio de minado ({} min)",
                truck.id, elapsed, TRAVEL_TIME_MINS,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MAX_MINING_MINS, MIN_MINING_MINS};

    #[test]
    fn test_plan_full_cycle() {
        let mut truck = Truck::new(0);

        let step = truck.plan(100);
        assert_eq!(step.sleep_mins, 100);
        assert!(!step.handoff);
        assert_eq!(step.next_state, TruckState::TravelToUnload);
        assert_eq!(truck.current_mined_helium, 100);
        assert_eq!(truck.total_mining_time, 100);
        assert_eq!(truck.total_mined_helium, 0);
        truck.state = step.next_state;

        let step = truck.plan(0);
        assert_eq!(step.sleep_mins, TRAVEL_TIME_MINS);
        assert!(!step.handoff);
        truck.state = step.next_state;

        // al entrar a la descarga el helio del viaje pasa al acumulado y la
        // entrega debe ocurrir antes de dormir la descarga
        let step = truck.plan(0);
        assert_eq!(step.sleep_mins, UNLOAD_TIME_MINS);
        assert!(step.handoff);
        assert_eq!(step.next_state, TruckState::TravelToMine);
        assert_eq!(truck.total_mined_helium, 100);
        truck.state = step.next_state;

        let step = truck.plan(0);
        assert_eq!(step.sleep_mins, TRAVEL_TIME_MINS);
        assert_eq!(step.next_state, TruckState::Mining);
    }

    #[test]
    fn test_plan_accumulates_over_trips() {
        let mut truck = Truck::new(1);
        for duration in [60, 300, 125] {
            truck.state = TruckState::Mining;
            truck.plan(duration);
            truck.state = TruckState::Unloading;
            truck.plan(0);
        }
        assert_eq!(truck.total_mining_time, 485);
        assert_eq!(truck.total_mined_helium, 485);
        assert_eq!(truck.mining_durations, vec![60, 300, 125]);
        assert_eq!(truck.recorded_mining_time(), truck.total_mining_time);
    }

    #[test]
    fn test_register_service_folds_trip_wait() {
        let mut truck = Truck::new(2);
        truck.current_trip_queue_wait = 7;
        truck.register_service();
        assert_eq!(truck.total_unloads, 1);
        assert_eq!(truck.total_queue_wait, 7);
        assert_eq!(truck.current_trip_queue_wait, 0);

        truck.current_trip_queue_wait = 3;
        truck.register_service();
        assert_eq!(truck.total_unloads, 2);
        assert_eq!(truck.total_queue_wait, 10);
    }

    #[test]
    fn test_horizon_shorter_than_first_mining_leaves_truck_mining() {
        // horizonte de 10 minutos: ningún sorteo (>= 60) cabe, el sueño se
        // recorta y la transición nunca se confirma
        let agent = TruckAgent::new(
            0,
            MiningSite::for_truck(11, 0),
            Arc::new(HandoffQueue::new()),
            10,
            Duration::ZERO,
            false,
        );
        let truck = agent.run();

        assert_eq!(truck.state, TruckState::Mining);
        assert_eq!(truck.total_unloads, 0);
        assert_eq!(truck.total_queue_wait, 0);
        assert_eq!(truck.total_mined_helium, 0);
        // el efecto de entrada al minado sí ocurrió
        assert_eq!(truck.mining_durations.len(), 1);
        assert!(truck.total_mining_time >= MIN_MINING_MINS);
        assert!(truck.total_mining_time <= MAX_MINING_MINS);
    }
}
