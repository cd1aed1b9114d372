//! # Módulo de Estaciones de Descarga
//!
//! Una estación es un consumidor puro de la cola de entregas: retira siempre
//! el frente, acumula sus totales propios y confirma al camión su atención.
//! Los acumulados de una estación los escribe únicamente su propio hilo; no
//! hay escrituras cruzadas entre hilos.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::UNLOAD_TIME_MINS;
use crate::queue::{HandoffQueue, ServiceReceipt};

/// Estación de descarga: identidad y acumulados de toda la corrida.
#[derive(Debug)]
pub struct Station {
    /// Id estable de la estación
    pub id: u32,
    /// Helio total recibido de todos los camiones
    pub total_helium_received: u32,
    /// Total de camiones atendidos
    pub total_trucks_unloaded: u32,
}

impl Station {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            total_helium_received: 0,
            total_trucks_unloaded: 0,
        }
    }

    /// Registra la descarga de un camión en los acumulados de la estación.
    pub fn register_unload(&mut self, helium: u32) {
        self.total_trucks_unloaded += 1;
        self.total_helium_received += helium;
    }
}

/// Consumidor que drena la cola de entregas en su propio hilo y simula el
/// tiempo físico de descarga.
pub struct StationWorker {
    station: Station,
    queue: Arc<HandoffQueue>,
    minute: Duration,
    verbose: bool,
}

impl StationWorker {
    pub fn new(id: u32, queue: Arc<HandoffQueue>, minute: Duration, verbose: bool) -> Self {
        Self {
            station: Station::new(id),
            queue,
            minute,
            verbose,
        }
    }

    /// Bucle del consumidor: bloquea hasta que haya una entrega o la cola
    /// esté cerrada; por cada entrega actualiza los totales, confirma al
    /// camión y duerme la descarga SIN retener la cola, de modo que las
    /// demás estaciones avanzan en paralelo. Sale solo cuando la cola está
    /// cerrada y vacía, y devuelve la estación con sus totales finales.
    ///
    /// Atender una entrega no puede fallar: no hay reintentos ni caminos de
    /// error en este bucle.
    pub fn run(mut self) -> Station {
        if self.verbose {
            println!("[ESTACION {}] hilo iniciado", self.station.id);
        }

        while let Some(request) = self.queue.wait_dequeue() {
            let truck_id = request.truck_id;
            let helium = request.helium;

            self.station.register_unload(helium);
            request.complete(ServiceReceipt {
                station_id: self.station.id,
            });

            if self.verbose {
                println!(
                    "[ESTACION {}] descargando camión {:02}: {} de helio \
                     (recibido total {}; camiones atendidos {})",
                    self.station.id,
                    truck_id,
                    helium,
                    self.station.total_helium_received,
                    self.station.total_trucks_unloaded,
                );
            }

            thread::sleep(self.minute * UNLOAD_TIME_MINS);
        }

        if self.verbose {
            println!(
                "[ESTACION {}] finalizando: {} de helio recibido, {} camiones atendidos",
                self.station.id,
                self.station.total_helium_received,
                self.station.total_trucks_unloaded,
            );
        }
        self.station
    }
}
