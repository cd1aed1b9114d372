//! # Módulo de la Cola de Entregas
//!
//! La cola de entregas es el único punto de coordinación entre camiones y
//! estaciones: los camiones depositan solicitudes de descarga al final y las
//! estaciones siempre retiran del frente (orden FIFO estricto, sin
//! prioridades). La cola pertenece al controlador de la simulación y se
//! comparte por `Arc` con cada hilo; no hay estado global.
//!
//! Cada solicitud viaja acompañada del extremo emisor de un canal de un solo
//! uso: la estación lo completa al atender la solicitud y el camión, que
//! espera en el otro extremo, contabiliza su espera en quantums enteros de
//! sondeo. La bandera `closed` (productores terminados) vive bajo el mismo
//! mutex que el buffer, de modo que una sola condvar guarda ambas
//! condiciones de espera de las estaciones.

use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Confirmación que una estación envía al camión que acaba de atender.
#[derive(Clone, Copy, Debug)]
pub struct ServiceReceipt {
    /// Id de la estación que realizó la descarga
    pub station_id: u32,
}

/// Solicitud de descarga de un camión: la carga del viaje actual más el
/// extremo emisor de su señal de atención.
#[derive(Debug)]
pub struct HandoffRequest {
    /// Id del camión que deposita la carga
    pub truck_id: u32,
    /// Helio extraído en el viaje actual
    pub helium: u32,
    done_tx: Sender<ServiceReceipt>,
}

impl HandoffRequest {
    /// Crea una solicitud junto con el boleto que el camión conserva para
    /// esperar su atención.
    pub fn new(truck_id: u32, helium: u32) -> (Self, ServiceTicket) {
        let (done_tx, done_rx) = mpsc::channel();
        (
            Self {
                truck_id,
                helium,
                done_tx,
            },
            ServiceTicket { done_rx },
        )
    }

    /// Completa la señal de atención. El camión productor permanece
    /// bloqueado en su boleto hasta recibirla, así que el envío no puede
    /// fallar; si falla es un defecto de lógica, no una condición esperada.
    pub fn complete(self, receipt: ServiceReceipt) {
        self.done_tx
            .send(receipt)
            .expect("el camión abandonó la espera antes de ser atendido");
    }
}

/// Extremo receptor, de un solo uso, de la señal de atención de una
/// solicitud encolada.
#[derive(Debug)]
pub struct ServiceTicket {
    done_rx: Receiver<ServiceReceipt>,
}

impl ServiceTicket {
    /// Chequeo sin bloqueo: `Some` si la estación ya atendió la solicitud.
    pub fn try_claim(&self) -> Option<ServiceReceipt> {
        match self.done_rx.try_recv() {
            Ok(receipt) => Some(receipt),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                panic!("la solicitud fue descartada sin confirmación de atención")
            }
        }
    }

    /// Espera acotada a un quantum de sondeo; `None` si venció el plazo sin
    /// atención.
    pub fn wait_quantum(&self, quantum: Duration) -> Option<ServiceReceipt> {
        match self.done_rx.recv_timeout(quantum) {
            Ok(receipt) => Some(receipt),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                panic!("la solicitud fue descartada sin confirmación de atención")
            }
        }
    }
}

struct Inner {
    buf: VecDeque<HandoffRequest>,
    closed: bool,
}

/// Cola FIFO sincronizada de solicitudes de descarga (bloqueante del lado
/// consumidor, con señal de cierre).
pub struct HandoffQueue {
    inner: Mutex<Inner>,
    not_empty: Condvar,
}

impl HandoffQueue {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                buf: VecDeque::new(),
                closed: false,
            }),
            not_empty: Condvar::new(),
        }
    }

    /// Agrega una solicitud al final y despierta al menos una estación.
    /// Devuelve la posición (base 0) que la solicitud ocupó al insertarse.
    pub fn enqueue(&self, request: HandoffRequest) -> usize {
        let mut g = self.inner.lock().unwrap();
        g.buf.push_back(request);
        let position = g.buf.len() - 1;
        self.not_empty.notify_one();
        position
    }

    /// Bloquea hasta que haya una solicitud o la cola esté cerrada, y retira
    /// el frente. Devuelve `None` únicamente cuando la cola está cerrada y
    /// vacía: la condición de salida de las estaciones.
    pub fn wait_dequeue(&self) -> Option<HandoffRequest> {
        let mut g = self.inner.lock().unwrap();
        while g.buf.is_empty() && !g.closed {
            g = self.not_empty.wait(g).unwrap();
        }
        g.buf.pop_front()
    }

    /// Chequeo del lado del camión, sin bloqueo ni mutación: ¿sigue su
    /// solicitud ocupando la posición en que fue insertada? Si la cola tiene
    /// menos de `position + 1` entradas, o la entrada en `position` es de
    /// otro camión, la solicitud se considera ya atendida; nunca es un
    /// error.
    pub fn is_pending(&self, truck_id: u32, position: usize) -> bool {
        let g = self.inner.lock().unwrap();
        match g.buf.get(position) {
            Some(request) => request.truck_id == truck_id,
            None => false,
        }
    }

    /// Marca que los productores terminaron y despierta a todas las
    /// estaciones para que drenen y salgan. La bandera nunca se revierte;
    /// llamadas repetidas no tienen efecto adicional.
    pub fn close(&self) {
        let mut g = self.inner.lock().unwrap();
        g.closed = true;
        self.not_empty.notify_all();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for HandoffQueue {
    fn default() -> Self {
        Self::new()
    }
}
