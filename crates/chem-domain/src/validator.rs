// validator.rs
use std::sync::atomic::{AtomicUsize, Ordering};

use chemengine::ChemEngine;
use dashmap::DashSet;
use log::debug;

/// Capacidad por defecto de la memoización de estructuras válidas.
pub const DEFAULT_VALIDATOR_CAPACITY: usize = 10_000;

/// Responde "¿es esta cadena un SMILES parseable?" memoizando sólo los
/// aciertos.
///
/// Las cadenas inválidas nunca se guardan: una entrada inválida repetida se
/// vuelve a parsear siempre. La memoria es propia de cada instancia y está
/// acotada por `capacity`; al llenarse se siguen validando cadenas nuevas
/// pero ya no se recuerdan. La cota se respeta también con validaciones
/// concurrentes: cada inserción reserva antes un hueco en `slots`.
#[derive(Debug)]
pub struct StructureValidator {
    engine: ChemEngine,
    memo: DashSet<String>,
    slots: AtomicUsize,
    capacity: usize,
}

impl Default for StructureValidator {
    fn default() -> Self {
        Self::with_capacity(ChemEngine::new(), DEFAULT_VALIDATOR_CAPACITY)
    }
}

impl StructureValidator {
    pub fn new(engine: ChemEngine) -> Self {
        Self::with_capacity(engine, DEFAULT_VALIDATOR_CAPACITY)
    }

    pub fn with_capacity(engine: ChemEngine, capacity: usize) -> Self {
        Self { engine, memo: DashSet::new(), slots: AtomicUsize::new(0), capacity }
    }

    /// `true` sii la cadena produce un grafo molecular. Nunca falla.
    pub fn validate(&self, structure: &str) -> bool {
        if self.memo.contains(structure) {
            return true;
        }
        let valid = self.engine.is_valid(structure);
        if valid {
            self.remember(structure);
        } else {
            debug!("Estructura inválida: '{structure}'");
        }
        valid
    }

    fn remember(&self, structure: &str) {
        let reserved = self.slots
                           .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| (n < self.capacity).then_some(n + 1))
                           .is_ok();
        // Otro hilo ya la guardó: se libera el hueco reservado.
        if reserved && !self.memo.insert(structure.to_string()) {
            self.slots.fetch_sub(1, Ordering::AcqRel);
        }
    }

    /// Número de estructuras memoizadas.
    pub fn memoized(&self) -> usize {
        self.memo.len()
    }

    pub fn engine(&self) -> ChemEngine {
        self.engine
    }
}
