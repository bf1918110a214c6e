use crate::model::{DutySlot, PersonId, UnitId};
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

/// Requête d'allocation sur un intervalle de dates inclusif.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    pub unit: UnitId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Personne à l'origine du run, reportée sur chaque créneau créé.
    pub requested_by: PersonId,
    /// Mode application uniquement : purge d'abord les créneaux existants
    /// de l'unité dans l'intervalle.
    pub clear_existing: bool,
}

impl ScheduleRequest {
    pub fn new(unit: UnitId, start: NaiveDate, end: NaiveDate, requested_by: PersonId) -> Self {
        Self {
            unit,
            start,
            end,
            requested_by,
            clear_existing: false,
        }
    }

    pub fn clearing_existing(mut self) -> Self {
        self.clear_existing = true;
        self
    }
}

/// Bilan d'un run d'allocation, commun aux modes application et aperçu.
///
/// Les conditions de saut sont des données (`warnings`), pas des erreurs ;
/// un run partiellement rempli reste un succès.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScheduleResult {
    pub success: bool,
    pub slots_created: u32,
    pub slots_skipped: u32,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub slots: Vec<DutySlot>,
}

/// Erreurs de précondition : rejet avant toute construction de contexte ou
/// mutation.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("invalid date range: end must not precede start")]
    InvalidDateRange,
    #[error("unknown unit: {0}")]
    UnknownUnit(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
