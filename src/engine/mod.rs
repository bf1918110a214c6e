mod context;
mod driver;
mod eligibility;
mod ranking;
mod types;

pub use context::SchedulingContext;
pub use ranking::{rank_candidates, ByIdTie, RandomTie, TieBreak};
pub use types::{EngineError, ScheduleRequest, ScheduleResult};

use crate::calendar::HolidaySet;
use crate::store::DutyStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Planner : moteur d'allocation équitable des tours de garde.
///
/// Deux points d'entrée pour un même algorithme : `generate_schedule`
/// persiste chaque affectation immédiatement, `preview_schedule` déroule la
/// même logique sans aucun effet observable sur l'état persistant.
#[derive(Debug)]
pub struct Planner {
    holidays: HolidaySet,
    tie_break: Box<dyn TieBreak>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Planner {
    pub fn new() -> Self {
        Self {
            holidays: HolidaySet::default_fr(),
            tie_break: Box::new(RandomTie),
            cancel: None,
        }
    }

    pub fn with_holidays(mut self, holidays: HolidaySet) -> Self {
        self.holidays = holidays;
        self
    }

    pub fn with_tie_break(mut self, tie_break: Box<dyn TieBreak>) -> Self {
        self.tie_break = tie_break;
        self
    }

    /// Drapeau d'annulation partagé, consulté entre deux dates : un run
    /// interrompu conserve les dates déjà traitées.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Alloue et persiste les créneaux de l'intervalle demandé.
    pub fn generate_schedule<S: DutyStore>(
        &mut self,
        store: &mut S,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResult, EngineError> {
        driver::run(
            store,
            request,
            &self.holidays,
            self.tie_break.as_mut(),
            self.cancel.as_deref(),
            driver::Mode::Apply,
        )
    }

    /// Prévision non destructive : même logique, rien n'est persisté.
    pub fn preview_schedule<S: DutyStore>(
        &mut self,
        store: &mut S,
        request: &ScheduleRequest,
    ) -> Result<ScheduleResult, EngineError> {
        driver::run(
            store,
            request,
            &self.holidays,
            self.tie_break.as_mut(),
            self.cancel.as_deref(),
            driver::Mode::Preview,
        )
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}
