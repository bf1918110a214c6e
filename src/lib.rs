#![forbid(unsafe_code)]
//! Permanence — bibliothèque de répartition équitable des tours de garde (sans BD).
//!
//! - Stockage fichiers (JSON/CSV).
//! - Allocation gloutonne par score d'équité ; week-ends et fériés majorés.
//! - Aperçu sans effet de bord (preview) ou application persistante (generate).
//! - Dates pures, forme canonique `YYYY-MM-DD` ; parsing tolérant RFC3339.

pub mod calendar;
pub mod engine;
pub mod io;
pub mod model;
pub mod points;
pub mod storage;
pub mod store;

pub use calendar::{
    date_range, is_holiday, is_weekend, normalize_date, parse_date_lenient, HolidaySet,
};
pub use engine::{
    rank_candidates, ByIdTie, EngineError, Planner, RandomTie, ScheduleRequest, ScheduleResult,
    SchedulingContext, TieBreak,
};
pub use model::{
    CategoryFilter, DutySlot, DutySlotId, DutyType, DutyTypeId, DutyValue, FilterMode,
    NonAvailability, Person, PersonId, SlotStatus, Unit, UnitId,
};
pub use points::points_for;
pub use storage::{JsonStorage, Storage};
pub use store::{DutyStore, Registry};
