use super::{eligibility, ranking, types::EngineError, SchedulingContext};
use super::{ScheduleRequest, ScheduleResult, TieBreak};
use crate::calendar::{date_range, HolidaySet};
use crate::model::{DutySlot, DutyTypeId, DutyValue, PersonId};
use crate::points::points_for;
use crate::store::DutyStore;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};

/// Mode d'exécution : même algorithme, puits de commit différent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Mode {
    Apply,
    Preview,
}

/// Puits de commit injecté à la frontière du run.
trait CommitSink<S: DutyStore> {
    fn slot(&mut self, store: &mut S, slot: &DutySlot) -> anyhow::Result<()>;
    fn score(&mut self, store: &mut S, person: &PersonId, new_score: f64) -> anyhow::Result<()>;
}

/// Écrit immédiatement dans le store ; les itérations suivantes du même run
/// lisent la nouvelle valeur via l'accumulateur, pas le store.
struct Persist;

impl<S: DutyStore> CommitSink<S> for Persist {
    fn slot(&mut self, store: &mut S, slot: &DutySlot) -> anyhow::Result<()> {
        store.create_duty_slot(slot.clone())
    }
    fn score(&mut self, store: &mut S, person: &PersonId, new_score: f64) -> anyhow::Result<()> {
        store.update_person_score(person, new_score)
    }
}

/// Aperçu : aucun effet observable sur l'état persistant.
struct DryRun;

impl<S: DutyStore> CommitSink<S> for DryRun {
    fn slot(&mut self, _store: &mut S, _slot: &DutySlot) -> anyhow::Result<()> {
        Ok(())
    }
    fn score(&mut self, _store: &mut S, _person: &PersonId, _new_score: f64) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Boucle externe d'allocation : dates croissantes × types de garde (ordre
/// stable) × positions non pourvues. Chaque affectation mute le contexte et
/// l'accumulateur de scores avant la décision suivante.
pub(super) fn run<S: DutyStore>(
    store: &mut S,
    request: &ScheduleRequest,
    holidays: &HolidaySet,
    tie_break: &mut dyn TieBreak,
    cancel: Option<&AtomicBool>,
    mode: Mode,
) -> Result<ScheduleResult, EngineError> {
    if request.end < request.start {
        return Err(EngineError::InvalidDateRange);
    }
    if store.find_unit(&request.unit).is_none() {
        return Err(EngineError::UnknownUnit(request.unit.as_str().to_string()));
    }

    #[cfg(feature = "logging")]
    tracing::info!(
        unit = %request.unit.as_str(),
        start = %request.start,
        end = %request.end,
        preview = matches!(mode, Mode::Preview),
        "allocation run started"
    );

    let mut sink: Box<dyn CommitSink<S>> = match mode {
        Mode::Apply => Box::new(Persist),
        Mode::Preview => Box::new(DryRun),
    };

    let mut result = ScheduleResult {
        success: true,
        ..ScheduleResult::default()
    };

    if mode == Mode::Apply && request.clear_existing {
        let removed = store
            .clear_slots_in_range(&request.unit, request.start, request.end)
            .map_err(EngineError::Other)?;
        result
            .warnings
            .push(format!("Cleared {removed} existing slot(s) before allocation"));
        #[cfg(feature = "logging")]
        tracing::debug!(removed, "cleared existing slots");
    }

    let mut duty_types = store.active_duty_types_for_unit(&request.unit);
    if duty_types.is_empty() {
        result
            .warnings
            .push(format!("No active duty types for unit {}", request.unit.as_str()));
        return Ok(result);
    }
    duty_types.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));

    // Barèmes et qualifications requises, figés pour la durée du run.
    let values: HashMap<DutyTypeId, DutyValue> = duty_types
        .iter()
        .map(|dt| {
            (
                dt.id.clone(),
                store.duty_value(&dt.id).unwrap_or_default(),
            )
        })
        .collect();
    let requirements: HashMap<DutyTypeId, Vec<String>> = duty_types
        .iter()
        .map(|dt| (dt.id.clone(), store.qualification_requirements(&dt.id)))
        .collect();

    // Index construit sur l'historique complet : le compte des gardes
    // récentes regarde en dehors de l'intervalle alloué.
    let mut ctx = SchedulingContext::build(&store.all_duty_slots());

    let people = store.personnel_for_unit(&request.unit);
    // Accumulateur de scores du run ; les deux modes y lisent, seul le mode
    // application reporte chaque valeur dans le store.
    let mut scores: HashMap<PersonId, f64> = people
        .iter()
        .map(|p| (p.id.clone(), p.current_duty_score))
        .collect();
    let mut assigned_this_run: HashSet<PersonId> = HashSet::new();

    for date in date_range(request.start, request.end) {
        if cancel.is_some_and(|flag| flag.load(Ordering::Relaxed)) {
            result
                .warnings
                .push(format!("Run cancelled before {date}; earlier dates kept"));
            break;
        }

        #[cfg(feature = "logging")]
        tracing::debug!(date = %date, "allocating date");

        for duty_type in &duty_types {
            let existing = ctx.existing_slot_count(&duty_type.id, date) as u32;
            let slots_to_create = duty_type.slots_needed.saturating_sub(existing);
            if slots_to_create == 0 {
                continue;
            }
            let required = requirements
                .get(&duty_type.id)
                .map_or(&[] as &[String], Vec::as_slice);

            for offset in 0..slots_to_create {
                let position = existing + offset + 1;
                let extra = match mode {
                    Mode::Preview => Some(&assigned_this_run),
                    Mode::Apply => None,
                };

                let candidates: Vec<_> = people
                    .iter()
                    .filter(|p| {
                        eligibility::is_eligible(&*store, p, duty_type, required, date, &ctx, extra)
                    })
                    .collect();
                let ranked = ranking::rank_candidates(
                    candidates,
                    |p| *scores.get(&p.id).unwrap_or(&p.current_duty_score),
                    |p| ctx.recent_duty_count(&p.id, date),
                    tie_break,
                );

                let Some(person) = ranked.first().copied() else {
                    result.warnings.push(format!(
                        "No eligible personnel for {} on {} (slot {})",
                        duty_type.name, date, position
                    ));
                    result.slots_skipped += 1;
                    continue;
                };

                let value = values.get(&duty_type.id).cloned().unwrap_or_default();
                let points = points_for(date, &value, holidays);
                let mut slot = DutySlot::new(duty_type.id.clone(), person.id.clone(), date, points);
                slot.created_by = Some(request.requested_by.clone());

                let new_score = scores.get(&person.id).unwrap_or(&person.current_duty_score) + points;
                let person_id = person.id.clone();

                sink.slot(store, &slot).map_err(EngineError::Other)?;
                sink.score(store, &person_id, new_score)
                    .map_err(EngineError::Other)?;

                ctx.record_assignment(person_id.clone(), date);
                ctx.record_slot(slot.clone());
                scores.insert(person_id.clone(), new_score);
                assigned_this_run.insert(person_id);
                result.slots.push(slot);
                result.slots_created += 1;
            }
        }
    }

    if result.slots_created == 0 && result.slots_skipped > 0 {
        result.success = false;
        result.errors.push(
            "No slots could be scheduled: every attempted position was skipped".to_string(),
        );
    }

    #[cfg(feature = "logging")]
    tracing::info!(
        created = result.slots_created,
        skipped = result.slots_skipped,
        success = result.success,
        "allocation run finished"
    );

    Ok(result)
}
