use crate::model::{DutySlot, DutyTypeId, PersonId, SlotStatus};
use chrono::{Duration, NaiveDate};
use std::collections::{HashMap, HashSet};

/// Index éphémère sur l'historique des créneaux, construit une fois par run.
///
/// Deux tables : date → créneaux, date → personnes affectées. Muté en place
/// pendant le run pour que chaque décision voie les affectations du même
/// run ; jamais persisté, jamais partagé entre deux runs.
#[derive(Debug, Default)]
pub struct SchedulingContext {
    slots_by_date: HashMap<NaiveDate, Vec<DutySlot>>,
    assigned_by_date: HashMap<NaiveDate, HashSet<PersonId>>,
}

impl SchedulingContext {
    /// Passage unique sur l'historique complet. Les créneaux annulés sont
    /// ignorés : ils n'engagent plus personne.
    pub fn build(slots: &[DutySlot]) -> Self {
        let mut ctx = Self::default();
        for slot in slots {
            if slot.status == SlotStatus::Cancelled {
                continue;
            }
            if let Some(person) = &slot.assigned {
                ctx.record_assignment(person.clone(), slot.date);
            }
            ctx.record_slot(slot.clone());
        }
        ctx
    }

    pub fn slots_on(&self, date: NaiveDate) -> &[DutySlot] {
        self.slots_by_date.get(&date).map_or(&[], Vec::as_slice)
    }

    pub fn is_assigned_on(&self, person: &PersonId, date: NaiveDate) -> bool {
        self.assigned_by_date
            .get(&date)
            .is_some_and(|set| set.contains(person))
    }

    /// Nombre de jours de garde parmi les 7 jours calendaires strictement
    /// antérieurs à `reference`.
    pub fn recent_duty_count(&self, person: &PersonId, reference: NaiveDate) -> u32 {
        (1..=7)
            .filter(|offset| self.is_assigned_on(person, reference - Duration::days(*offset)))
            .count() as u32
    }

    pub fn existing_slot_count(&self, duty_type: &DutyTypeId, date: NaiveDate) -> usize {
        self.slots_on(date)
            .iter()
            .filter(|s| &s.duty_type == duty_type)
            .count()
    }

    pub fn record_assignment(&mut self, person: PersonId, date: NaiveDate) {
        self.assigned_by_date.entry(date).or_default().insert(person);
    }

    pub fn record_slot(&mut self, slot: DutySlot) {
        self.slots_by_date.entry(slot.date).or_default().push(slot);
    }
}
