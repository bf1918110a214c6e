use crate::model::{
    DutySlot, DutyType, DutyTypeId, DutyValue, NonAvailability, Person, PersonId, Unit, UnitId,
};
use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Surface d'accès aux données consommée par le moteur d'allocation.
///
/// Les lectures renvoient des copies ; les écritures prennent effet
/// immédiatement, sans transaction (chaque créneau commité reste valable
/// isolément si le run échoue ensuite).
pub trait DutyStore {
    fn find_unit(&self, unit: &UnitId) -> Option<Unit>;
    /// Types de garde actifs de l'unité et de toutes ses sous-unités.
    fn active_duty_types_for_unit(&self, unit: &UnitId) -> Vec<DutyType>;
    /// Personnel de l'unité et de toutes ses sous-unités.
    fn personnel_for_unit(&self, unit: &UnitId) -> Vec<Person>;
    fn qualification_requirements(&self, duty_type: &DutyTypeId) -> Vec<String>;
    fn person_has_qualification(&self, person: &PersonId, qualification: &str) -> bool;
    fn active_non_availability(&self, person: &PersonId, date: NaiveDate)
        -> Option<NonAvailability>;
    /// Historique complet des créneaux, toutes dates confondues.
    fn all_duty_slots(&self) -> Vec<DutySlot>;
    fn duty_value(&self, duty_type: &DutyTypeId) -> Option<DutyValue>;
    fn create_duty_slot(&mut self, slot: DutySlot) -> Result<()>;
    fn update_person_score(&mut self, person: &PersonId, new_score: f64) -> Result<()>;
    /// Supprime les créneaux de l'unité dans l'intervalle inclusif ;
    /// renvoie le nombre retiré.
    fn clear_slots_in_range(&mut self, unit: &UnitId, start: NaiveDate, end: NaiveDate)
        -> Result<usize>;
}

/// Registre complet : l'équivalent fichier d'une base de données.
///
/// Sert d'implémentation mémoire de [`DutyStore`] et d'unité de
/// persistance JSON (voir [`crate::storage::JsonStorage`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    #[serde(default)]
    pub units: Vec<Unit>,
    #[serde(default)]
    pub people: Vec<Person>,
    #[serde(default)]
    pub duty_types: Vec<DutyType>,
    #[serde(default)]
    pub duty_values: HashMap<DutyTypeId, DutyValue>,
    #[serde(default)]
    pub non_availabilities: Vec<NonAvailability>,
    #[serde(default)]
    pub slots: Vec<DutySlot>,
}

impl Registry {
    pub fn find_person_by_handle<'a>(&'a self, handle: &str) -> Option<&'a Person> {
        self.people.iter().find(|p| p.handle == handle)
    }
    pub fn find_person_by_id<'a>(&'a self, id: &PersonId) -> Option<&'a Person> {
        self.people.iter().find(|p| &p.id == id)
    }
    pub fn find_person_mut_by_id(&mut self, id: &PersonId) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| &p.id == id)
    }
    pub fn find_unit_by_name<'a>(&'a self, name: &str) -> Option<&'a Unit> {
        self.units.iter().find(|u| u.name == name)
    }
    pub fn find_duty_type_by_name<'a>(&'a self, name: &str) -> Option<&'a DutyType> {
        self.duty_types.iter().find(|d| d.name == name)
    }

    /// L'unité et toutes ses descendantes (fermeture transitive des liens
    /// `parent`). Le garde-fou `contains` coupe un éventuel cycle.
    pub fn unit_and_descendants(&self, root: &UnitId) -> Vec<UnitId> {
        let mut scope = vec![root.clone()];
        let mut cursor = 0;
        while cursor < scope.len() {
            let current = scope[cursor].clone();
            for unit in &self.units {
                if unit.parent.as_ref() == Some(&current) && !scope.contains(&unit.id) {
                    scope.push(unit.id.clone());
                }
            }
            cursor += 1;
        }
        scope
    }
}

impl DutyStore for Registry {
    fn find_unit(&self, unit: &UnitId) -> Option<Unit> {
        self.units.iter().find(|u| &u.id == unit).cloned()
    }

    fn active_duty_types_for_unit(&self, unit: &UnitId) -> Vec<DutyType> {
        let scope = self.unit_and_descendants(unit);
        self.duty_types
            .iter()
            .filter(|dt| dt.is_active && scope.contains(&dt.unit))
            .cloned()
            .collect()
    }

    fn personnel_for_unit(&self, unit: &UnitId) -> Vec<Person> {
        let scope = self.unit_and_descendants(unit);
        self.people
            .iter()
            .filter(|p| scope.contains(&p.unit))
            .cloned()
            .collect()
    }

    fn qualification_requirements(&self, duty_type: &DutyTypeId) -> Vec<String> {
        self.duty_types
            .iter()
            .find(|dt| &dt.id == duty_type)
            .map(|dt| dt.required_qualifications.clone())
            .unwrap_or_default()
    }

    fn person_has_qualification(&self, person: &PersonId, qualification: &str) -> bool {
        self.find_person_by_id(person)
            .is_some_and(|p| p.qualifications.iter().any(|q| q == qualification))
    }

    fn active_non_availability(
        &self,
        person: &PersonId,
        date: NaiveDate,
    ) -> Option<NonAvailability> {
        self.non_availabilities
            .iter()
            .find(|na| &na.person == person && na.covers(date))
            .cloned()
    }

    fn all_duty_slots(&self) -> Vec<DutySlot> {
        self.slots.clone()
    }

    fn duty_value(&self, duty_type: &DutyTypeId) -> Option<DutyValue> {
        self.duty_values.get(duty_type).cloned()
    }

    fn create_duty_slot(&mut self, slot: DutySlot) -> Result<()> {
        self.slots.push(slot);
        Ok(())
    }

    fn update_person_score(&mut self, person: &PersonId, new_score: f64) -> Result<()> {
        match self.find_person_mut_by_id(person) {
            Some(p) => {
                p.current_duty_score = new_score;
                Ok(())
            }
            None => bail!("unknown person id: {}", person.as_str()),
        }
    }

    fn clear_slots_in_range(
        &mut self,
        unit: &UnitId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<usize> {
        let scope = self.unit_and_descendants(unit);
        let scoped_types: HashSet<&DutyTypeId> = self
            .duty_types
            .iter()
            .filter(|dt| scope.contains(&dt.unit))
            .map(|dt| &dt.id)
            .collect();
        let before = self.slots.len();
        self.slots.retain(|s| {
            !(scoped_types.contains(&s.duty_type) && s.date >= start && s.date <= end)
        });
        Ok(before - self.slots.len())
    }
}
