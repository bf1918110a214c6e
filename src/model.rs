use anyhow::{bail, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiant fort pour Unit
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitId(String);

impl UnitId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unité organisationnelle ; la hiérarchie est portée par le lien `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub id: UnitId,
    pub name: String,
    #[serde(default)]
    pub parent: Option<UnitId>,
}

impl Unit {
    pub fn new<N: Into<String>>(name: N, parent: Option<UnitId>) -> Self {
        Self {
            id: UnitId::random(),
            name: name.into(),
            parent,
        }
    }
}

/// Identifiant fort pour Person
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersonId(String);

impl PersonId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Personne inscrite au tableau de service.
///
/// Le moteur lit grade/unité/score et, en mode application, réécrit le score
/// cumulé ; le reste relève de la gestion du personnel en amont.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub handle: String,
    pub display_name: String,
    pub unit: UnitId,
    pub rank: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifications: Vec<String>,
    #[serde(default)]
    pub current_duty_score: f64,
}

impl Person {
    pub fn new<H: Into<String>, D: Into<String>, R: Into<String>>(
        handle: H,
        display_name: D,
        unit: UnitId,
        rank: R,
    ) -> Self {
        Self {
            id: PersonId::random(),
            handle: handle.into(),
            display_name: display_name.into(),
            unit,
            rank: rank.into(),
            qualifications: Vec::new(),
            current_duty_score: 0.0,
        }
    }
}

/// Mode d'un filtre de catégorie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    Include,
    Exclude,
}

/// Filtre include/exclude sur une liste de valeurs.
/// Une liste vide laisse tout passer, quel que soit le mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub mode: FilterMode,
    #[serde(default)]
    pub values: Vec<String>,
}

impl CategoryFilter {
    pub fn include<I: IntoIterator<Item = String>>(values: I) -> Self {
        Self {
            mode: FilterMode::Include,
            values: values.into_iter().collect(),
        }
    }
    pub fn exclude<I: IntoIterator<Item = String>>(values: I) -> Self {
        Self {
            mode: FilterMode::Exclude,
            values: values.into_iter().collect(),
        }
    }

    pub fn allows(&self, value: &str) -> bool {
        if self.values.is_empty() {
            return true;
        }
        let listed = self.values.iter().any(|v| v == value);
        match self.mode {
            FilterMode::Include => listed,
            FilterMode::Exclude => !listed,
        }
    }
}

/// Identifiant fort pour DutyType
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DutyTypeId(String);

impl DutyTypeId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Type de garde récurrent, rattaché à une unité.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyType {
    pub id: DutyTypeId,
    pub unit: UnitId,
    pub name: String,
    /// Nombre de personnes à affecter par occurrence.
    pub slots_needed: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_qualifications: Vec<String>,
    #[serde(default)]
    pub rank_filter: Option<CategoryFilter>,
    #[serde(default)]
    pub section_filter: Option<CategoryFilter>,
}

impl DutyType {
    pub fn new<N: Into<String>>(unit: UnitId, name: N, slots_needed: u32) -> Self {
        Self {
            id: DutyTypeId::random(),
            unit,
            name: name.into(),
            slots_needed,
            is_active: true,
            required_qualifications: Vec::new(),
            rank_filter: None,
            section_filter: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("duty type name cannot be empty");
        }
        if self.slots_needed == 0 {
            bail!("slots_needed must be > 0");
        }
        Ok(())
    }
}

/// Barème de points d'un type de garde.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutyValue {
    #[serde(default = "default_base_weight")]
    pub base_weight: f64,
    #[serde(default = "default_weekend_multiplier")]
    pub weekend_multiplier: f64,
    #[serde(default = "default_holiday_multiplier")]
    pub holiday_multiplier: f64,
}

impl Default for DutyValue {
    fn default() -> Self {
        Self {
            base_weight: default_base_weight(),
            weekend_multiplier: default_weekend_multiplier(),
            holiday_multiplier: default_holiday_multiplier(),
        }
    }
}

fn default_base_weight() -> f64 {
    1.0
}
fn default_weekend_multiplier() -> f64 {
    1.5
}
fn default_holiday_multiplier() -> f64 {
    2.0
}
fn default_true() -> bool {
    true
}

/// Identifiant fort pour DutySlot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DutySlotId(String);

impl DutySlotId {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Statut d'un créneau de garde.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Planned,
    Completed,
    Cancelled,
}

/// Créneau de garde : une personne, une date, des points.
///
/// La date est pure (pas d'heure) ; invariant : au plus un créneau par
/// (personne, date), toutes gardes confondues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DutySlot {
    pub id: DutySlotId,
    pub duty_type: DutyTypeId,
    pub assigned: Option<PersonId>,
    pub date: NaiveDate,
    pub points: f64,
    pub status: SlotStatus,
    #[serde(default)]
    pub created_by: Option<PersonId>,
}

impl DutySlot {
    /// Crée un créneau affecté (le moteur ne produit jamais de créneau vide).
    pub fn new(duty_type: DutyTypeId, assigned: PersonId, date: NaiveDate, points: f64) -> Self {
        Self {
            id: DutySlotId::random(),
            duty_type,
            assigned: Some(assigned),
            date,
            points,
            status: SlotStatus::Planned,
            created_by: None,
        }
    }
}

/// Indisponibilité d'une personne (intervalle de dates inclusif).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonAvailability {
    pub person: PersonId,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl NonAvailability {
    pub fn new(person: PersonId, start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if end < start {
            return Err("non-availability end must not precede start".to_string());
        }
        Ok(Self {
            person,
            start,
            end,
            reason: None,
            is_active: true,
        })
    }

    /// Vrai si le record est actif et couvre la date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.is_active && self.start <= date && date <= self.end
    }
}
