use crate::calendar::parse_date_lenient;
use crate::model::{NonAvailability, Person};
use crate::store::Registry;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de personnes depuis CSV:
/// header `handle,display_name,unit,rank[,score][,qualifications]`.
/// `unit` est le nom d'une unité déjà présente dans le registre ;
/// `qualifications` est une liste séparée par `;`.
pub fn import_people_csv<P: AsRef<Path>>(path: P, registry: &Registry) -> anyhow::Result<Vec<Person>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let display = rec.get(1).context("missing display_name")?.trim();
        let unit_name = rec.get(2).context("missing unit")?.trim();
        let rank = rec.get(3).context("missing rank")?.trim();
        if handle.is_empty() || display.is_empty() || rank.is_empty() {
            bail!("invalid people row (empty)");
        }
        let unit = registry
            .find_unit_by_name(unit_name)
            .with_context(|| format!("unknown unit name: {unit_name}"))?;
        let mut person = Person::new(handle, display, unit.id.clone(), rank);
        if let Some(raw) = rec.get(4) {
            let raw = raw.trim();
            if !raw.is_empty() {
                person.current_duty_score = raw
                    .parse()
                    .with_context(|| format!("invalid score value for handle {handle}"))?;
            }
        }
        if let Some(raw) = rec.get(5) {
            person.qualifications = raw
                .split(';')
                .map(str::trim)
                .filter(|q| !q.is_empty())
                .map(str::to_string)
                .collect();
        }
        out.push(person);
    }
    Ok(out)
}

/// Import d'indisponibilités: header `handle,start,end[,reason]`.
/// Dates en forme canonique `YYYY-MM-DD` ou horodatage RFC3339.
pub fn import_absences_csv<P: AsRef<Path>>(
    path: P,
    registry: &Registry,
) -> anyhow::Result<Vec<NonAvailability>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let handle = rec.get(0).context("missing handle")?.trim();
        let person = registry
            .find_person_by_handle(handle)
            .with_context(|| format!("unknown person handle: {handle}"))?;
        let start = parse_date_lenient(rec.get(1).context("missing start")?)
            .with_context(|| format!("invalid start date for handle {handle}"))?;
        let end = parse_date_lenient(rec.get(2).context("missing end")?)
            .with_context(|| format!("invalid end date for handle {handle}"))?;
        let mut absence =
            NonAvailability::new(person.id.clone(), start, end).map_err(anyhow::Error::msg)?;
        if let Some(reason) = rec.get(3) {
            let reason = reason.trim();
            if !reason.is_empty() {
                absence.reason = Some(reason.to_string());
            }
        }
        out.push(absence);
    }
    Ok(out)
}

/// Export JSON du registre (jolie mise en forme)
pub fn export_registry_json<P: AsRef<Path>>(path: P, registry: &Registry) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(registry)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des créneaux: header `id,duty,date,assigned_handle,points,status`
pub fn export_slots_csv<P: AsRef<Path>>(path: P, registry: &Registry) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "duty", "date", "assigned_handle", "points", "status"])?;
    for slot in &registry.slots {
        let duty = registry
            .duty_types
            .iter()
            .find(|dt| dt.id == slot.duty_type)
            .map(|dt| dt.name.as_str())
            .unwrap_or("");
        let assigned = slot
            .assigned
            .as_ref()
            .and_then(|pid| registry.find_person_by_id(pid))
            .map(|p| p.handle.as_str())
            .unwrap_or("");
        let date = slot.date.format("%Y-%m-%d").to_string();
        let points = slot.points.to_string();
        let status = match slot.status {
            crate::model::SlotStatus::Planned => "planned",
            crate::model::SlotStatus::Completed => "completed",
            crate::model::SlotStatus::Cancelled => "cancelled",
        };
        w.write_record([
            slot.id.as_str(),
            duty,
            date.as_str(),
            assigned,
            points.as_str(),
            status,
        ])?;
    }
    w.flush()?;
    Ok(())
}
