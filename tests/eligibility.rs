#![forbid(unsafe_code)]
use chrono::NaiveDate;
use permanence::{
    rank_candidates, ByIdTie, CategoryFilter, DutySlot, DutyTypeId, Person, PersonId,
    SchedulingContext, SlotStatus, UnitId,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn person(id: &str, score: f64) -> Person {
    Person {
        id: PersonId::new(id),
        handle: id.to_string(),
        display_name: id.to_string(),
        unit: UnitId::new("u1"),
        rank: "cpl".to_string(),
        qualifications: Vec::new(),
        current_duty_score: score,
    }
}

#[test]
fn category_filter_include_exclude() {
    let include = CategoryFilter::include(vec!["cpl".to_string(), "sgt".to_string()]);
    assert!(include.allows("cpl"));
    assert!(!include.allows("cne"));

    let exclude = CategoryFilter::exclude(vec!["cne".to_string()]);
    assert!(exclude.allows("cpl"));
    assert!(!exclude.allows("cne"));
}

#[test]
fn category_filter_empty_values_allows_everyone() {
    let include = CategoryFilter::include(Vec::new());
    let exclude = CategoryFilter::exclude(Vec::new());
    assert!(include.allows("n'importe quoi"));
    assert!(exclude.allows("n'importe quoi"));
}

#[test]
fn context_indexes_assignments_and_slots() {
    let duty = DutyTypeId::new("garde");
    let alice = PersonId::new("alice");
    let slots = vec![
        DutySlot::new(duty.clone(), alice.clone(), d(2026, 3, 3), 1.0),
        DutySlot::new(duty.clone(), PersonId::new("bob"), d(2026, 3, 3), 1.0),
    ];
    let ctx = SchedulingContext::build(&slots);

    assert!(ctx.is_assigned_on(&alice, d(2026, 3, 3)));
    assert!(!ctx.is_assigned_on(&alice, d(2026, 3, 4)));
    assert_eq!(ctx.existing_slot_count(&duty, d(2026, 3, 3)), 2);
    assert_eq!(ctx.existing_slot_count(&duty, d(2026, 3, 4)), 0);
    assert_eq!(ctx.slots_on(d(2026, 3, 3)).len(), 2);
}

#[test]
fn context_ignores_cancelled_slots() {
    let duty = DutyTypeId::new("garde");
    let alice = PersonId::new("alice");
    let mut slot = DutySlot::new(duty.clone(), alice.clone(), d(2026, 3, 3), 1.0);
    slot.status = SlotStatus::Cancelled;
    let ctx = SchedulingContext::build(&[slot]);

    assert!(!ctx.is_assigned_on(&alice, d(2026, 3, 3)));
    assert_eq!(ctx.existing_slot_count(&duty, d(2026, 3, 3)), 0);
}

#[test]
fn recent_count_looks_back_seven_days_strictly_before() {
    let duty = DutyTypeId::new("garde");
    let alice = PersonId::new("alice");
    let slots = vec![
        // la veille : compte
        DutySlot::new(duty.clone(), alice.clone(), d(2026, 3, 9), 1.0),
        // il y a exactement 7 jours : compte encore
        DutySlot::new(duty.clone(), alice.clone(), d(2026, 3, 3), 1.0),
        // il y a 8 jours : hors fenêtre
        DutySlot::new(duty.clone(), alice.clone(), d(2026, 3, 2), 1.0),
        // le jour de référence lui-même : strictement avant, donc exclu
        DutySlot::new(duty.clone(), alice.clone(), d(2026, 3, 10), 1.0),
    ];
    let ctx = SchedulingContext::build(&slots);

    assert_eq!(ctx.recent_duty_count(&alice, d(2026, 3, 10)), 2);
}

#[test]
fn context_mutation_feeds_later_lookups() {
    let mut ctx = SchedulingContext::build(&[]);
    let duty = DutyTypeId::new("garde");
    let alice = PersonId::new("alice");

    ctx.record_assignment(alice.clone(), d(2026, 3, 3));
    ctx.record_slot(DutySlot::new(duty.clone(), alice.clone(), d(2026, 3, 3), 1.0));

    assert!(ctx.is_assigned_on(&alice, d(2026, 3, 3)));
    assert_eq!(ctx.existing_slot_count(&duty, d(2026, 3, 3)), 1);
    assert_eq!(ctx.recent_duty_count(&alice, d(2026, 3, 4)), 1);
}

#[test]
fn ranking_orders_by_score_then_recent() {
    let a = person("a", 5.0);
    let b = person("b", 2.0);
    let c = person("c", 2.0);
    let candidates = vec![&a, &b, &c];

    // b et c à égalité de score ; c a moins de gardes récentes
    let recent = |p: &Person| if p.id.as_str() == "b" { 2 } else { 0 };
    let ranked = rank_candidates(candidates, |p| p.current_duty_score, recent, &mut ByIdTie);

    let order: Vec<_> = ranked.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(order, vec!["c", "b", "a"]);
}

#[test]
fn ranking_exact_ties_fall_back_to_strategy() {
    let a = person("a", 1.0);
    let b = person("b", 1.0);
    let c = person("c", 1.0);
    let ranked = rank_candidates(vec![&c, &b, &a], |p| p.current_duty_score, |_| 0, &mut ByIdTie);
    let order: Vec<_> = ranked.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(order, vec!["a", "b", "c"]);
}

#[test]
fn ranking_strategy_never_overrides_score() {
    // quel que soit l'arrangement préalable, le score prime
    let low = person("zzz", 0.0);
    let high = person("aaa", 9.0);
    let ranked = rank_candidates(
        vec![&high, &low],
        |p| p.current_duty_score,
        |_| 0,
        &mut ByIdTie,
    );
    assert_eq!(ranked[0].id.as_str(), "zzz");
}
