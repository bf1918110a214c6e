#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use permanence::{
    calendar::parse_date_lenient,
    io,
    model::{CategoryFilter, DutyType, DutyValue, Unit},
    Planner, Registry, ScheduleRequest, ScheduleResult,
};
use permanence::{ByIdTie, JsonStorage, Storage};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI minimaliste de répartition des tours de garde (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON de registre
    #[arg(long, global = true, default_value = "registry.json")]
    registry: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Créer une unité organisationnelle
    AddUnit {
        #[arg(long)]
        name: String,
        /// Nom de l'unité parente (optionnel)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Créer un type de garde rattaché à une unité
    AddDuty {
        /// Nom de l'unité porteuse
        #[arg(long)]
        unit: String,
        #[arg(long)]
        name: String,
        #[arg(long, default_value_t = 1)]
        slots: u32,
        /// Qualification requise (répétable)
        #[arg(long = "require-qual")]
        require_qual: Vec<String>,
        /// Liste "grade1,grade2" admise seule
        #[arg(long)]
        rank_include: Option<String>,
        /// Liste "grade1,grade2" écartée
        #[arg(long)]
        rank_exclude: Option<String>,
        /// Liste d'identifiants d'unité admis seuls
        #[arg(long)]
        section_include: Option<String>,
        /// Liste d'identifiants d'unité écartés
        #[arg(long)]
        section_exclude: Option<String>,
        #[arg(long, default_value_t = 1.0)]
        base_weight: f64,
        #[arg(long, default_value_t = 1.5)]
        weekend_mult: f64,
        #[arg(long, default_value_t = 2.0)]
        holiday_mult: f64,
    },

    /// Importer des personnes depuis un CSV
    ImportPeople {
        #[arg(long)]
        csv: String,
    },

    /// Importer des indisponibilités depuis un CSV
    ImportAbsences {
        #[arg(long)]
        csv: String,
    },

    /// Allouer et persister les gardes de l'intervalle
    Generate {
        /// Nom de l'unité cible
        #[arg(long)]
        unit: String,
        /// `YYYY-MM-DD` ou RFC3339
        #[arg(long)]
        start: String,
        /// `YYYY-MM-DD` ou RFC3339
        #[arg(long)]
        end: String,
        /// Handle de la personne à l'origine du run
        #[arg(long)]
        requested_by: String,
        /// Purge d'abord les créneaux existants de l'intervalle
        #[arg(long)]
        clear_existing: bool,
        /// Départage par identifiant plutôt qu'aléatoire
        #[arg(long)]
        deterministic: bool,
    },

    /// Même allocation, sans rien persister
    Preview {
        #[arg(long)]
        unit: String,
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long)]
        requested_by: String,
        #[arg(long)]
        deterministic: bool,
    },

    /// Lister les créneaux et optionnellement exporter
    List {
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long)]
        out_csv: Option<String>,
    },

    /// Afficher les scores de garde du personnel
    Scores,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let storage = JsonStorage::open(&cli.registry)?;
    let mut registry = storage.load().unwrap_or_default();

    let code = match cli.cmd {
        Commands::AddUnit { name, parent } => {
            let parent_id = match parent {
                Some(pname) => Some(
                    registry
                        .find_unit_by_name(&pname)
                        .map(|u| u.id.clone())
                        .ok_or_else(|| anyhow::anyhow!("unknown unit: {}", pname))?,
                ),
                None => None,
            };
            if registry.find_unit_by_name(&name).is_some() {
                bail!("unit already exists: {name}");
            }
            registry.units.push(Unit::new(name, parent_id));
            storage.save(&registry)?;
            0
        }
        Commands::AddDuty {
            unit,
            name,
            slots,
            require_qual,
            rank_include,
            rank_exclude,
            section_include,
            section_exclude,
            base_weight,
            weekend_mult,
            holiday_mult,
        } => {
            let unit_id = registry
                .find_unit_by_name(&unit)
                .map(|u| u.id.clone())
                .ok_or_else(|| anyhow::anyhow!("unknown unit: {}", unit))?;
            if rank_include.is_some() && rank_exclude.is_some() {
                bail!("--rank-include and --rank-exclude are mutually exclusive");
            }
            if section_include.is_some() && section_exclude.is_some() {
                bail!("--section-include and --section-exclude are mutually exclusive");
            }
            let mut duty = DutyType::new(unit_id, name, slots);
            duty.required_qualifications = require_qual;
            duty.rank_filter = rank_include
                .map(|l| CategoryFilter::include(split_list(&l)))
                .or(rank_exclude.map(|l| CategoryFilter::exclude(split_list(&l))));
            duty.section_filter = section_include
                .map(|l| CategoryFilter::include(split_list(&l)))
                .or(section_exclude.map(|l| CategoryFilter::exclude(split_list(&l))));
            duty.validate()?;
            registry.duty_values.insert(
                duty.id.clone(),
                DutyValue {
                    base_weight,
                    weekend_multiplier: weekend_mult,
                    holiday_multiplier: holiday_mult,
                },
            );
            println!("Duty {} created ({})", duty.name, duty.id.as_str());
            registry.duty_types.push(duty);
            storage.save(&registry)?;
            0
        }
        Commands::ImportPeople { csv } => {
            let people = io::import_people_csv(csv, &registry)?;
            registry.people.extend(people);
            storage.save(&registry)?;
            0
        }
        Commands::ImportAbsences { csv } => {
            let absences = io::import_absences_csv(csv, &registry)?;
            registry.non_availabilities.extend(absences);
            storage.save(&registry)?;
            0
        }
        Commands::Generate {
            unit,
            start,
            end,
            requested_by,
            clear_existing,
            deterministic,
        } => {
            let request = build_request(&registry, &unit, &start, &end, &requested_by)?;
            let request = if clear_existing {
                request.clearing_existing()
            } else {
                request
            };
            let mut planner = Planner::new();
            if deterministic {
                planner = planner.with_tie_break(Box::new(ByIdTie));
            }
            let result = planner.generate_schedule(&mut registry, &request)?;
            // les commits d'un run sont acquis même si le bilan est un échec
            storage.save(&registry)?;
            report(&result);
            if result.success {
                0
            } else {
                2
            }
        }
        Commands::Preview {
            unit,
            start,
            end,
            requested_by,
            deterministic,
        } => {
            let request = build_request(&registry, &unit, &start, &end, &requested_by)?;
            let mut planner = Planner::new();
            if deterministic {
                planner = planner.with_tie_break(Box::new(ByIdTie));
            }
            // jamais sauvegardé : l'aperçu ne touche pas le fichier
            let result = planner.preview_schedule(&mut registry, &request)?;
            for slot in &result.slots {
                let handle = slot
                    .assigned
                    .as_ref()
                    .and_then(|pid| registry.find_person_by_id(pid))
                    .map(|p| p.handle.as_str())
                    .unwrap_or("-");
                println!("{} | {} | {:.2} pts", slot.date, handle, slot.points);
            }
            report(&result);
            if result.success {
                0
            } else {
                2
            }
        }
        Commands::List { out_json, out_csv } => {
            if let Some(path) = out_json {
                io::export_registry_json(path, &registry)?;
            }
            if let Some(path) = out_csv {
                io::export_slots_csv(path, &registry)?;
            }
            // impression compacte
            for slot in &registry.slots {
                let duty = registry
                    .duty_types
                    .iter()
                    .find(|dt| dt.id == slot.duty_type)
                    .map(|dt| dt.name.as_str())
                    .unwrap_or("?");
                let handle = slot
                    .assigned
                    .as_ref()
                    .and_then(|pid| registry.find_person_by_id(pid))
                    .map(|p| p.handle.as_str())
                    .unwrap_or("-");
                println!(
                    "{} | {} | {} | {} | {:.2} pts",
                    slot.id.as_str(),
                    slot.date,
                    duty,
                    handle,
                    slot.points
                );
            }
            0
        }
        Commands::Scores => {
            for person in &registry.people {
                println!(
                    "{} | {} | {:.2}",
                    person.handle, person.display_name, person.current_duty_score
                );
            }
            0
        }
    };

    std::process::exit(code);
}

fn build_request(
    registry: &Registry,
    unit: &str,
    start: &str,
    end: &str,
    requested_by: &str,
) -> Result<ScheduleRequest> {
    let unit_id = registry
        .find_unit_by_name(unit)
        .map(|u| u.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown unit: {}", unit))?;
    let requester = registry
        .find_person_by_handle(requested_by)
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown person: {}", requested_by))?;
    let start = parse_date_lenient(start)?;
    let end = parse_date_lenient(end)?;
    Ok(ScheduleRequest::new(unit_id, start, end, requester))
}

fn report(result: &ScheduleResult) {
    println!(
        "{} slot(s) created, {} skipped",
        result.slots_created, result.slots_skipped
    );
    for warning in &result.warnings {
        eprintln!("Warning: {warning}");
    }
    for error in &result.errors {
        eprintln!("Error: {error}");
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
