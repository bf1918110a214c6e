use crate::model::Person;
use rand::seq::SliceRandom;
use std::fmt::Debug;

/// Stratégie de départage des ex æquo.
///
/// `arrange` pré-ordonne les candidats ; le tri stable par équité s'applique
/// ensuite, si bien que l'arrangement ne décide que des égalités exactes
/// (score ET compte récent identiques).
pub trait TieBreak: Debug {
    fn arrange(&mut self, candidates: &mut [&Person]);
}

/// Départage aléatoire uniforme (défaut en production).
///
/// Rend le moteur volontairement non déterministe sur les égalités exactes,
/// pour ne pas favoriser systématiquement les mêmes personnes.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTie;

impl TieBreak for RandomTie {
    fn arrange(&mut self, candidates: &mut [&Person]) {
        candidates.shuffle(&mut rand::thread_rng());
    }
}

/// Départage déterministe par identifiant croissant (fixtures reproductibles).
#[derive(Debug, Default, Clone, Copy)]
pub struct ByIdTie;

impl TieBreak for ByIdTie {
    fn arrange(&mut self, candidates: &mut [&Person]) {
        candidates.sort_by(|a, b| a.id.as_str().cmp(b.id.as_str()));
    }
}

/// Ordonne les candidats éligibles : score de garde croissant (le moins
/// servi d'abord), puis gardes des 7 derniers jours croissantes, puis
/// départage de la stratégie.
pub fn rank_candidates<'a, F, G>(
    mut candidates: Vec<&'a Person>,
    score_of: F,
    recent_of: G,
    tie_break: &mut dyn TieBreak,
) -> Vec<&'a Person>
where
    F: Fn(&Person) -> f64,
    G: Fn(&Person) -> u32,
{
    tie_break.arrange(&mut candidates);
    candidates.sort_by(|a, b| {
        score_of(a)
            .total_cmp(&score_of(b))
            .then_with(|| recent_of(a).cmp(&recent_of(b)))
    });
    candidates
}
