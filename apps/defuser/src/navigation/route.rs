use crate::domain::{BombId, ModuleId, RoundId};
use crate::store::SessionSnapshot;

/// Screens reachable in the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Rounds,
    Round {
        round_id: RoundId,
    },
    Bomb {
        round_id: RoundId,
        bomb_id: BombId,
    },
    Module {
        round_id: RoundId,
        bomb_id: BombId,
        module_id: ModuleId,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Crumb {
    pub label: String,
    pub route: Route,
}

impl Crumb {
    fn new(label: impl Into<String>, route: Route) -> Self {
        Self {
            label: label.into(),
            route,
        }
    }
}

/// Trail from Home to `route`.
///
/// Round, bomb and module segments are labelled from the snapshot's held
/// round; a segment that does not resolve there is left out, along with
/// everything below it.
pub fn breadcrumbs(snapshot: &SessionSnapshot, route: Route) -> Vec<Crumb> {
    let mut trail = vec![Crumb::new("Home", Route::Home)];

    let (round_id, bomb_id, module_id) = match route {
        Route::Home => return trail,
        Route::Rounds => {
            trail.push(Crumb::new("Rounds", Route::Rounds));
            return trail;
        }
        Route::Round { round_id } => (round_id, None, None),
        Route::Bomb { round_id, bomb_id } => (round_id, Some(bomb_id), None),
        Route::Module {
            round_id,
            bomb_id,
            module_id,
        } => (round_id, Some(bomb_id), Some(module_id)),
    };
    trail.push(Crumb::new("Rounds", Route::Rounds));

    let Some(round) = snapshot.round.as_ref().filter(|r| r.id == round_id) else {
        return trail;
    };
    trail.push(Crumb::new(format!("Round {}", round.id), Route::Round { round_id }));

    let Some(bomb) = bomb_id.and_then(|id| round.bomb(id)) else {
        return trail;
    };
    let bomb_label = if bomb.serial_number.is_empty() {
        format!("Bomb {}", bomb.id)
    } else {
        format!("Bomb {}", bomb.serial_number)
    };
    trail.push(Crumb::new(
        bomb_label,
        Route::Bomb {
            round_id,
            bomb_id: bomb.id,
        },
    ));

    let Some(module) = module_id.and_then(|id| bomb.module(id)) else {
        return trail;
    };
    trail.push(Crumb::new(
        module.module_type.display_name(),
        Route::Module {
            round_id,
            bomb_id: bomb.id,
            module_id: module.id,
        },
    ));
    trail
}
