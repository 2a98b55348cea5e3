use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{BombId, Module, ModuleId};

/// Bomb outcome. Only the server moves a bomb out of `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BombStatus {
    Active,
    Defused,
    Exploded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PortType {
    Dvi,
    Parallel,
    Ps2,
    Rj45,
    Serial,
    StereoRca,
}

/// One plate on the casing; an empty plate is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PortPlate {
    pub ports: Vec<PortType>,
}

impl PortPlate {
    pub fn new(ports: impl IntoIterator<Item = PortType>) -> Self {
        Self {
            ports: ports.into_iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Batteries {
    pub aa: u8,
    pub d: u8,
}

impl Batteries {
    pub fn total(&self) -> u16 {
        u16::from(self.aa) + u16::from(self.d)
    }
}

/// A configured device within a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bomb {
    pub id: BombId,
    pub serial_number: String,
    pub batteries: Batteries,
    /// Indicator label to lit state.
    pub indicators: BTreeMap<String, bool>,
    pub port_plates: Vec<PortPlate>,
    pub status: BombStatus,
    pub strikes: u32,
    /// Creation order.
    pub modules: Vec<Arc<Module>>,
}

impl Bomb {
    pub fn new(id: BombId, serial_number: impl Into<String>) -> Self {
        Self {
            id,
            serial_number: serial_number.into(),
            batteries: Batteries::default(),
            indicators: BTreeMap::new(),
            port_plates: Vec::new(),
            status: BombStatus::Active,
            strikes: 0,
            modules: Vec::new(),
        }
    }

    pub fn module(&self, module_id: ModuleId) -> Option<&Arc<Module>> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    pub fn is_active(&self) -> bool {
        self.status == BombStatus::Active
    }

    pub fn solved_count(&self) -> usize {
        self.modules.iter().filter(|m| m.solved).count()
    }

    pub fn with_modules_appended(&self, modules: impl IntoIterator<Item = Module>) -> Bomb {
        let mut all = self.modules.clone();
        all.extend(modules.into_iter().map(Arc::new));
        Bomb {
            modules: all,
            ..self.clone()
        }
    }

    /// Replace the module with the same id. `None` when the bomb has no such module.
    pub fn with_module_replaced(&self, module: Module) -> Option<Bomb> {
        let index = self.modules.iter().position(|m| m.id == module.id)?;
        let mut modules = self.modules.clone();
        modules[index] = Arc::new(module);
        Some(Bomb {
            modules,
            ..self.clone()
        })
    }

    /// Adopt the server's bomb-level fields while keeping local module progress.
    ///
    /// The server never sees `state`/`solution` edits made between solves, so
    /// for modules known on both sides the local entity wins; `solved` is the
    /// union of both flags.
    pub fn merged_with_server(&self, incoming: Bomb) -> Bomb {
        let modules = incoming
            .modules
            .into_iter()
            .map(|server_module| match self.module(server_module.id) {
                Some(local) if local.solved || !server_module.solved => local.clone(),
                Some(local) => Arc::new(Module {
                    solved: true,
                    ..Module::clone(&**local)
                }),
                None => server_module,
            })
            .collect();
        Bomb { modules, ..incoming }
    }
}

/// Payload for creating a bomb.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BombConfig {
    pub serial_number: String,
    pub batteries: Batteries,
    #[serde(default)]
    pub indicators: BTreeMap<String, bool>,
    #[serde(default)]
    pub port_plates: Vec<PortPlate>,
}

/// Partial update of a bomb's configurable fields; `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BombPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub batteries: Option<Batteries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indicators: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port_plates: Option<Vec<PortPlate>>,
}

impl BombPatch {
    pub fn is_empty(&self) -> bool {
        self.serial_number.is_none()
            && self.batteries.is_none()
            && self.indicators.is_none()
            && self.port_plates.is_none()
    }
}
