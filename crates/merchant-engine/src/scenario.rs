//! YAML trade scenarios and their replay through the exchange engine.
//!
//! A scenario describes one shop, its container, one actor with an
//! inventory, the stacks placed in the offered slots, and a list of
//! gestures. Replaying it drives every gesture through an
//! [`ExchangeEngine`] with in-memory collaborators and books the produced
//! events in a [`TradeLedger`].

use std::path::Path;

use merchant_core::{
    ActorInventory, Collaborators, EventSink, ExchangeEngine, MemoryInventory, MemoryWindow,
    Shopkeeper,
};
use merchant_ledger::{LedgerSummary, TradeBalance, TradeLedger, verify_trade};
use merchant_trading::inventory::PLAYER_STORAGE_SIZE;
use merchant_trading::{ItemContainer, MemoryContainer, ShopDefinition, ShopProfile, TradingConfig};
use merchant_types::{
    Actor, ActorId, Gesture, ItemStack, PendingTradeSummary, ShopOwner, ShopkeeperId, TradeEvent,
    Verdict, non_empty,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::EngineError;

// ---------------------------------------------------------------------------
// Scenario file
// ---------------------------------------------------------------------------

/// A replayable trade scenario.
#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    /// Scenario name, echoed in the report.
    pub name: String,
    /// The trading actor.
    pub actor: ActorSpec,
    /// The shop traded with.
    pub shop: ShopSpec,
    /// The shop's container; absent for admin shops or a missing container.
    #[serde(default)]
    pub container: Option<ContainerSpec>,
    /// The actor's inventory.
    #[serde(default)]
    pub inventory: InventorySpec,
    /// Stacks placed in the two offered slots before the first gesture.
    #[serde(default)]
    pub offered: OfferedSpec,
    /// Result item types the veto hook denies.
    #[serde(default)]
    pub deny_results: Vec<String>,
    /// Gestures to replay, in order.
    pub gestures: Vec<Gesture>,
}

/// The trading actor.
#[derive(Debug, Clone, Deserialize)]
pub struct ActorSpec {
    /// Display name.
    pub name: String,
    /// Whether owner rules are bypassed.
    #[serde(default)]
    pub can_bypass: bool,
}

/// The shop and its offers.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopSpec {
    /// Display name.
    pub name: String,
    /// Owner of a player shop. An owner named like the actor is the actor.
    #[serde(default)]
    pub owner: Option<OwnerSpec>,
    /// Shop type and offers.
    pub definition: ShopDefinition,
}

/// Owner of a player shop.
#[derive(Debug, Clone, Deserialize)]
pub struct OwnerSpec {
    /// Display name.
    pub name: String,
    /// Whether the owner is online.
    #[serde(default)]
    pub online: bool,
}

/// A shop container.
#[derive(Debug, Clone, Deserialize)]
pub struct ContainerSpec {
    /// Number of slots.
    #[serde(default = "default_container_slots")]
    pub slots: usize,
    /// Stacks filling the first slots.
    #[serde(default)]
    pub items: Vec<ItemStack>,
    /// Make every read and write fail.
    #[serde(default)]
    pub unreachable: bool,
    /// Make every write fail.
    #[serde(default)]
    pub reject_writes: bool,
}

impl ContainerSpec {
    fn build(self) -> Result<MemoryContainer, EngineError> {
        if self.items.len() > self.slots {
            return Err(EngineError::Scenario {
                message: format!(
                    "container has {} slots but {} stacks",
                    self.slots,
                    self.items.len()
                ),
            });
        }
        let mut contents: Vec<Option<ItemStack>> =
            self.items.into_iter().map(|s| non_empty(Some(s))).collect();
        contents.resize(self.slots, None);
        let mut container = MemoryContainer::with_contents(contents);
        container.set_unreachable(self.unreachable);
        container.set_reject_writes(self.reject_writes);
        Ok(container)
    }
}

/// The actor's inventory.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InventorySpec {
    /// Storage slots by index; shorter lists are padded with empty slots.
    #[serde(default)]
    pub storage: Vec<Option<ItemStack>>,
    /// Stack held on the cursor.
    #[serde(default)]
    pub cursor: Option<ItemStack>,
}

impl InventorySpec {
    fn build(self) -> Result<MemoryInventory, EngineError> {
        if self.storage.len() > PLAYER_STORAGE_SIZE {
            return Err(EngineError::Scenario {
                message: format!(
                    "inventory has {} storage slots, at most {PLAYER_STORAGE_SIZE} allowed",
                    self.storage.len()
                ),
            });
        }
        let mut storage: Vec<Option<ItemStack>> = self.storage.into_iter().map(non_empty).collect();
        storage.resize(PLAYER_STORAGE_SIZE, None);
        let mut inventory = MemoryInventory::with_storage(storage);
        inventory.set_cursor(self.cursor)?;
        Ok(inventory)
    }
}

/// Stacks placed in the offered slots.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OfferedSpec {
    /// First offered slot.
    #[serde(default)]
    pub slot1: Option<ItemStack>,
    /// Second offered slot.
    #[serde(default)]
    pub slot2: Option<ItemStack>,
}

impl Scenario {
    /// Load a scenario from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be read, or
    /// [`EngineError::ScenarioYaml`] if it is not a valid scenario.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ScenarioYaml`] if the string is not a valid
    /// scenario.
    pub fn parse(yaml: &str) -> Result<Self, EngineError> {
        Ok(serde_yml::from_str(yaml)?)
    }
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// What happened to one replayed gesture.
#[derive(Debug, Clone, Serialize)]
pub struct GestureReport {
    /// Position in the scenario.
    pub index: usize,
    /// The replayed gesture.
    pub gesture: Gesture,
    /// The engine's verdict.
    pub outcome: String,
}

/// Result of replaying a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    /// Scenario name.
    pub scenario: String,
    /// Per-gesture outcomes.
    pub gestures: Vec<GestureReport>,
    /// Every event, in emission order.
    pub events: Vec<TradeEvent>,
    /// Ledger statistics.
    pub ledger: LedgerSummary,
    /// Final shop container contents.
    pub container: Option<Vec<Option<ItemStack>>>,
    /// Final actor storage.
    pub storage: Vec<Option<ItemStack>>,
    /// Final cursor stack.
    pub cursor: Option<ItemStack>,
}

/// Event sink that keeps every event and books it in a ledger.
#[derive(Debug, Default)]
struct Recorder {
    events: Vec<TradeEvent>,
    ledger: TradeLedger,
}

impl EventSink for Recorder {
    fn emit(&mut self, event: TradeEvent) {
        if let TradeEvent::Aborted(details) = &event {
            info!(reason = %details.reason, text = details.reason.message(), "trade aborted");
        }
        self.ledger.emit(event.clone());
        self.events.push(event);
    }
}

/// Replay `scenario` under `config`.
///
/// # Errors
///
/// Returns [`EngineError::Scenario`] for unusable scenarios and
/// [`EngineError::Storage`] if the inventory cannot be set up.
pub fn replay(scenario: Scenario, config: TradingConfig) -> Result<ReplayReport, EngineError> {
    if scenario.gestures.is_empty() {
        return Err(EngineError::Scenario {
            message: String::from("scenario has no gestures"),
        });
    }

    let actor = Actor {
        id: ActorId::new(),
        name: scenario.actor.name,
        can_bypass: scenario.actor.can_bypass,
    };
    let owner = scenario.shop.owner.map(|owner| ShopOwner {
        id: if owner.name == actor.name {
            actor.id
        } else {
            ActorId::new()
        },
        name: owner.name,
        online: owner.online,
    });
    let profile = ShopProfile {
        id: ShopkeeperId::new(),
        name: scenario.shop.name,
        owner,
    };
    let mut shop = Shopkeeper::from_definition(profile, scenario.shop.definition);
    let mut container = scenario.container.map(ContainerSpec::build).transpose()?;
    let mut inventory = scenario.inventory.build()?;

    let mut engine = ExchangeEngine::new(config);
    let session_id = engine.open_session(actor.clone());
    let recipes = engine.recipes_for(
        &actor,
        &shop,
        container.as_ref().map(|c| c as &dyn ItemContainer),
    );
    info!(
        %session_id,
        shop = %shop.profile.name,
        shop_type = ?shop.shop_type(),
        recipes = recipes.len(),
        "window opened"
    );
    let mut window = MemoryWindow::new(actor.id, recipes);
    window.place(scenario.offered.slot1, scenario.offered.slot2);

    let deny = scenario.deny_results;
    let mut veto = |summary: &PendingTradeSummary| {
        if deny.contains(&summary.recipe.result.item_type) {
            Verdict::Deny
        } else {
            Verdict::Allow
        }
    };
    let mut recorder = Recorder::default();
    let mut reports = Vec::with_capacity(scenario.gestures.len());

    for (index, gesture) in scenario.gestures.into_iter().enumerate() {
        let mut env = Collaborators {
            window: &mut window,
            inventory: &mut inventory,
            container: container.as_mut().map(|c| c as &mut dyn ItemContainer),
            veto: &mut veto,
            events: &mut recorder,
        };
        let outcome = engine.handle_gesture(actor.id, &mut shop, &gesture, &mut env);
        info!(index, kind = ?gesture.kind, slot = gesture.slot, ?outcome, "gesture replayed");
        reports.push(GestureReport {
            index,
            gesture,
            outcome: format!("{outcome:?}"),
        });
    }

    for event in &recorder.events {
        if let TradeEvent::Committed(details) = event {
            let balance = verify_trade(&recorder.ledger, details.trade_id);
            if balance != TradeBalance::Balanced {
                warn!(trade_id = %details.trade_id, ?balance, "ledger entries do not balance");
            }
        }
    }

    Ok(ReplayReport {
        scenario: scenario.name,
        gestures: reports,
        ledger: recorder.ledger.summary(),
        events: recorder.events,
        container: container.map(|c| c.contents().to_vec()),
        storage: inventory.storage(),
        cursor: inventory.cursor(),
    })
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

const fn default_container_slots() -> usize {
    27
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const SELLING_BATCH: &str = r#"
name: "selling batch"
actor:
  name: "alex"
shop:
  name: "olive's stall"
  owner:
    name: "olive"
  definition:
    type: Selling
    offers:
      - item: { item_type: "diamond", amount: 1 }
        price: 4
container:
  slots: 9
  items:
    - { item_type: "diamond", amount: 2 }
offered:
  slot1: { item_type: "emerald", amount: 20 }
gestures:
  - { slot: 2, kind: MoveToOtherInventory, timestamp_ms: 0 }
"#;

    #[test]
    fn replays_a_selling_batch() {
        let scenario = Scenario::parse(SELLING_BATCH).unwrap();
        let report = replay(scenario, TradingConfig::default()).unwrap();

        assert_eq!(report.ledger.committed_trades, 2);
        assert_eq!(report.ledger.aborted.get("insufficient-stock"), Some(&1));
        assert_eq!(report.ledger.recipe_refreshes, 1);
        assert_eq!(
            report.gestures.first().map(|g| g.outcome.as_str()),
            Some("Traded { commits: 2 }")
        );
        let diamonds: u32 = report.storage.iter().flatten().map(|s| s.amount).sum();
        assert_eq!(diamonds, 2);
    }

    #[test]
    fn owner_named_like_the_actor_is_the_actor() {
        let yaml = SELLING_BATCH.replace("name: \"olive\"", "name: \"alex\"");
        let report = replay(Scenario::parse(&yaml).unwrap(), TradingConfig::default()).unwrap();
        assert_eq!(report.ledger.committed_trades, 0);
        assert_eq!(report.ledger.aborted.get("self-trade"), Some(&1));
    }

    #[test]
    fn denied_results_are_vetoed() {
        let yaml = SELLING_BATCH.replace("gestures:", "deny_results: [\"diamond\"]\ngestures:");
        let report = replay(Scenario::parse(&yaml).unwrap(), TradingConfig::default()).unwrap();
        assert_eq!(report.ledger.committed_trades, 0);
        assert_eq!(report.ledger.aborted.get("vetoed"), Some(&1));
        assert_eq!(report.container.unwrap().first().cloned().flatten().map(|s| s.amount), Some(2));
    }

    #[test]
    fn rejects_scenarios_without_gestures() {
        let yaml = SELLING_BATCH.replace(
            "gestures:\n  - { slot: 2, kind: MoveToOtherInventory, timestamp_ms: 0 }",
            "gestures: []",
        );
        let result = replay(Scenario::parse(&yaml).unwrap(), TradingConfig::default());
        assert!(matches!(result, Err(EngineError::Scenario { .. })));
    }

    #[test]
    fn load_project_scenarios() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("scenarios");
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                let scenario = Scenario::from_file(&path);
                assert!(scenario.is_ok(), "Failed to load {}: {scenario:?}", path.display());
                let report = replay(scenario.unwrap(), TradingConfig::default());
                assert!(report.is_ok(), "Failed to replay {}", path.display());
            }
        }
    }
}
