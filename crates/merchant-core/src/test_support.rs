//! Fixtures shared by the session, batch and engine tests.

use std::cell::Cell;
use std::rc::Rc;

use merchant_trading::{
    AdminShop, CurrencyConfig, ItemContainer, MemoryContainer, PriceOffer, SellingShop,
    ShopProfile, ShopStrategy, TradeContext, TradeOffer, TradeRequest, TradingConfig,
};
use merchant_types::{
    AbortReason, Actor, Gesture, GestureKind, ItemStack, RESULT_SLOT, ShopOwner, ShopType,
    ShopkeeperId, TradeCommittedDetails, TradeEvent, TradingRecipe,
};

use crate::batch::{BatchOutcome, run_batch};
use crate::engine::{ExchangeEngine, GestureOutcome};
use crate::memory::{MemoryInventory, MemoryWindow};
use crate::session::TradeSession;
use crate::shopkeeper::Shopkeeper;
use crate::window::{AllowAll, Collaborators, VetoHook};

pub fn admin_profile() -> ShopProfile {
    ShopProfile {
        id: ShopkeeperId::new(),
        name: String::from("spawn market"),
        owner: None,
    }
}

pub fn owned_profile(owner: &Actor) -> ShopProfile {
    ShopProfile {
        id: ShopkeeperId::new(),
        name: String::from("corner stall"),
        owner: Some(ShopOwner {
            id: owner.id,
            name: owner.name.clone(),
            online: false,
        }),
    }
}

pub fn offer(result: ItemStack, item1: ItemStack, item2: Option<ItemStack>) -> TradeOffer {
    TradeOffer {
        result,
        item1,
        item2,
    }
}

pub fn diamond_for_emeralds(price: u32) -> TradeOffer {
    offer(ItemStack::new("diamond", 1), ItemStack::new("emerald", price), None)
}

pub fn admin_shop(offers: Vec<TradeOffer>) -> Shopkeeper {
    Shopkeeper::new(admin_profile(), Box::new(AdminShop::new(offers)))
}

/// A selling shop owned by someone other than the trading actor.
pub fn selling_shop(offers: Vec<PriceOffer>) -> Shopkeeper {
    Shopkeeper::new(
        owned_profile(&Actor::new("owner")),
        Box::new(SellingShop::new(offers)),
    )
}

pub fn stocked(stacks: Vec<ItemStack>, slots: usize) -> MemoryContainer {
    let mut contents: Vec<Option<ItemStack>> = stacks
        .into_iter()
        .map(|s| Some(s).filter(|s| !s.is_empty()))
        .collect();
    contents.resize(slots.max(contents.len()), None);
    MemoryContainer::with_contents(contents)
}

pub fn amount_of(contents: &[Option<ItemStack>], item_type: &str) -> u32 {
    contents
        .iter()
        .flatten()
        .filter(|s| s.item_type == item_type)
        .map(|s| s.amount)
        .sum()
}

/// How often each shop hook ran.
#[derive(Debug, Clone, Default)]
pub struct HookCounts {
    applied: Rc<Cell<u32>>,
    aborted: Rc<Cell<u32>>,
}

impl HookCounts {
    pub fn applied(&self) -> u32 {
        self.applied.get()
    }

    pub fn aborted(&self) -> u32 {
        self.aborted.get()
    }
}

/// Wraps a strategy and counts its hook calls.
pub struct Hooked {
    inner: Box<dyn ShopStrategy>,
    counts: HookCounts,
}

impl Hooked {
    pub fn shop(profile: ShopProfile, inner: Box<dyn ShopStrategy>) -> (Shopkeeper, HookCounts) {
        let counts = HookCounts::default();
        let hooked = Self {
            inner,
            counts: counts.clone(),
        };
        (Shopkeeper::new(profile, Box::new(hooked)), counts)
    }
}

impl ShopStrategy for Hooked {
    fn shop_type(&self) -> ShopType {
        self.inner.shop_type()
    }

    fn trading_recipes(
        &self,
        currency: &CurrencyConfig,
        stock: Option<&[Option<ItemStack>]>,
    ) -> Vec<TradingRecipe> {
        self.inner.trading_recipes(currency, stock)
    }

    fn check_preconditions(
        &self,
        profile: &ShopProfile,
        actor: &Actor,
        config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        self.inner.check_preconditions(profile, actor, config)
    }

    fn stage_effects(
        &self,
        request: &TradeRequest<'_>,
        working: &mut Vec<Option<ItemStack>>,
        config: &TradingConfig,
    ) -> Result<(), AbortReason> {
        self.inner.stage_effects(request, working, config)
    }

    fn on_trade_applied(&mut self, _ctx: &TradeContext) {
        let applied = &self.counts.applied;
        applied.set(applied.get().saturating_add(1));
    }

    fn on_trade_aborted(&mut self, _ctx: &TradeContext, _reason: AbortReason) {
        let aborted = &self.counts.aborted;
        aborted.set(aborted.get().saturating_add(1));
    }
}

/// An engine, one shop, one actor and in-memory collaborators.
pub struct Fixture {
    pub engine: ExchangeEngine,
    pub shop: Shopkeeper,
    pub actor: Actor,
    pub window: MemoryWindow,
    pub inventory: MemoryInventory,
    pub container: Option<MemoryContainer>,
    pub events: Vec<TradeEvent>,
}

impl Fixture {
    pub fn new(config: TradingConfig, shop: Shopkeeper, container: Option<MemoryContainer>) -> Self {
        let actor = Actor::new("alex");
        let mut engine = ExchangeEngine::new(config);
        engine.open_session(actor.clone());
        let recipes = engine.recipes_for(
            &actor,
            &shop,
            container.as_ref().map(|c| c as &dyn ItemContainer),
        );
        let window = MemoryWindow::new(actor.id, recipes);
        Self {
            engine,
            shop,
            actor,
            window,
            inventory: MemoryInventory::new(),
            container,
            events: Vec::new(),
        }
    }

    pub fn admin(offers: Vec<TradeOffer>) -> Self {
        Self::new(TradingConfig::default(), admin_shop(offers), None)
    }

    pub fn place(&mut self, slot1: Option<ItemStack>, slot2: Option<ItemStack>) {
        self.window.place(slot1, slot2);
    }

    pub fn gesture_with(&mut self, gesture: &Gesture, veto: &mut dyn VetoHook) -> GestureOutcome {
        let mut env = Collaborators {
            window: &mut self.window,
            inventory: &mut self.inventory,
            container: self.container.as_mut().map(|c| c as &mut dyn ItemContainer),
            veto,
            events: &mut self.events,
        };
        self.engine
            .handle_gesture(self.actor.id, &mut self.shop, gesture, &mut env)
    }

    pub fn gesture(&mut self, gesture: &Gesture) -> GestureOutcome {
        self.gesture_with(gesture, &mut AllowAll)
    }

    /// A manual gesture of `kind` on the result slot.
    pub fn click(&mut self, kind: GestureKind, timestamp_ms: u64) -> GestureOutcome {
        self.gesture(&Gesture::new(RESULT_SLOT, kind, timestamp_ms))
    }

    /// Run the batch driver directly with a fresh session.
    pub fn batch(&mut self) -> (BatchOutcome, TradeSession) {
        let config = self.engine.config().clone();
        let mut session = TradeSession::new(self.actor.clone(), &config);
        let mut veto = AllowAll;
        let mut env = Collaborators {
            window: &mut self.window,
            inventory: &mut self.inventory,
            container: self.container.as_mut().map(|c| c as &mut dyn ItemContainer),
            veto: &mut veto,
            events: &mut self.events,
        };
        let outcome = run_batch(&mut session, &mut self.shop, &mut env, &config);
        (outcome, session)
    }

    pub fn committed(&self) -> Vec<&TradeCommittedDetails> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TradeEvent::Committed(details) => Some(details),
                _ => None,
            })
            .collect()
    }

    pub fn aborts(&self) -> Vec<(bool, AbortReason)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                TradeEvent::Aborted(details) => Some((details.trade_id.is_some(), details.reason)),
                _ => None,
            })
            .collect()
    }

    pub fn recipes_changed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, TradeEvent::RecipesChanged { .. }))
            .count()
    }

    pub fn container(&self) -> &MemoryContainer {
        self.container.as_ref().unwrap()
    }
}
