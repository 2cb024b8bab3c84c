//! The option-list engine.
//!
//! [`OptionListEngine`] owns the interaction state of one navigable option
//! list: the latest snapshot of selectable rows, the single active
//! (keyboard-highlighted) row, and the keyboard gate. The host feeds it a
//! fresh row set on every content render via [`sync`](OptionListEngine::sync)
//! and routes key and pointer input into it; the engine reports outward
//! through its public signals.
//!
//! # Example
//!
//! ```
//! use horizon_select::{Direction, OptionKey, OptionListEngine, OptionRow};
//!
//! let engine = OptionListEngine::new().without_scroll_sync();
//! engine.selected.connect(|value| {
//!     println!("picked {value}");
//! });
//!
//! let (apple, banana) = (OptionKey::new(), OptionKey::new());
//! engine.sync(
//!     vec![
//!         OptionRow::new(apple, "apple", "Apple"),
//!         OptionRow::new(banana, "banana", "Banana"),
//!     ],
//!     false,
//! );
//! engine.attention_gained();
//!
//! pollster::block_on(engine.navigate(Direction::Down)).unwrap();
//! engine.commit().unwrap();
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use thiserror::Error;

use horizon_select_core::{Completion, LoadError, Signal};

use crate::gate::{KeyboardControl, KeyboardGate};
use crate::policy::{AutoSelection, default_active_index};
use crate::snapshot::{
    OptionEntry, OptionKey, OptionRow, OptionSnapshot, OptionValue, SnapshotBuilder,
};
use crate::transition::{SnapshotTransition, classify};
use crate::viewport::{DEFAULT_SCROLL_DEBOUNCE, ScrollCoalescer};

// ============================================================================
// Identity, input, and error types
// ============================================================================

/// Global counter for generating unique list tokens.
static NEXT_LIST_TOKEN: AtomicU64 = AtomicU64::new(1);

/// Identifies one engine instance when several lists coexist.
///
/// Hosts that multiplex key events over multiple lists compare tokens to
/// route input to the right engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListToken(u64);

impl ListToken {
    fn new() -> Self {
        Self(NEXT_LIST_TOKEN.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw u64 value of this token.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// A directional navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Move the highlight toward the start of the list.
    Up,
    /// Move the highlight toward the end of the list.
    Down,
}

/// The keys the engine knows how to consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    /// Move the highlight up.
    ArrowUp,
    /// Move the highlight down.
    ArrowDown,
    /// Jump to the first enabled row.
    Home,
    /// Jump to the last enabled row.
    End,
    /// Commit the active row.
    Enter,
}

/// Errors reported by the engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// A navigator or committer operation ran before the first
    /// [`sync`](OptionListEngine::sync). Silent degradation here shows up as
    /// "keyboard navigation mysteriously does nothing", so the misuse is
    /// reported loudly instead.
    #[error("engine is not bound to a list; call sync() with the first render before navigating")]
    NotBound,

    /// The boundary load failed. The engine has no retry policy for load
    /// failures; the error is handed to whoever awaited the navigation.
    #[error("load-more operation failed: {0}")]
    LoadMore(LoadError),
}

/// The currently highlighted row, cloned out of the latest snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveOption {
    /// Stable identity of the row.
    pub key: OptionKey,
    /// The domain value of the row.
    pub value: OptionValue,
    /// The display text captured when the row became (or stayed) active.
    pub text: String,
    /// Position within the snapshot the descriptor was cloned from.
    pub index: usize,
    /// Whether the row is a virtual action row.
    pub is_action: bool,
}

impl ActiveOption {
    fn from_entry(entry: &OptionEntry) -> Self {
        Self {
            key: entry.key,
            value: entry.value.clone(),
            text: entry.text.clone(),
            index: entry.index,
            is_action: entry.is_action,
        }
    }
}

// ============================================================================
// Candidate search
// ============================================================================

/// Outcome of a synchronous candidate search.
enum Seek {
    /// An enabled row was found at this index.
    Found(usize),
    /// The retry budget ran out on disabled rows; the active option is left
    /// unchanged.
    Abandon,
    /// The search hit the list boundary and the loader must run before the
    /// candidate can be resolved.
    NeedsLoad { candidate: usize, budget: usize },
}

/// Walk candidates in `direction` until an enabled row turns up.
///
/// `first_candidate` overrides the first derived candidate (used to resume
/// after a boundary load with the pre-load candidate clamped to the new
/// list). Each disabled hit consumes one unit of `budget` and moves the
/// cursor onto the disabled row before the next candidate is derived; the
/// budget is what guarantees termination on an all-or-mostly-disabled list.
fn seek(
    snapshot: &OptionSnapshot,
    direction: Direction,
    start: Option<usize>,
    first_candidate: Option<usize>,
    mut budget: usize,
    allow_load: bool,
) -> Seek {
    let Some(last) = snapshot.last_index() else {
        return Seek::Abandon;
    };
    let mut current = start;
    let mut pending = first_candidate;

    loop {
        let candidate = match pending.take() {
            Some(candidate) => candidate,
            None => match direction {
                Direction::Down => match current {
                    None => 0,
                    Some(c) if c >= last => {
                        if allow_load {
                            last + 1
                        } else {
                            0
                        }
                    }
                    Some(c) => c + 1,
                },
                Direction::Up => match current {
                    None => last,
                    Some(0) => last,
                    Some(c) => c - 1,
                },
            },
        };

        if allow_load && candidate >= last {
            return Seek::NeedsLoad { candidate, budget };
        }

        let candidate = candidate.min(last);
        let entry = snapshot.get(candidate).expect("candidate clamped to range");
        if !entry.disabled {
            return Seek::Found(candidate);
        }
        if budget == 0 {
            return Seek::Abandon;
        }
        budget -= 1;
        current = Some(candidate);
    }
}

// ============================================================================
// Engine
// ============================================================================

type LoadMoreFn = Box<dyn Fn() -> Completion + Send + Sync>;

/// Outward notifications collected under the state lock and emitted after it
/// is released, so slots may call back into the engine.
enum Effect {
    ActiveChanged(Option<ActiveOption>),
    Selected(OptionValue),
    Consumed(OptionValue),
    ScrollRequested(OptionKey),
}

/// Mutable interaction state, behind one lock.
struct EngineState {
    snapshot: OptionSnapshot,
    active: Option<ActiveOption>,
    will_load_more: bool,
    bound: bool,
    detached: bool,
    gate: KeyboardGate,
    scroll: Option<ScrollCoalescer>,
}

/// A keyboard-navigable option-list engine.
///
/// The engine is a pure interaction-state machine: it owns no data, fetches
/// nothing, and renders nothing. The host rebuilds its row set on every
/// content change and hands it to [`sync`](Self::sync); the engine keeps the
/// active option consistent across those rebuilds and translates key and
/// pointer input into outward selection events.
///
/// # Signals
///
/// - [`selected`](Self::selected): the user committed a row; carries its value.
/// - [`active_changed`](Self::active_changed): the highlighted row changed
///   (or its action-row text refreshed).
/// - [`consumed`](Self::consumed): a row was consumed by selection; hosts
///   typically close their popover on this.
/// - [`scroll_requested`](Self::scroll_requested): the row that should be
///   scrolled into view, debounced.
pub struct OptionListEngine {
    token: ListToken,
    auto_selection: AutoSelection,
    loader: Option<LoadMoreFn>,
    state: Mutex<EngineState>,

    /// Emitted exactly once per committed selection.
    pub selected: Signal<OptionValue>,
    /// Emitted when the active option changes or refreshes.
    pub active_changed: Signal<Option<ActiveOption>>,
    /// Emitted when a selection consumed an option.
    pub consumed: Signal<OptionValue>,
    /// Emitted when a row should be scrolled into view.
    pub scroll_requested: Signal<OptionKey>,
}

impl Default for OptionListEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OptionListEngine {
    /// Create an engine with the default configuration:
    /// [`AutoSelection::FirstSelected`], focus-driven keyboard control, a
    /// 50ms scroll debounce, and no loader.
    pub fn new() -> Self {
        Self {
            token: ListToken::new(),
            auto_selection: AutoSelection::FirstSelected,
            loader: None,
            state: Mutex::new(EngineState {
                snapshot: OptionSnapshot::empty(),
                active: None,
                will_load_more: false,
                bound: false,
                detached: false,
                gate: KeyboardGate::new(KeyboardControl::Focus),
                scroll: Some(ScrollCoalescer::new(DEFAULT_SCROLL_DEBOUNCE)),
            }),
            selected: Signal::new(),
            active_changed: Signal::new(),
            consumed: Signal::new(),
            scroll_requested: Signal::new(),
        }
    }

    /// Set the default-active policy.
    pub fn with_auto_selection(mut self, policy: AutoSelection) -> Self {
        self.auto_selection = policy;
        self
    }

    /// Set who drives the keyboard gate.
    pub fn with_keyboard_control(mut self, control: KeyboardControl) -> Self {
        self.state.get_mut().gate = KeyboardGate::new(control);
        self
    }

    /// Set the scroll-into-view debounce window.
    pub fn with_scroll_debounce(mut self, window: Duration) -> Self {
        self.state.get_mut().scroll = Some(ScrollCoalescer::new(window));
        self
    }

    /// Disable scroll-into-view entirely (headless hosts and tests).
    pub fn without_scroll_sync(mut self) -> Self {
        self.state.get_mut().scroll = None;
        self
    }

    /// Install the boundary loader.
    ///
    /// The loader is invoked when navigation reaches the end of the list
    /// while the host reports more options are available; it returns a
    /// [`Completion`] the host resolves once the new page has been synced.
    pub fn with_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn() -> Completion + Send + Sync + 'static,
    {
        self.loader = Some(Box::new(loader));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// This engine's routing token.
    pub fn token(&self) -> ListToken {
        self.token
    }

    /// The configured default-active policy.
    pub fn auto_selection(&self) -> AutoSelection {
        self.auto_selection
    }

    /// The currently highlighted row, if any.
    pub fn active_option(&self) -> Option<ActiveOption> {
        self.state.lock().active.clone()
    }

    /// Whether `key` identifies the currently highlighted row.
    pub fn is_active(&self, key: OptionKey) -> bool {
        self.state
            .lock()
            .active
            .as_ref()
            .is_some_and(|active| active.key == key)
    }

    /// A clone of the latest snapshot.
    pub fn snapshot(&self) -> OptionSnapshot {
        self.state.lock().snapshot.clone()
    }

    /// Whether the host reported more options beyond the current tail.
    pub fn will_load_more(&self) -> bool {
        self.state.lock().will_load_more
    }

    /// Whether directional and commit keys are currently live.
    pub fn is_keyboard_enabled(&self) -> bool {
        self.state.lock().gate.is_enabled()
    }

    /// Whether the engine has been torn down.
    pub fn is_detached(&self) -> bool {
        self.state.lock().detached
    }

    // ========================================================================
    // Per-render sync and reconciliation
    // ========================================================================

    /// Capture a fresh snapshot from the host's current row set and
    /// reconcile the active option against it.
    ///
    /// The transition from the previous snapshot decides what happens to the
    /// highlight:
    ///
    /// - **Emptied**: the active option is cleared.
    /// - **Unchanged**: the highlight stays; an active action row whose text
    ///   changed (value stable) refreshes its descriptor in place.
    /// - **Appended**: the highlight is left untouched, so lazy pages land
    ///   without disturbing it.
    /// - **Replaced**: the default active option is recomputed under the
    ///   configured policy, even when that yields no active option. Under
    ///   [`AutoSelection::None`] no default is computed, but an active row
    ///   that no longer resolves is still cleared.
    ///
    /// Returns the classified transition.
    #[tracing::instrument(
        skip_all,
        target = "horizon_select::engine",
        level = "debug",
        fields(rows = rows.len(), will_load_more = will_load_more)
    )]
    pub fn sync(&self, rows: Vec<OptionRow>, will_load_more: bool) -> SnapshotTransition {
        let (transition, effects) = {
            let mut state = self.state.lock();
            if state.detached {
                return SnapshotTransition::Unchanged;
            }

            let mut builder = SnapshotBuilder::new();
            builder.extend(rows);
            let next = builder.build();

            let transition = classify(&state.snapshot, &next);
            tracing::debug!(
                target: "horizon_select::reconcile",
                ?transition,
                previous_len = state.snapshot.len(),
                next_len = next.len(),
                "snapshot reconciled"
            );

            state.bound = true;
            state.will_load_more = will_load_more;

            let mut effects = Vec::new();
            match transition {
                SnapshotTransition::Emptied => {
                    if state.active.take().is_some() {
                        effects.push(Effect::ActiveChanged(None));
                    }
                }
                SnapshotTransition::Unchanged => {
                    if let Some(active) = state.active.clone() {
                        match next.entry_by_key(active.key) {
                            Some(entry) if entry.value == active.value => {
                                if entry.is_action && entry.text != active.text {
                                    let refreshed = ActiveOption::from_entry(entry);
                                    state.active = Some(refreshed.clone());
                                    effects.push(Effect::ActiveChanged(Some(refreshed)));
                                }
                            }
                            _ => {
                                // The identity pair no longer resolves; the
                                // active-option invariant outranks the
                                // unchanged classification.
                                state.active = None;
                                effects.push(Effect::ActiveChanged(None));
                            }
                        }
                    }
                }
                SnapshotTransition::Appended => {}
                SnapshotTransition::Replaced => {
                    if self.auto_selection == AutoSelection::None {
                        if let Some(active) = state.active.clone() {
                            match next.entry_by_key(active.key) {
                                Some(entry) if entry.value == active.value => {
                                    // Still present; track its new position
                                    // without announcing a change.
                                    state.active = Some(ActiveOption::from_entry(entry));
                                }
                                _ => {
                                    state.active = None;
                                    effects.push(Effect::ActiveChanged(None));
                                }
                            }
                        }
                    } else {
                        let default = default_active_index(&next, self.auto_selection)
                            .and_then(|index| next.get(index))
                            .map(ActiveOption::from_entry);
                        let row_changed = state.active.as_ref().map(|a| a.key)
                            != default.as_ref().map(|d| d.key);
                        if row_changed {
                            state.active = default.clone();
                            effects.push(Effect::ActiveChanged(default));
                        } else if state.active != default {
                            state.active = default;
                        }
                    }
                }
            }

            state.snapshot = next;
            (transition, effects)
        };

        self.flush(effects);
        transition
    }

    // ========================================================================
    // Keyboard navigation
    // ========================================================================

    /// Move the highlight one step in `direction`.
    ///
    /// Wraps around at the list edges and skips disabled rows, with the
    /// retry budget fixed at the entry-time last index so the walk
    /// terminates on an all-or-mostly-disabled list. When the candidate
    /// reaches the list boundary while the host reports more options, the
    /// loader is awaited first; navigation then resumes against whatever
    /// snapshot is current once the load completes, clamping the boundary
    /// candidate if the list shrank. At most one load runs per call.
    ///
    /// Returns the value of the active option after the move, or `None`
    /// when nothing moved (gate disabled, empty snapshot, or budget
    /// exhausted on disabled rows). A failed load propagates as
    /// [`EngineError::LoadMore`].
    #[tracing::instrument(
        skip(self),
        target = "horizon_select::engine",
        level = "debug"
    )]
    pub async fn navigate(
        &self,
        direction: Direction,
    ) -> Result<Option<OptionValue>, EngineError> {
        let mut loaded = false;
        let mut resume: Option<(usize, usize)> = None;

        loop {
            {
                let mut state = self.state.lock();
                if !state.bound {
                    return Err(EngineError::NotBound);
                }
                if state.detached {
                    return Ok(None);
                }
                // The gate is checked on entry; a move already past its
                // boundary load runs to completion.
                if resume.is_none() && !state.gate.is_enabled() {
                    return Ok(None);
                }
                let Some(last) = state.snapshot.last_index() else {
                    return Ok(None);
                };

                let allow_load = !loaded && state.will_load_more && self.loader.is_some();
                let (start, first, budget) = match resume.take() {
                    Some((candidate, budget)) => (None, Some(candidate.min(last)), budget),
                    None => {
                        let start = state
                            .active
                            .as_ref()
                            .and_then(|active| state.snapshot.entry_by_key(active.key))
                            .map(|entry| entry.index);
                        (start, None, last)
                    }
                };

                match seek(&state.snapshot, direction, start, first, budget, allow_load) {
                    Seek::Found(index) => {
                        let effects = self.activate_index(&mut state, index, true);
                        let value = state.active.as_ref().map(|active| active.value.clone());
                        drop(state);
                        self.flush(effects);
                        return Ok(value);
                    }
                    Seek::Abandon => {
                        tracing::trace!(
                            target: "horizon_select::engine",
                            "no enabled candidate within budget; highlight unchanged"
                        );
                        return Ok(None);
                    }
                    Seek::NeedsLoad { candidate, budget } => {
                        loaded = true;
                        resume = Some((candidate, budget));
                    }
                }
            }

            // Boundary hit: run the loader with the state lock released so
            // the host can sync the new page while we wait.
            let loader = self.loader.as_ref().expect("loader presence checked");
            tracing::debug!(
                target: "horizon_select::engine",
                "awaiting boundary load"
            );
            loader().await.map_err(EngineError::LoadMore)?;
        }
    }

    /// Route one key into the engine.
    ///
    /// Returns whether the key was consumed. Arrows and Home/End are
    /// consumed whenever the gate is enabled, even if the highlight could
    /// not move; Enter is consumed only when it committed a row.
    pub async fn handle_key(&self, key: NavKey) -> Result<bool, EngineError> {
        {
            let state = self.state.lock();
            if !state.bound {
                return Err(EngineError::NotBound);
            }
            if state.detached || !state.gate.is_enabled() {
                return Ok(false);
            }
        }

        match key {
            NavKey::ArrowDown => {
                self.navigate(Direction::Down).await?;
                Ok(true)
            }
            NavKey::ArrowUp => {
                self.navigate(Direction::Up).await?;
                Ok(true)
            }
            NavKey::Home => {
                self.jump_to_edge(Direction::Down);
                Ok(true)
            }
            NavKey::End => {
                self.jump_to_edge(Direction::Up);
                Ok(true)
            }
            NavKey::Enter => self.commit(),
        }
    }

    /// Jump to the list edge: scanning `Down` from nothing finds the first
    /// enabled row (Home), scanning `Up` from nothing finds the last (End).
    fn jump_to_edge(&self, direction: Direction) {
        let effects = {
            let mut state = self.state.lock();
            if state.detached || !state.gate.is_enabled() {
                return;
            }
            let Some(last) = state.snapshot.last_index() else {
                return;
            };
            match seek(&state.snapshot, direction, None, None, last, false) {
                Seek::Found(index) => self.activate_index(&mut state, index, true),
                _ => return,
            }
        };
        self.flush(effects);
    }

    // ========================================================================
    // Selection commit
    // ========================================================================

    /// Commit the active option.
    ///
    /// No-op when nothing is active or the gate is disabled. Returns whether
    /// a selection was emitted.
    pub fn commit(&self) -> Result<bool, EngineError> {
        let key = {
            let state = self.state.lock();
            if !state.bound {
                return Err(EngineError::NotBound);
            }
            if state.detached || !state.gate.is_enabled() {
                return Ok(false);
            }
            match &state.active {
                Some(active) => active.key,
                None => return Ok(false),
            }
        };
        self.choose(key)
    }

    /// Select the row identified by `key`.
    ///
    /// This is the pointer-activation path, and also where
    /// [`commit`](Self::commit) lands, so click-to-select and
    /// Enter-to-select behave identically. A stale key (the row vanished
    /// between the pointer event and this call) and a disabled row are both
    /// no-ops. Otherwise the row becomes active if it was not already, and
    /// one `selected` and one `consumed` signal fire.
    pub fn choose(&self, key: OptionKey) -> Result<bool, EngineError> {
        let effects = {
            let mut state = self.state.lock();
            if !state.bound {
                return Err(EngineError::NotBound);
            }
            if state.detached {
                return Ok(false);
            }
            let Some(entry) = state.snapshot.entry_by_key(key) else {
                tracing::debug!(
                    target: "horizon_select::engine",
                    key = key.as_u64(),
                    "choose ignored: key no longer resolves"
                );
                return Ok(false);
            };
            if entry.disabled {
                return Ok(false);
            }

            let value = entry.value.clone();
            let index = entry.index;
            let mut effects = self.activate_index(&mut state, index, false);
            effects.push(Effect::Selected(value.clone()));
            effects.push(Effect::Consumed(value));
            effects
        };

        self.flush(effects);
        Ok(true)
    }

    // ========================================================================
    // Attention routing
    // ========================================================================

    /// The hosting widget gained attention.
    pub fn attention_gained(&self) {
        let mut state = self.state.lock();
        if state.detached {
            return;
        }
        state.gate.attention_gained();
    }

    /// The hosting widget lost attention.
    ///
    /// When the loss disables the gate (focus-driven control), the default
    /// active option is recomputed so that regaining attention starts from
    /// a sane highlight rather than a stale one.
    pub fn attention_lost(&self) {
        let effects = {
            let mut state = self.state.lock();
            if state.detached || !state.gate.attention_lost() {
                return;
            }
            if self.auto_selection == AutoSelection::None {
                return;
            }

            let default = default_active_index(&state.snapshot, self.auto_selection)
                .and_then(|index| state.snapshot.get(index))
                .map(ActiveOption::from_entry);
            if state.active.as_ref().map(|a| a.key) == default.as_ref().map(|d| d.key) {
                state.active = default;
                return;
            }
            state.active = default.clone();
            vec![Effect::ActiveChanged(default)]
        };
        self.flush(effects);
    }

    /// Explicitly enable or disable keyboard processing.
    ///
    /// In [`KeyboardControl::Activator`] mode this is the only input the
    /// gate responds to.
    pub fn set_keyboard_enabled(&self, enabled: bool) {
        let mut state = self.state.lock();
        if state.detached {
            return;
        }
        state.gate.set_enabled(enabled);
    }

    /// Activator hook: highlight the row identified by `key` directly.
    ///
    /// Returns whether the highlight was applied; stale keys and disabled
    /// rows are rejected.
    pub fn set_active_key(&self, key: OptionKey) -> Result<bool, EngineError> {
        let effects = {
            let mut state = self.state.lock();
            if !state.bound {
                return Err(EngineError::NotBound);
            }
            if state.detached {
                return Ok(false);
            }
            let Some(entry) = state.snapshot.entry_by_key(key) else {
                return Ok(false);
            };
            if entry.disabled {
                return Ok(false);
            }
            let index = entry.index;
            self.activate_index(&mut state, index, true)
        };
        self.flush(effects);
        Ok(true)
    }

    /// Tear the engine down.
    ///
    /// Every subsequent operation is a no-op, including the resumption of a
    /// navigation that was awaiting a loader when the teardown happened: the
    /// late-arriving result is discarded without mutating state or emitting
    /// signals.
    pub fn detach(&self) {
        let mut state = self.state.lock();
        if state.detached {
            return;
        }
        state.detached = true;
        if let Some(scroll) = state.scroll.as_mut() {
            scroll.cancel();
        }
        tracing::debug!(
            target: "horizon_select::engine",
            token = self.token.as_u64(),
            "engine detached"
        );
    }

    // ========================================================================
    // Timer pumping
    // ========================================================================

    /// Pump the scroll coalescer at `now`, emitting `scroll_requested` for a
    /// flushed row that still resolves in the latest snapshot.
    pub fn process_timers_at(&self, now: Instant) {
        let effect = {
            let mut state = self.state.lock();
            if state.detached {
                return;
            }
            let Some(key) = state
                .scroll
                .as_mut()
                .and_then(|scroll| scroll.process_at(now))
            else {
                return;
            };
            // A row that vanished since the request is stale; drop the scroll.
            if state.snapshot.entry_by_key(key).is_none() {
                return;
            }
            Effect::ScrollRequested(key)
        };
        self.flush(vec![effect]);
    }

    /// The time from `now` until the next timer needs pumping, if any.
    pub fn time_until_next_timer(&self, now: Instant) -> Option<Duration> {
        self.state
            .lock()
            .scroll
            .as_mut()
            .and_then(|scroll| scroll.time_until_flush(now))
    }

    // ========================================================================
    // Internal helpers
    // ========================================================================

    /// Make the entry at `index` the active option, collecting the outward
    /// effects. Re-activating the unchanged row is silent.
    fn activate_index(
        &self,
        state: &mut EngineState,
        index: usize,
        scroll: bool,
    ) -> Vec<Effect> {
        let mut effects = Vec::new();
        let Some(entry) = state.snapshot.get(index) else {
            return effects;
        };

        let descriptor = ActiveOption::from_entry(entry);
        let row_changed =
            state.active.as_ref().map(|active| active.key) != Some(descriptor.key);
        let content_changed = state.active.as_ref() != Some(&descriptor);
        state.active = Some(descriptor.clone());

        if content_changed {
            tracing::trace!(
                target: "horizon_select::engine",
                key = descriptor.key.as_u64(),
                value = %descriptor.value,
                index,
                "active option changed"
            );
            effects.push(Effect::ActiveChanged(Some(descriptor.clone())));
        }
        if row_changed
            && scroll
            && let Some(coalescer) = state.scroll.as_mut()
        {
            coalescer.request(descriptor.key);
        }

        effects
    }

    /// Emit collected effects. Runs without the state lock held so slots may
    /// call back into the engine.
    fn flush(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::ActiveChanged(active) => self.active_changed.emit(active),
                Effect::Selected(value) => self.selected.emit(value),
                Effect::Consumed(value) => self.consumed.emit(value),
                Effect::ScrollRequested(key) => self.scroll_requested.emit(key),
            }
        }
    }
}

static_assertions::assert_impl_all!(OptionListEngine: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: OptionKey, value: &str) -> OptionRow {
        OptionRow::new(key, value, value)
    }

    #[test]
    fn test_tokens_are_unique() {
        let first = OptionListEngine::new();
        let second = OptionListEngine::new();
        assert_ne!(first.token(), second.token());
    }

    #[test]
    fn test_sync_reports_transition() {
        let engine = OptionListEngine::new().without_scroll_sync();
        let (a, b) = (OptionKey::new(), OptionKey::new());

        assert_eq!(
            engine.sync(vec![row(a, "a")], false),
            SnapshotTransition::Replaced
        );
        assert_eq!(
            engine.sync(vec![row(a, "a"), row(b, "b")], false),
            SnapshotTransition::Appended
        );
        assert_eq!(
            engine.sync(vec![row(a, "a"), row(b, "b")], false),
            SnapshotTransition::Unchanged
        );
        assert_eq!(engine.sync(vec![], false), SnapshotTransition::Emptied);
    }

    #[test]
    fn test_first_sync_computes_default_active() {
        let engine = OptionListEngine::new().without_scroll_sync();
        let (a, b) = (OptionKey::new(), OptionKey::new());

        engine.sync(vec![row(a, "a").with_disabled(true), row(b, "b")], false);

        let active = engine.active_option().expect("default computed");
        assert_eq!(active.key, b);
        assert!(engine.is_active(b));
        assert!(!engine.is_active(a));
    }

    #[test]
    fn test_detached_engine_ignores_sync() {
        let engine = OptionListEngine::new().without_scroll_sync();
        let a = OptionKey::new();
        engine.sync(vec![row(a, "a")], false);

        engine.detach();
        assert!(engine.is_detached());
        engine.sync(vec![], false);
        // The pre-detach state is frozen rather than mutated.
        assert_eq!(engine.snapshot().len(), 1);
        assert!(engine.active_option().is_some());
    }

    #[test]
    fn test_seek_wraps_and_skips() {
        let (a, b, c) = (OptionKey::new(), OptionKey::new(), OptionKey::new());
        let mut builder = SnapshotBuilder::new();
        builder.extend([row(a, "a"), row(b, "b").with_disabled(true), row(c, "c")]);
        let snapshot = builder.build();

        // Down from a skips b and lands on c.
        assert!(matches!(
            seek(&snapshot, Direction::Down, Some(0), None, 2, false),
            Seek::Found(2)
        ));
        // Down from c wraps to a.
        assert!(matches!(
            seek(&snapshot, Direction::Down, Some(2), None, 2, false),
            Seek::Found(0)
        ));
        // Up from a wraps to c.
        assert!(matches!(
            seek(&snapshot, Direction::Up, Some(0), None, 2, false),
            Seek::Found(2)
        ));
        // Boundary hop is reported instead of taken when a load is allowed.
        assert!(matches!(
            seek(&snapshot, Direction::Down, Some(2), None, 2, true),
            Seek::NeedsLoad { candidate: 3, .. }
        ));
    }
}
