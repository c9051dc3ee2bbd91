//! Pointer arbitration between the overlay and the viewer underneath it.
//!
//! `PointerArbiter` is a two-state machine. While `Idle` the overlay container
//! lets pointer input fall through to the viewer so pan and zoom keep working.
//! A press that lands on a shape moves it to `Active`: the press is kept from
//! reaching the viewer and the container starts accepting input until the
//! gesture ends. Release, leave, and cancel all return to `Idle`, whether or
//! not a matching press was seen.
//!
//! The arbiter never touches the DOM. It returns [`PointerEffect`]s for the
//! host to apply.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use crate::config::PointerMode;

/// Whether the overlay currently owns pointer input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerState {
    /// Input passes through to the viewer.
    #[default]
    Idle,
    /// A gesture that began on a shape is in progress.
    Active,
}

/// Phase of a pointer or touch event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// `mousedown` / `touchstart`.
    Down,
    /// `mouseup` / `touchend`.
    Up,
    /// The pointer left the overlay container.
    Leave,
    /// `touchcancel` or an equivalent aborted gesture.
    Cancel,
}

/// What the event hit on the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// The stage's own empty background.
    Background,
    /// Any shape on any layer.
    Shape,
}

/// A pointer event as seen by the arbiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub target: PointerTarget,
}

impl PointerEvent {
    #[must_use]
    pub fn new(phase: PointerPhase, target: PointerTarget) -> Self {
        Self { phase, target }
    }
}

/// Side effects the host must apply for a handled event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEffect {
    /// Keep the triggering event from reaching the viewer.
    StopPropagation,
    /// Set whether the overlay container accepts pointer input.
    AcceptPointerEvents(bool),
}

/// The pointer arbitration state machine.
#[derive(Debug, Clone, Default)]
pub struct PointerArbiter {
    mode: PointerMode,
    state: PointerState,
}

impl PointerArbiter {
    #[must_use]
    pub fn new(mode: PointerMode) -> Self {
        Self { mode, state: PointerState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> PointerState {
        self.state
    }

    /// Whether the container should accept pointer input before any gesture.
    #[must_use]
    pub fn initial_acceptance(&self) -> bool {
        self.mode == PointerMode::Captured
    }

    /// Feed one event through the state machine.
    ///
    /// Only events belonging to a gesture that began on a shape are stopped;
    /// background presses always reach the viewer.
    pub fn on_pointer(&mut self, event: PointerEvent) -> Vec<PointerEffect> {
        if self.mode == PointerMode::Disabled {
            return Vec::new();
        }
        match event.phase {
            PointerPhase::Down => self.on_down(event.target),
            PointerPhase::Up => self.finish(true),
            PointerPhase::Leave | PointerPhase::Cancel => self.finish(false),
        }
    }

    /// Force the machine back to `Idle`, e.g. on teardown.
    pub fn reset(&mut self) -> Vec<PointerEffect> {
        if self.mode == PointerMode::Disabled {
            return Vec::new();
        }
        self.finish(false)
    }

    fn on_down(&mut self, target: PointerTarget) -> Vec<PointerEffect> {
        if target == PointerTarget::Background {
            return Vec::new();
        }
        let mut effects = vec![PointerEffect::StopPropagation];
        if self.state == PointerState::Idle {
            log::debug!("pointer arbitration: idle -> active");
            if self.mode == PointerMode::Arbitrated {
                effects.push(PointerEffect::AcceptPointerEvents(true));
            }
        }
        self.state = PointerState::Active;
        effects
    }

    fn finish(&mut self, is_release: bool) -> Vec<PointerEffect> {
        let was_active = self.state == PointerState::Active;
        self.state = PointerState::Idle;
        if was_active {
            log::debug!("pointer arbitration: active -> idle");
        }

        let mut effects = Vec::new();
        if was_active && is_release {
            effects.push(PointerEffect::StopPropagation);
        }
        if self.mode == PointerMode::Arbitrated {
            effects.push(PointerEffect::AcceptPointerEvents(false));
        }
        effects
    }
}
