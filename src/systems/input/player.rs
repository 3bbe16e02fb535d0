use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::components::PlayerInputState;
use crate::ecs::{FixedStepContext, Result, System, SystemPhase};
use crate::world::SimWorld;

/// Key state source polled once per simulation step.
///
/// Keys are identified by their web-style code (`"KeyW"`, `"ArrowUp"`,
/// `"Space"`). "Just pressed" edges persist until cleared so that a tap
/// landing between two steps is never lost.
pub trait InputSampler {
    fn is_pressed(&self, key: &str) -> bool;
    fn was_just_pressed(&self, key: &str) -> bool;
    fn clear_just_pressed(&mut self);
    /// Drops all held keys, e.g. when the host window loses focus.
    fn clear(&mut self);
}

/// In-memory sampler fed by press/release events from the host.
#[derive(Debug, Clone, Default)]
pub struct KeySetSampler {
    held: HashSet<String>,
    just_pressed: HashSet<String>,
}

impl KeySetSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a key-down. Auto-repeat of an already held key is not an edge.
    pub fn press(&mut self, key: &str) {
        if self.held.insert(key.to_string()) {
            self.just_pressed.insert(key.to_string());
        }
    }

    pub fn release(&mut self, key: &str) {
        self.held.remove(key);
    }

    pub fn held_count(&self) -> usize {
        self.held.len()
    }
}

impl InputSampler for KeySetSampler {
    fn is_pressed(&self, key: &str) -> bool {
        self.held.contains(key)
    }

    fn was_just_pressed(&self, key: &str) -> bool {
        self.just_pressed.contains(key)
    }

    fn clear_just_pressed(&mut self) {
        self.just_pressed.clear();
    }

    fn clear(&mut self) {
        self.held.clear();
        self.just_pressed.clear();
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputAxisBinding {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    /// Output magnitudes below this snap to zero
    pub deadzone: f32,
    pub scale: f32,
}

impl InputAxisBinding {
    pub fn new(positive: &[&str], negative: &[&str]) -> Self {
        Self {
            positive: positive.iter().map(|key| key.to_string()).collect(),
            negative: negative.iter().map(|key| key.to_string()).collect(),
            ..Default::default()
        }
    }
}

impl Default for InputAxisBinding {
    fn default() -> Self {
        Self {
            positive: Vec::new(),
            negative: Vec::new(),
            deadzone: 0.0,
            scale: 1.0,
        }
    }
}

/// Keyboard layout for the four flight axes and the one-shot actions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerInputBindings {
    pub collective: InputAxisBinding,
    pub cyclic_x: InputAxisBinding,
    pub cyclic_y: InputAxisBinding,
    pub yaw: InputAxisBinding,
    pub toggle_stability: String,
    pub toggle_hover: String,
    pub toggle_pause: String,
    pub force_trim: String,
    pub reset_trim: String,
}

impl Default for PlayerInputBindings {
    fn default() -> Self {
        Self {
            collective: InputAxisBinding::new(&["KeyR", "PageUp"], &["KeyF", "PageDown"]),
            cyclic_x: InputAxisBinding::new(&["KeyD", "ArrowRight"], &["KeyA", "ArrowLeft"]),
            cyclic_y: InputAxisBinding::new(&["KeyW", "ArrowUp"], &["KeyS", "ArrowDown"]),
            yaw: InputAxisBinding::new(&["KeyE"], &["KeyQ"]),
            toggle_stability: "KeyZ".to_string(),
            toggle_hover: "KeyX".to_string(),
            toggle_pause: "Space".to_string(),
            force_trim: "KeyT".to_string(),
            reset_trim: "KeyY".to_string(),
        }
    }
}

/// Digital axis value: +1 or -1 when only one side is held, 0 otherwise.
pub fn resolve_axis(sampler: &dyn InputSampler, binding: &InputAxisBinding) -> f32 {
    let positive = binding.positive.iter().any(|key| sampler.is_pressed(key));
    let negative = binding.negative.iter().any(|key| sampler.is_pressed(key));

    let direction = match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    };

    let value = direction * binding.scale;
    if value.abs() < binding.deadzone {
        0.0
    } else {
        value.clamp(-1.0, 1.0)
    }
}

pub fn sample_player_input(
    sampler: &dyn InputSampler,
    bindings: &PlayerInputBindings,
) -> PlayerInputState {
    PlayerInputState {
        collective: resolve_axis(sampler, &bindings.collective),
        cyclic_x: resolve_axis(sampler, &bindings.cyclic_x),
        cyclic_y: resolve_axis(sampler, &bindings.cyclic_y),
        yaw: resolve_axis(sampler, &bindings.yaw),
        toggle_stability: sampler.was_just_pressed(&bindings.toggle_stability),
        toggle_hover: sampler.was_just_pressed(&bindings.toggle_hover),
        toggle_pause: sampler.was_just_pressed(&bindings.toggle_pause),
        reset_trim: sampler.was_just_pressed(&bindings.reset_trim),
        force_trim: sampler.was_just_pressed(&bindings.force_trim),
    }
}

/// Samples the keyboard into [`PlayerInputState`] and consumes the press edges.
pub struct PlayerInputSystem;

impl System<SimWorld> for PlayerInputSystem {
    fn id(&self) -> &str {
        "input.keyboard"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Input
    }

    fn run(&mut self, _ctx: &FixedStepContext, world: &mut SimWorld) -> Result<()> {
        world.input = sample_player_input(world.sampler.as_ref(), &world.bindings);
        world.sampler.clear_just_pressed();
        Ok(())
    }
}
