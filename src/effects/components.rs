//! Click indicator state machine and bookkeeping.
use std::collections::VecDeque;
use std::f32::consts::PI;

use bevy::prelude::*;

use crate::scene::AssetSlot;

pub const RING_INNER_RADIUS: f32 = 0.5;
pub const RING_OUTER_RADIUS: f32 = 1.0;
pub const CENTER_RADIUS: f32 = 0.2;
/// Lift above the ground plane to avoid z-fighting.
pub const INDICATOR_HOVER: f32 = 0.01;

/// A ripple that grows, pulses, and fades over a fixed lifetime.
///
/// Two states: active while `elapsed < lifetime`, expired afterwards. Once
/// expired, [`ClickIndicator::advance`] keeps returning `false` and the owner
/// must dispose the visuals.
#[derive(Component, Debug, Clone)]
pub struct ClickIndicator {
    elapsed: f32,
    lifetime: f32,
    base_opacity: f32,
    active: bool,
}

impl ClickIndicator {
    pub fn new(lifetime: f32, base_opacity: f32) -> Self {
        Self {
            elapsed: 0.0,
            lifetime: lifetime.max(f32::EPSILON),
            base_opacity: base_opacity.clamp(0.0, 1.0),
            active: true,
        }
    }

    /// Advances by `delta_secs` and reports whether the indicator is still active.
    pub fn advance(&mut self, delta_secs: f32) -> bool {
        if !self.active {
            return false;
        }

        self.elapsed += delta_secs.max(0.0);
        if self.progress() >= 1.0 {
            self.active = false;
            return false;
        }
        true
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn progress(&self) -> f32 {
        self.elapsed / self.lifetime
    }

    /// `base_opacity * (1 - progress)`, never negative.
    pub fn opacity(&self) -> f32 {
        (self.base_opacity * (1.0 - self.progress())).max(0.0)
    }

    /// Uniform ring scale: linear growth to 3x with a two-cycle 20% pulse on top.
    pub fn ring_scale(&self) -> f32 {
        let progress = self.progress();
        let base = 1.0 + progress * 2.0;
        let pulse = 1.0 + (progress * 4.0 * PI).sin() * 0.2;
        base * pulse
    }
}

/// Marker for the growing ring child.
#[derive(Component, Debug, Default)]
pub struct IndicatorRing;

/// Marker for the center disc child.
#[derive(Component, Debug, Default)]
pub struct IndicatorCenter;

/// Per-indicator materials and the ring child they animate.
#[derive(Component, Debug, Default)]
pub struct IndicatorVisuals {
    pub ring: Option<Entity>,
    pub ring_material: AssetSlot<StandardMaterial>,
    pub center_material: AssetSlot<StandardMaterial>,
}

impl IndicatorVisuals {
    /// Removes the owned materials. Returns `false` if they were already gone.
    pub fn release(&mut self, materials: &mut Assets<StandardMaterial>) -> bool {
        self.ring = None;
        let ring = self.ring_material.release(materials);
        let center = self.center_material.release(materials);
        ring || center
    }
}

/// Live indicators in click order.
#[derive(Resource, Debug, Default)]
pub struct ActiveIndicators {
    queue: VecDeque<Entity>,
}

impl ActiveIndicators {
    pub fn push(&mut self, entity: Entity) {
        self.queue.push_back(entity);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.queue.iter()
    }

    /// Keeps the entities for which `keep` returns `true`, preserving click order.
    pub fn retain(&mut self, keep: impl FnMut(&Entity) -> bool) {
        self.queue.retain(keep);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Entity> + '_ {
        self.queue.drain(..)
    }
}

/// Meshes shared by every indicator plus the spawn parameters.
#[derive(Resource, Debug)]
pub struct IndicatorAssets {
    pub ring_mesh: AssetSlot<Mesh>,
    pub center_mesh: AssetSlot<Mesh>,
    pub color: Color,
    pub lifetime_secs: f32,
    pub base_opacity: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_never_increases_until_expiry() {
        let mut indicator = ClickIndicator::new(1.0, 0.8);
        let mut previous = indicator.opacity();
        assert!((previous - 0.8).abs() < 1e-6);

        for delta in [0.0, 0.016, 0.1, 0.0, 0.25, 0.033, 0.3, 0.5] {
            indicator.advance(delta);
            let opacity = indicator.opacity();
            assert!(opacity <= previous + 1e-6, "{} > {}", opacity, previous);
            assert!(opacity >= 0.0);
            previous = opacity;
        }
    }

    #[test]
    fn expires_exactly_at_lifetime() {
        let mut indicator = ClickIndicator::new(1.0, 0.8);
        assert!(indicator.advance(0.5));
        assert!(indicator.is_active());

        assert!(!indicator.advance(0.5));
        assert!(!indicator.is_active());
        assert!((indicator.progress() - 1.0).abs() < 1e-6);

        assert!(!indicator.advance(0.1));
        assert!((indicator.elapsed() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn stays_active_just_below_lifetime() {
        let mut indicator = ClickIndicator::new(1.0, 0.8);
        assert!(indicator.advance(0.9375));
        assert!(indicator.opacity() > 0.0);
        assert!(!indicator.advance(0.0625));
    }

    #[test]
    fn ring_scale_grows_with_pulse() {
        let mut indicator = ClickIndicator::new(1.0, 0.8);
        assert!((indicator.ring_scale() - 1.0).abs() < 1e-6);

        indicator.advance(0.125);
        let expected = (1.0 + 0.25) * (1.0 + (0.5 * PI).sin() * 0.2);
        assert!((indicator.ring_scale() - expected).abs() < 1e-5);

        indicator.advance(0.375);
        assert!((indicator.ring_scale() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn negative_delta_is_ignored() {
        let mut indicator = ClickIndicator::new(1.0, 0.8);
        indicator.advance(0.4);
        indicator.advance(-1.0);
        assert!((indicator.elapsed() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn queue_preserves_click_order() {
        let mut world = World::new();
        let mut active = ActiveIndicators::default();
        let first = world.spawn_empty().id();
        let second = world.spawn_empty().id();
        let third = world.spawn_empty().id();
        active.push(first);
        active.push(second);
        active.push(third);

        active.retain(|entity| *entity != second);
        assert_eq!(active.iter().copied().collect::<Vec<_>>(), vec![first, third]);
    }
}
