//! Pointer offset from a surface's center, used for parallax
//!
//! Written by the input collaborator, read once per tick by the compositor.
//! Both halves of the pair are packed into a single atomic word, so a
//! reader never sees x from one update and y from another.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use glam::Vec2;

/// Last known pointer offset from the surface center, in [-1, 1] × [-1, 1]
#[derive(Debug, Clone, Default)]
pub struct PointerSignal {
    bits: Arc<AtomicU64>,
}

impl PointerSignal {
    /// Signal starting at the center (no parallax)
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn pack(offset: Vec2) -> u64 {
        ((offset.x.to_bits() as u64) << 32) | offset.y.to_bits() as u64
    }

    #[inline]
    fn unpack(bits: u64) -> Vec2 {
        Vec2::new(f32::from_bits((bits >> 32) as u32), f32::from_bits(bits as u32))
    }

    /// Store a normalized offset (clamped to [-1, 1]; non-finite values read as center)
    pub fn set(&self, offset: Vec2) {
        let sanitize = |v: f32| if v.is_finite() { v.clamp(-1.0, 1.0) } else { 0.0 };
        let offset = Vec2::new(sanitize(offset.x), sanitize(offset.y));
        self.bits.store(Self::pack(offset), Ordering::Relaxed);
    }

    /// Update from a client-space pointer position, normalized against the
    /// surface's on-page rectangle (`origin` = top-left, `size` in CSS pixels)
    pub fn set_from_rect(&self, client: Vec2, origin: Vec2, size: Vec2) {
        if !(size.x > 0.0 && size.y > 0.0) {
            return;
        }
        let half = size * 0.5;
        self.set((client - origin - half) / half);
    }

    pub fn get(&self) -> Vec2 {
        Self::unpack(self.bits.load(Ordering::Relaxed))
    }

    /// Back to center
    pub fn reset(&self) {
        self.set(Vec2::ZERO);
    }
}
