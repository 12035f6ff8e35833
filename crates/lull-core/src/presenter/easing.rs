//! Crossfade easing

/// Hermite smoothstep, `3t² − 2t³`, with `t` clamped to [0,1]
pub fn smoothstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
