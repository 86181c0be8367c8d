//! Handling formulas shared by the player and the rival
//!
//! All values are per physics step; there is no dt scaling because both
//! vehicles integrate on fixed intervals.

/// Grip boosted by vehicle weight: `grip * (1 + ln(1 + weight))`, with the
/// boost capped so the result never exceeds `grip * max_multiplier`.
pub fn weighted_grip(grip: f32, weight: f32, max_multiplier: f32) -> f32 {
    let increase = grip * (1.0 + weight.max(0.0)).ln();
    let max_increase = grip * (max_multiplier - 1.0);
    grip + increase.min(max_increase)
}

/// Acceleration after weight scaling: heavier trolleys pick up speed slower
#[inline]
pub fn weighted_acceleration(acceleration: f32, weight: f32, weight_factor: f32) -> f32 {
    acceleration / (1.0 + weight * weight_factor)
}

/// Deceleration after weight scaling, with a floor on the denominator
#[inline]
pub fn weighted_deceleration(
    deceleration: f32,
    weight: f32,
    weight_factor: f32,
    min_denominator: f32,
) -> f32 {
    deceleration / (1.0 + min_denominator.max(weight * weight_factor))
}

/// Slow a velocity component toward zero by `amount` without crossing it
#[inline]
pub fn apply_friction(v: f32, amount: f32) -> f32 {
    if v > 0.0 {
        (v - amount).max(0.0)
    } else if v < 0.0 {
        (v + amount).min(0.0)
    } else {
        0.0
    }
}

/// First-order low-pass step from `current` toward `target`
#[inline]
pub fn ease_toward(current: f32, target: f32, rate: f32) -> f32 {
    current + (target - current) * rate
}
