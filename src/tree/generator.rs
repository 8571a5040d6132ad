use crate::foundation::math::Rng64;

/// One emitted branch. `depth` is the number of subdivisions remaining when it was created:
/// the trunk carries the configured maximum, leaves carry 1.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BranchSegment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub depth: u32,
}

impl BranchSegment {
    pub fn length(&self) -> f64 {
        (self.x2 - self.x1).hypot(self.y2 - self.y1)
    }
}

/// How each fork deviates from its parent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BranchRule {
    pub spread_min_deg: f64,
    pub spread_max_deg: f64,
    pub length_factor: f64,
}

impl Default for BranchRule {
    fn default() -> Self {
        Self {
            spread_min_deg: 25.0,
            spread_max_deg: 40.0,
            length_factor: 0.7,
        }
    }
}

/// Grow a binary branching skeleton, depth first, in pre-order (segment, left subtree,
/// right subtree).
///
/// Each call projects one segment from `(x, y)` along `angle_deg` and forks twice from its
/// end: left turns by `-U[spread_min, spread_max)`, right by `+U[..)` drawn independently, both
/// with the length scaled by `length_factor`. The `depth == 0` check happens before emission,
/// so exactly `2^max_depth - 1` segments come back and the deepest carry depth 1.
pub fn generate(
    origin_x: f64,
    origin_y: f64,
    initial_angle_deg: f64,
    initial_length: f64,
    max_depth: u32,
    rule: &BranchRule,
    rng: &mut Rng64,
) -> Vec<BranchSegment> {
    let capacity = 1usize
        .checked_shl(max_depth)
        .map(|n| n - 1)
        .unwrap_or(0)
        .min(1 << 16);
    let mut out = Vec::with_capacity(capacity);
    grow(
        &mut out,
        origin_x,
        origin_y,
        initial_angle_deg,
        initial_length,
        max_depth,
        rule,
        rng,
    );
    out
}

#[allow(clippy::too_many_arguments)]
fn grow(
    out: &mut Vec<BranchSegment>,
    x: f64,
    y: f64,
    angle_deg: f64,
    length: f64,
    depth: u32,
    rule: &BranchRule,
    rng: &mut Rng64,
) {
    if depth == 0 {
        return;
    }

    let rad = angle_deg.to_radians();
    let end_x = x + rad.cos() * length;
    let end_y = y + rad.sin() * length;
    out.push(BranchSegment {
        x1: x,
        y1: y,
        x2: end_x,
        y2: end_y,
        depth,
    });

    let next_len = length * rule.length_factor;
    let left = rng.next_range(rule.spread_min_deg, rule.spread_max_deg);
    grow(out, end_x, end_y, angle_deg - left, next_len, depth - 1, rule, rng);
    let right = rng.next_range(rule.spread_min_deg, rule.spread_max_deg);
    grow(out, end_x, end_y, angle_deg + right, next_len, depth - 1, rule, rng);
}

#[cfg(test)]
#[path = "../../tests/unit/tree/generator.rs"]
mod tests;
