//! Broad-phase candidate pair generation: sort-and-sweep along the x axis.
//!
//! Pair emission order is deterministic: sorting ties break on body slot
//! index and the final pair list is sorted by `(a, b)` slot indices, so the
//! solver sees contacts in the same order every run. With the `parallel`
//! feature the per-body AABB computation fans out over rayon; the sweep and
//! everything after it stays sequential.

use crate::body::RigidBody;
use crate::handle::Arena;
use crate::shapes::Aabb;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One body's world AABB plus its arena slot.
pub(crate) struct BodyAabb {
    pub index: u32,
    pub aabb: Aabb,
}

/// Compute world AABBs for every live body, in slot order.
pub(crate) fn compute_aabbs(bodies: &Arena<RigidBody>) -> Vec<BodyAabb> {
    let aabbs: Vec<BodyAabb>;
    #[cfg(feature = "parallel")]
    {
        let entries: Vec<(u32, &RigidBody)> =
            bodies.iter().map(|(index, _, body)| (index, body)).collect();
        aabbs = entries
            .par_iter()
            .map(|&(index, body)| BodyAabb {
                index,
                aabb: body.shape().aabb(&body.pose()),
            })
            .collect();
    }
    #[cfg(not(feature = "parallel"))]
    {
        aabbs = bodies
            .iter()
            .map(|(index, _, body)| BodyAabb {
                index,
                aabb: body.shape().aabb(&body.pose()),
            })
            .collect();
    }
    aabbs
}

/// Sort-and-sweep over x extents. Emits each overlapping pair once as
/// `(lower_slot, higher_slot)`.
pub(crate) fn sweep_pairs(aabbs: &mut [BodyAabb]) -> Vec<(u32, u32)> {
    aabbs.sort_by(|a, b| {
        a.aabb
            .min
            .x
            .total_cmp(&b.aabb.min.x)
            .then(a.index.cmp(&b.index))
    });

    let mut pairs = Vec::new();
    for i in 0..aabbs.len() {
        let a = &aabbs[i];
        for b in aabbs.iter().skip(i + 1) {
            if b.aabb.min.x > a.aabb.max.x {
                break;
            }
            if a.aabb.overlaps(&b.aabb) {
                pairs.push((a.index.min(b.index), a.index.max(b.index)));
            }
        }
    }
    pairs.sort_unstable();
    pairs
}
