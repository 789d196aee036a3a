//! Shared merge routine behind union, intersection, difference and the
//! subset/overlap checks.
//!
//! Every binary operation is a union of the two operands, each optionally
//! complemented ("flipped"). Because a set and its complement have the same
//! boundaries, the boundary list of `a' ∪ b'` is also the boundary list of
//! the requested result:
//!
//! | Operation | `flip_a` | `flip_b` | Computed |
//! |-----------|----------|----------|----------|
//! | union | false | false | `a ∪ b` |
//! | intersection | true | true | `¬(¬a ∪ ¬b)` |
//! | difference | true | false | `¬(¬a ∪ b)` |
//!
//! Two algorithms compute the merge. The sweep walks both boundary arrays in
//! lockstep in `O(n + m)`. The search walks only the smaller operand and
//! binary-searches the larger one, `O(n log m)`.

use super::RangeSet;

/// Binary set operation expressed through [`RangeSet::combine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SetOperation {
    Union,
    Intersection,
    Difference,
}

impl SetOperation {
    pub(crate) fn flips(self) -> (bool, bool) {
        match self {
            SetOperation::Union => (false, false),
            SetOperation::Intersection => (true, true),
            SetOperation::Difference => (true, false),
        }
    }
}

/// Algorithm used to merge two boundary arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergeStrategy {
    /// Linear sweep over both operands.
    Sweep,
    /// Walk the first operand, binary-search the second.
    SearchFirst,
    /// Walk the second operand, binary-search the first.
    SearchSecond,
}

impl MergeStrategy {
    /// Picks the cheaper algorithm for operands with `na` and `nb` intervals.
    ///
    /// The sweep costs `na + nb`; the search costs `min · max(1, log2(max))`.
    /// Ties go to the sweep.
    pub fn select(na: usize, nb: usize) -> Self {
        let (lo, hi) = if na < nb { (na, nb) } else { (nb, na) };
        let sweep_cost = (na + nb) as u64;
        let search_cost = lo as u64 * u64::from(ilog2(hi as u64).max(1));
        if sweep_cost <= search_cost {
            MergeStrategy::Sweep
        } else if lo == na {
            MergeStrategy::SearchFirst
        } else {
            MergeStrategy::SearchSecond
        }
    }
}

#[inline]
fn ilog2(v: u64) -> u32 {
    if v == 0 {
        0
    } else {
        63 - v.leading_zeros()
    }
}

pub(crate) fn general_union(
    a: &RangeSet,
    b: &RangeSet,
    flip_a: bool,
    flip_b: bool,
    strategy: Option<MergeStrategy>,
) -> RangeSet {
    if a.is_empty() {
        return if flip_a { RangeSet::new() } else { b.clone() };
    }
    if b.is_empty() {
        return if flip_b { RangeSet::new() } else { a.clone() };
    }
    let r = match strategy.unwrap_or_else(|| MergeStrategy::select(a.nranges(), b.nranges())) {
        MergeStrategy::Sweep => union_sweep(&a.r, &b.r, flip_a, flip_b),
        MergeStrategy::SearchFirst => union_search(&a.r, b, flip_a, flip_b),
        MergeStrategy::SearchSecond => union_search(&b.r, a, flip_b, flip_a),
    };
    RangeSet { r }
}

fn union_sweep(a: &[u64], b: &[u64], flip_a: bool, flip_b: bool) -> Vec<u64> {
    let mut res = Vec::with_capacity(a.len() + b.len());
    let (mut state_a, mut state_b) = (flip_a, flip_b);
    let mut state_res = state_a || state_b;
    let (mut ia, mut ib) = (0, 0);
    while ia < a.len() || ib < b.len() {
        let run_a = ia < a.len();
        let run_b = ib < b.len();
        let va = if run_a { a[ia] } else { 0 };
        let vb = if run_b { b[ib] } else { 0 };
        let adv_a = run_a && (!run_b || va <= vb);
        let adv_b = run_b && (!run_a || vb <= va);
        if adv_a {
            state_a = !state_a;
            ia += 1;
        }
        if adv_b {
            state_b = !state_b;
            ib += 1;
        }
        if (state_a || state_b) != state_res {
            res.push(if adv_a { va } else { vb });
            state_res = !state_res;
        }
    }
    res
}

/// Walks the segments where `a'` is off and copies whichever boundaries of
/// `b'` fall inside them.
fn union_search(a: &[u64], b: &RangeSet, flip_a: bool, flip_b: bool) -> Vec<u64> {
    let na = a.len() as isize;
    let nb = b.r.len() as isize;
    let mut res = Vec::new();
    let mut iva: isize = if flip_a { 0 } else { -1 };
    while iva < na {
        let mut ivb = if iva == -1 { -1 } else { b.iiv(a[iva as usize]) };
        let mut state_b = flip_b ^ (ivb & 1 == 0);
        if iva > -1 && !state_b {
            res.push(a[iva as usize]);
        }
        while ivb < nb - 1 && (iva == na - 1 || b.r[(ivb + 1) as usize] < a[(iva + 1) as usize]) {
            ivb += 1;
            state_b = !state_b;
            res.push(b.r[ivb as usize]);
        }
        if iva < na - 1 && !state_b {
            res.push(a[(iva + 1) as usize]);
        }
        iva += 2;
    }
    res
}

/// Returns `true` if `a' ∪ b'` never changes state, i.e. it is either
/// everything or nothing.
pub(crate) fn general_all_or_nothing(
    a: &RangeSet,
    b: &RangeSet,
    flip_a: bool,
    flip_b: bool,
    strategy: Option<MergeStrategy>,
) -> bool {
    if a.is_empty() {
        return if flip_a { true } else { b.is_empty() };
    }
    if b.is_empty() {
        return if flip_b { true } else { a.is_empty() };
    }
    match strategy.unwrap_or_else(|| MergeStrategy::select(a.nranges(), b.nranges())) {
        MergeStrategy::Sweep => all_or_nothing_sweep(&a.r, &b.r, flip_a, flip_b),
        MergeStrategy::SearchFirst => all_or_nothing_search(&a.r, b, flip_a, flip_b),
        MergeStrategy::SearchSecond => all_or_nothing_search(&b.r, a, flip_b, flip_a),
    }
}

fn all_or_nothing_sweep(a: &[u64], b: &[u64], flip_a: bool, flip_b: bool) -> bool {
    let (mut state_a, mut state_b) = (flip_a, flip_b);
    let state_res = state_a || state_b;
    let (mut ia, mut ib) = (0, 0);
    while ia < a.len() || ib < b.len() {
        let run_a = ia < a.len();
        let run_b = ib < b.len();
        let va = if run_a { a[ia] } else { 0 };
        let vb = if run_b { b[ib] } else { 0 };
        if run_a && (!run_b || va <= vb) {
            state_a = !state_a;
            ia += 1;
        }
        if run_b && (!run_a || vb <= va) {
            state_b = !state_b;
            ib += 1;
        }
        if (state_a || state_b) != state_res {
            return false;
        }
    }
    true
}

fn all_or_nothing_search(a: &[u64], b: &RangeSet, flip_a: bool, flip_b: bool) -> bool {
    let na = a.len() as isize;
    let nb = b.r.len() as isize;
    let mut iva: isize = if flip_a { 0 } else { -1 };
    while iva < na {
        if iva == -1 {
            // leading segment (-inf, a[0]) where a' is off
            if !flip_b || b.r[0] < a[0] {
                return false;
            }
        } else if iva == na - 1 {
            // trailing segment [a[last], +inf)
            if !flip_b || b.r[(nb - 1) as usize] > a[(na - 1) as usize] {
                return false;
            }
        } else {
            let ivb = b.iiv(a[iva as usize]);
            if ivb != nb - 1 && b.r[(ivb + 1) as usize] < a[(iva + 1) as usize] {
                return false;
            }
            if flip_b == (ivb & 1 == 0) {
                return false;
            }
        }
        iva += 2;
    }
    true
}
