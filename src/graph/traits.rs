use num_traits::Zero;
use ordered_float::OrderedFloat;
use std::fmt::Debug;
use std::hash::Hash;
use std::ops::Add;

/// Identity of a graph vertex
///
/// Keys are compared and hashed exactly; there is no tolerance-based
/// matching. Any `Clone + Eq + Hash + Debug` type qualifies, the two
/// modes used throughout the crate being [`Coord`](crate::graph::Coord)
/// and `String`.
pub trait VertexKey: Clone + Eq + Hash + Debug {}

impl<T> VertexKey for T where T: Clone + Eq + Hash + Debug {}

/// Edge weight domain
///
/// Weights need a total order for the priority queue, hence
/// `OrderedFloat<f64>` rather than a bare `f64`.
pub trait Weight: Copy + Ord + Debug + Zero + Add<Output = Self> {
    /// Returns true if the weight can be used for relaxation
    /// (finite and non-negative)
    fn is_admissible(&self) -> bool;

    /// Adds a step to an accumulated distance. Returns `None` when the sum
    /// no longer fits the weight domain (integer overflow, or a float sum
    /// that leaves the finite range).
    fn accumulate(self, step: Self) -> Option<Self>;

    /// Converts the weight for reporting at the crate boundary
    fn as_f64(self) -> f64;
}

impl Weight for OrderedFloat<f64> {
    fn is_admissible(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }

    fn accumulate(self, step: Self) -> Option<Self> {
        let sum = self + step;
        sum.0.is_finite().then_some(sum)
    }

    fn as_f64(self) -> f64 {
        self.0
    }
}

macro_rules! impl_unsigned_weight {
    ($($t:ty),*) => {
        $(
            impl Weight for $t {
                fn is_admissible(&self) -> bool {
                    true
                }

                fn accumulate(self, step: Self) -> Option<Self> {
                    self.checked_add(step)
                }

                #[allow(clippy::cast_precision_loss)]
                fn as_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_unsigned_weight!(u32, u64, usize);
