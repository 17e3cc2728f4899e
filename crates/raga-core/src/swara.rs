//! Swara quantization
//!
//! Assigns every cent value to the nearest swarasthana of a fixed table and
//! keeps the swaras that occupy a non-trivial share of the performance.

use crate::cents::OCTAVE_CENTS;
use raga_catalog::{SwaraIndex, SwaraSet, SWARA_COUNT};

/// Cent positions of the twelve swarasthanas relative to Sa
pub const SWARA_CENTS: [f64; SWARA_COUNT] = [
    0.00,    // Sa
    112.98,  // R1
    203.05,  // R2/G1
    315.64,  // R3/G2
    386.31,  // G3
    498.05,  // M1
    580.81,  // M2
    701.96,  // Pa
    779.46,  // D1
    1018.00, // D2/N1
    1035.78, // D3/N2
    1105.74, // N3
];

/// Display names, one per entry of [`SWARA_CENTS`]
pub const SWARA_NAMES: [&str; SWARA_COUNT] = [
    "Sa (0)",
    "R1 (1)",
    "R2/G1 (2)",
    "R3/G2 (3)",
    "G3 (4)",
    "M1 (5)",
    "M2 (6)",
    "Pa (7)",
    "D1 (8)",
    "D2/N1 (9)",
    "D3/N2 (10)",
    "N3 (11)",
];

/// Share of samples a swara must exceed to count as present
pub const DEFAULT_OCCUPANCY_THRESHOLD: f64 = 0.01;

/// Carnatic swarasthana table used for all analysis
pub const CARNATIC_TABLE: SwaraTable<'static> = SwaraTable {
    cents: &SWARA_CENTS,
};

/// Display name of a swara index
pub fn swara_name(swara: SwaraIndex) -> &'static str {
    SWARA_NAMES[swara.get()]
}

/// Ordered reference positions, strictly increasing from 0 and below 1200
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwaraTable<'a> {
    cents: &'a [f64],
}

impl<'a> SwaraTable<'a> {
    /// Validate a custom table; `None` if it is empty, longer than twelve
    /// entries, does not start at 0, or is not strictly increasing within
    /// one octave.
    pub fn new(cents: &'a [f64]) -> Option<Self> {
        let starts_at_zero = cents.first() == Some(&0.0);
        let increasing = cents.windows(2).all(|w| w[0] < w[1]);
        let in_octave = cents.last().map_or(false, |&c| c < OCTAVE_CENTS);
        if cents.len() <= SWARA_COUNT && starts_at_zero && increasing && in_octave {
            Some(Self { cents })
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.cents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cents.is_empty()
    }

    /// Index of the entry closest to `cent`. Exact midpoints go to the lower
    /// index.
    pub fn nearest(&self, cent: f64) -> SwaraIndex {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, &position) in self.cents.iter().enumerate() {
            let distance = (cent - position).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        // tables hold at most SWARA_COUNT entries
        SwaraIndex::new(best).unwrap_or_else(|| unreachable!("swara table longer than an octave"))
    }

    /// Per-swara sample counts over a cent trajectory
    pub fn occupancy(&self, cents: &[f64]) -> Occupancy {
        let mut counts = [0usize; SWARA_COUNT];
        for &cent in cents {
            counts[self.nearest(cent).get()] += 1;
        }
        Occupancy {
            counts,
            total: cents.len(),
        }
    }

    /// Swaras occupying more than `threshold` of the trajectory
    pub fn quantize(&self, cents: &[f64], threshold: f64) -> SwaraSet {
        self.occupancy(cents).present(threshold)
    }
}

impl Default for SwaraTable<'static> {
    fn default() -> Self {
        CARNATIC_TABLE
    }
}

/// Sample counts per swara index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occupancy {
    counts: [usize; SWARA_COUNT],
    total: usize,
}

impl Occupancy {
    pub fn counts(&self) -> &[usize; SWARA_COUNT] {
        &self.counts
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, swara: SwaraIndex) -> usize {
        self.counts[swara.get()]
    }

    /// Swaras whose share of the samples is strictly greater than `threshold`
    pub fn present(&self, threshold: f64) -> SwaraSet {
        if self.total == 0 {
            return SwaraSet::empty();
        }
        let total = self.total as f64;
        SwaraIndex::all()
            .filter(|&s| self.count(s) as f64 / total > threshold)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEVEN: [f64; 7] = [0.0, 200.0, 400.0, 500.0, 700.0, 900.0, 1100.0];

    fn idx(i: usize) -> SwaraIndex {
        SwaraIndex::new(i).unwrap()
    }

    #[test]
    fn test_builtin_table_is_valid() {
        assert!(SwaraTable::new(&SWARA_CENTS).is_some());
        assert_eq!(CARNATIC_TABLE.len(), SWARA_NAMES.len());
    }

    #[test]
    fn test_invalid_tables() {
        assert!(SwaraTable::new(&[]).is_none());
        assert!(SwaraTable::new(&[100.0, 200.0]).is_none());
        assert!(SwaraTable::new(&[0.0, 300.0, 200.0]).is_none());
        assert!(SwaraTable::new(&[0.0, 1200.0]).is_none());
        assert!(SwaraTable::new(&[0.0; 13]).is_none());
    }

    #[test]
    fn test_exact_entries_map_to_themselves() {
        for (i, &c) in SWARA_CENTS.iter().enumerate() {
            assert_eq!(CARNATIC_TABLE.nearest(c), idx(i));
        }
    }

    #[test]
    fn test_midpoint_goes_to_lower_index() {
        let table = SwaraTable::new(&SEVEN).unwrap();
        assert_eq!(table.nearest(100.0), idx(0));
        assert_eq!(table.nearest(450.0), idx(2));
        assert_eq!(table.nearest(100.001), idx(1));
    }

    #[test]
    fn test_no_wraparound_near_octave() {
        // 1190 cents sits next to the upper Sa but is measured against N3
        assert_eq!(CARNATIC_TABLE.nearest(1190.0), idx(11));
    }

    #[test]
    fn test_seven_swara_example() {
        let table = SwaraTable::new(&SEVEN).unwrap();
        let cents = [0.0, 0.0, 0.0, 200.0, 200.0, 400.0, 500.0, 700.0, 900.0, 1100.0];
        let present = table.quantize(&cents, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(present.to_indices(), vec![0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_threshold_is_strict() {
        // 100 samples: one R1 sample is exactly 1%, two is above
        let mut cents = vec![0.0; 99];
        cents.push(112.98);
        let present = CARNATIC_TABLE.quantize(&cents, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(present.to_indices(), vec![0]);

        let mut cents = vec![0.0; 98];
        cents.extend([112.98, 112.98]);
        let present = CARNATIC_TABLE.quantize(&cents, DEFAULT_OCCUPANCY_THRESHOLD);
        assert_eq!(present.to_indices(), vec![0, 1]);
    }

    #[test]
    fn test_quantize_is_deterministic() {
        let cents: Vec<f64> = (0..500).map(|i| (i as f64 * 37.3) % 1200.0).collect();
        let a = CARNATIC_TABLE.quantize(&cents, 0.01);
        let b = CARNATIC_TABLE.quantize(&cents, 0.01);
        assert_eq!(a, b);
    }

    #[test]
    fn test_occupancy_counts() {
        let occ = CARNATIC_TABLE.occupancy(&[0.0, 5.0, 700.0, 1110.0]);
        assert_eq!(occ.total(), 4);
        assert_eq!(occ.count(idx(0)), 2);
        assert_eq!(occ.count(idx(7)), 1);
        assert_eq!(occ.count(idx(11)), 1);
    }

    #[test]
    fn test_empty_trajectory_has_no_swaras() {
        assert!(CARNATIC_TABLE.quantize(&[], 0.01).is_empty());
    }

    #[test]
    fn test_names_line_up() {
        assert_eq!(swara_name(idx(0)), "Sa (0)");
        assert_eq!(swara_name(idx(7)), "Pa (7)");
        assert_eq!(swara_name(idx(11)), "N3 (11)");
    }
}
