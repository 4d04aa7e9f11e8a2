//! Energy-mix percentage normalizer.
//!
//! A [`CategorySet`] holds one share per energy source. Moving one slider with
//! [`CategorySet::set_share`] hands the difference to the other unlocked
//! categories in proportion to their current weight, never below the floor
//! (`min_share`). A second pass corrects the total when floor clamping pushed it
//! away from 100.
//!
//! Constraint violations are reported as [`MixOutcome::Unchanged`] so a slider
//! can simply refuse to move; only an unknown category is an error.
//!
//! ### Example
//! ```
//! use energy_mix::mix::{CategorySet, MixConfig};
//! use energy_mix::models::Category;
//!
//! let mut mix = CategorySet::new(
//!     [
//!         (Category::Fossil, 40.0),
//!         (Category::Nuclear, 30.0),
//!         (Category::Renewable, 25.0),
//!         (Category::Hydro, 5.0),
//!     ],
//!     MixConfig::default(),
//! )?;
//! assert!(mix.set_share(Category::Fossil, 70.0)?.is_applied());
//! assert!((mix.share(Category::Nuclear)? - 15.0).abs() < 1e-9);
//! # Ok::<(), energy_mix::MixError>(())
//! ```

use crate::error::{MixError, MixResult};
use crate::models::{Category, FIVE_CATEGORIES};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Every distribution sums to this.
pub const TOTAL: f64 = 100.0;
pub const DEFAULT_MIN_SHARE: f64 = 0.1;
pub const DEFAULT_TOTAL_TOLERANCE: f64 = 1e-2;
pub const DEFAULT_CORRECTION_MARGIN: f64 = 0.1;

/// Shares of the Korea budget panel on first load (nuclear, fossil, renewable, hydro, other).
pub const KOREA_DEFAULT_SHARES: [f64; 5] = [6.0, 12.0, 71.0, 1.0, 10.0];

/// Normalizer settings, fixed when the set is built.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MixConfig {
    /// Floor every category keeps.
    pub min_share: f64,
    /// Ceiling on concurrently locked categories; `None` means one less than the category count.
    #[serde(default)]
    pub max_locked: Option<usize>,
    /// Distance from 100 that triggers the correction pass.
    #[serde(default = "default_tolerance")]
    pub total_tolerance: f64,
    /// Only categories above `min_share + correction_margin` absorb the correction.
    #[serde(default = "default_margin")]
    pub correction_margin: f64,
}

fn default_tolerance() -> f64 {
    DEFAULT_TOTAL_TOLERANCE
}

fn default_margin() -> f64 {
    DEFAULT_CORRECTION_MARGIN
}

impl Default for MixConfig {
    fn default() -> Self {
        Self {
            min_share: DEFAULT_MIN_SHARE,
            max_locked: None,
            total_tolerance: DEFAULT_TOTAL_TOLERANCE,
            correction_margin: DEFAULT_CORRECTION_MARGIN,
        }
    }
}

impl MixConfig {
    pub fn with_min_share(mut self, min_share: f64) -> Self {
        self.min_share = min_share;
        self
    }

    /// Lower the lock ceiling below the default of one less than the category count.
    ///
    /// `set_share` refuses to move any slider once `max_locked` other categories
    /// are locked, so a ceiling of `n` freezes the whole mix as soon as `n` locks
    /// are in use, and a ceiling of 0 freezes it from the start.
    pub fn with_max_locked(mut self, max_locked: usize) -> Self {
        self.max_locked = Some(max_locked);
        self
    }

    /// Check the settings against a set of `n` categories.
    fn validate(&self, n: usize) -> MixResult<()> {
        if !self.min_share.is_finite() || self.min_share <= 0.0 {
            return Err(MixError::InvalidConfig(format!(
                "min_share must be a positive number, got {}",
                self.min_share
            )));
        }
        // Two slots' worth keeps `[min_share, 100 - min_share]` a valid range.
        if self.min_share * n.max(2) as f64 >= TOTAL {
            return Err(MixError::InvalidConfig(format!(
                "min_share {} leaves no room for {} categories",
                self.min_share, n
            )));
        }
        if let Some(max) = self.max_locked
            && max >= n
        {
            return Err(MixError::InvalidConfig(format!(
                "max_locked must be below the category count ({}), got {}",
                n, max
            )));
        }
        if !self.total_tolerance.is_finite() || self.total_tolerance <= 0.0 {
            return Err(MixError::InvalidConfig(format!(
                "total_tolerance must be a positive number, got {}",
                self.total_tolerance
            )));
        }
        if !self.correction_margin.is_finite() || self.correction_margin < 0.0 {
            return Err(MixError::InvalidConfig(format!(
                "correction_margin must be non-negative, got {}",
                self.correction_margin
            )));
        }
        Ok(())
    }
}

/// One category's state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub category: Category,
    pub share: f64,
    #[serde(default)]
    pub locked: bool,
}

/// Result of a mutating call.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MixOutcome {
    Applied,
    Unchanged(NoOpReason),
}

impl MixOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, MixOutcome::Applied)
    }
}

/// Why a call left the set untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoOpReason {
    TargetLocked,
    LockCeiling,
    ExceedsMax { max_allowed: f64 },
    NotFinite,
    AlreadyInState,
}

impl fmt::Display for NoOpReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoOpReason::TargetLocked => write!(f, "category is locked"),
            NoOpReason::LockCeiling => write!(f, "lock limit reached"),
            NoOpReason::ExceedsMax { max_allowed } => {
                write!(f, "value exceeds the reachable maximum of {:.2}", max_allowed)
            }
            NoOpReason::NotFinite => write!(f, "value is not a finite number"),
            NoOpReason::AlreadyInState => write!(f, "lock state already set"),
        }
    }
}

/// Ordered set of categories with their shares and lock flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MixSnapshot")]
pub struct CategorySet {
    config: MixConfig,
    slots: Vec<Slot>,
}

/// Unvalidated wire form of a [`CategorySet`].
#[derive(Deserialize)]
struct MixSnapshot {
    #[serde(default)]
    config: MixConfig,
    slots: Vec<Slot>,
}

impl TryFrom<MixSnapshot> for CategorySet {
    type Error = MixError;

    fn try_from(raw: MixSnapshot) -> MixResult<Self> {
        let locked: Vec<Category> = raw
            .slots
            .iter()
            .filter(|s| s.locked)
            .map(|s| s.category)
            .collect();
        let mut set = CategorySet::new(
            raw.slots.iter().map(|s| (s.category, s.share)),
            raw.config,
        )?;
        for c in locked {
            if !set.set_locked(c, true)?.is_applied() {
                return Err(MixError::InvalidConfig(format!(
                    "too many locked categories (max {})",
                    set.max_locked()
                )));
            }
        }
        Ok(set)
    }
}

impl Default for CategorySet {
    /// The five-category Korea panel mix with the default config.
    fn default() -> Self {
        Self {
            config: MixConfig::default(),
            slots: FIVE_CATEGORIES
                .iter()
                .zip(KOREA_DEFAULT_SHARES)
                .map(|(&category, share)| Slot {
                    category,
                    share,
                    locked: false,
                })
                .collect(),
        }
    }
}

impl CategorySet {
    /// Build a set from `(category, share)` pairs in display order; all unlocked.
    ///
    /// The shares are expected to sum to 100 already. A distribution that does not
    /// is accepted with a warning, matching the slider panel which never validates
    /// its initial state.
    pub fn new(
        shares: impl IntoIterator<Item = (Category, f64)>,
        config: MixConfig,
    ) -> MixResult<Self> {
        let mut slots: Vec<Slot> = Vec::new();
        for (category, share) in shares {
            if slots.iter().any(|s| s.category == category) {
                return Err(MixError::DuplicateCategory(category));
            }
            if !share.is_finite() || share < 0.0 {
                return Err(MixError::InvalidShare {
                    category,
                    value: share,
                });
            }
            slots.push(Slot {
                category,
                share,
                locked: false,
            });
        }
        if slots.is_empty() {
            return Err(MixError::EmptySet);
        }
        config.validate(slots.len())?;

        let set = Self { config, slots };
        let total = set.total();
        if (total - TOTAL).abs() > config.total_tolerance {
            warn!("initial mix sums to {:.4}, not {}", total, TOTAL);
        }
        if let Some(low) = set.slots.iter().find(|s| s.share < config.min_share) {
            warn!(
                "initial share of {} ({}) is below the floor {}",
                low.category, low.share, config.min_share
            );
        }
        Ok(set)
    }

    /// Even split across `categories`.
    pub fn even(categories: &[Category], config: MixConfig) -> MixResult<Self> {
        let share = TOTAL / categories.len().max(1) as f64;
        Self::new(categories.iter().map(|&c| (c, share)), config)
    }

    pub fn config(&self) -> &MixConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.slots.iter().map(|s| s.category)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.slots.iter().any(|s| s.category == category)
    }

    /// Shares in display order.
    pub fn shares(&self) -> Vec<(Category, f64)> {
        self.slots.iter().map(|s| (s.category, s.share)).collect()
    }

    pub fn shares_map(&self) -> BTreeMap<Category, f64> {
        self.slots.iter().map(|s| (s.category, s.share)).collect()
    }

    pub fn share(&self, category: Category) -> MixResult<f64> {
        Ok(self.slots[self.index_of(category)?].share)
    }

    pub fn is_locked(&self, category: Category) -> MixResult<bool> {
        Ok(self.slots[self.index_of(category)?].locked)
    }

    pub fn locked_count(&self) -> usize {
        self.slots.iter().filter(|s| s.locked).count()
    }

    /// Effective ceiling on concurrently locked categories.
    pub fn max_locked(&self) -> usize {
        self.config
            .max_locked
            .unwrap_or(self.slots.len().saturating_sub(1))
    }

    pub fn total(&self) -> f64 {
        self.slots.iter().map(|s| s.share).sum()
    }

    /// Whether `category` could be locked right now.
    pub fn can_lock(&self, category: Category) -> MixResult<bool> {
        let idx = self.index_of(category)?;
        Ok(self.slots[idx].locked || self.locked_count() < self.max_locked())
    }

    /// Highest value `set_share` accepts for `category` in the current state.
    pub fn max_allowed(&self, category: Category) -> MixResult<f64> {
        Ok(self.max_allowed_at(self.index_of(category)?))
    }

    /// Move `target` to `requested` and rebalance the unlocked others.
    ///
    /// Leaves the set untouched when the target is locked, when the lock ceiling
    /// is reached, or when `requested` is above [`CategorySet::max_allowed`].
    /// Values below the floor are raised to it.
    ///
    /// The total ends within `total_tolerance` of 100 unless every category able to
    /// absorb the correction is already near the floor; callers compare with a
    /// tolerance.
    pub fn set_share(&mut self, target: Category, requested: f64) -> MixResult<MixOutcome> {
        let idx = self.index_of(target)?;
        if self.slots[idx].locked {
            debug!("set_share({}): target is locked", target);
            return Ok(MixOutcome::Unchanged(NoOpReason::TargetLocked));
        }
        let locked_others = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, s)| *i != idx && s.locked)
            .count();
        if locked_others >= self.max_locked() {
            debug!("set_share({}): {} categories locked", target, locked_others);
            return Ok(MixOutcome::Unchanged(NoOpReason::LockCeiling));
        }
        if !requested.is_finite() {
            return Ok(MixOutcome::Unchanged(NoOpReason::NotFinite));
        }
        let max_allowed = self.max_allowed_at(idx);
        if requested > max_allowed {
            debug!(
                "set_share({}, {}): above reachable maximum {:.4}",
                target, requested, max_allowed
            );
            return Ok(MixOutcome::Unchanged(NoOpReason::ExceedsMax { max_allowed }));
        }

        let min = self.config.min_share;
        let clamped = requested.clamp(min, max_allowed);
        self.slots[idx].share = clamped;

        let locked_total: f64 = self
            .slots
            .iter()
            .filter(|s| s.locked)
            .map(|s| s.share)
            .sum();
        let remaining = TOTAL - clamped - locked_total;
        let adjustable: Vec<usize> = (0..self.slots.len())
            .filter(|&i| i != idx && !self.slots[i].locked)
            .collect();
        if adjustable.is_empty() {
            return Ok(MixOutcome::Applied);
        }

        if remaining <= 0.0 {
            debug!(
                "set_share({}, {}): nothing left to distribute, pinning {} categories at the floor",
                target,
                clamped,
                adjustable.len()
            );
            for &i in &adjustable {
                self.slots[i].share = min;
            }
            return Ok(MixOutcome::Applied);
        }

        let previous: f64 = adjustable.iter().map(|&i| self.slots[i].share).sum();
        if previous > 0.0 {
            for &i in &adjustable {
                let ratio = self.slots[i].share / previous;
                self.slots[i].share = (ratio * remaining).max(min);
            }
        } else {
            let even = remaining / adjustable.len() as f64;
            for &i in &adjustable {
                self.slots[i].share = even.max(min);
            }
        }

        self.correct_total(&adjustable);
        Ok(MixOutcome::Applied)
    }

    /// Lock or unlock `category`. Never touches shares.
    pub fn set_locked(&mut self, category: Category, locked: bool) -> MixResult<MixOutcome> {
        let idx = self.index_of(category)?;
        if self.slots[idx].locked == locked {
            return Ok(MixOutcome::Unchanged(NoOpReason::AlreadyInState));
        }
        if locked && self.locked_count() >= self.max_locked() {
            debug!(
                "set_locked({}): {} of {} locks in use",
                category,
                self.locked_count(),
                self.max_locked()
            );
            return Ok(MixOutcome::Unchanged(NoOpReason::LockCeiling));
        }
        self.slots[idx].locked = locked;
        Ok(MixOutcome::Applied)
    }

    fn index_of(&self, category: Category) -> MixResult<usize> {
        self.slots
            .iter()
            .position(|s| s.category == category)
            .ok_or_else(|| MixError::InvalidCategory(category.key().to_string()))
    }

    fn max_allowed_at(&self, idx: usize) -> f64 {
        let min = self.config.min_share;
        let (locked_total, other_unlocked) = self
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .fold((0.0, 0usize), |(total, n), (_, s)| {
                if s.locked {
                    (total + s.share, n)
                } else {
                    (total, n + 1)
                }
            });
        (TOTAL - locked_total - min * other_unlocked as f64).clamp(min, TOTAL - min)
    }

    /// Second pass: hand the gap left by floor clamping to the categories that
    /// still sit clear of the floor.
    fn correct_total(&mut self, adjustable: &[usize]) {
        let tolerance = self.config.total_tolerance;
        let actual = self.total();
        if (actual - TOTAL).abs() <= tolerance {
            return;
        }
        let min = self.config.min_share;
        let threshold = min + self.config.correction_margin;
        let diff = TOTAL - actual;
        let candidates: Vec<usize> = adjustable
            .iter()
            .copied()
            .filter(|&i| self.slots[i].share > threshold)
            .collect();
        let candidate_total: f64 = candidates.iter().map(|&i| self.slots[i].share).sum();
        if candidates.is_empty() || candidate_total <= 0.0 {
            debug!("mix total {:.4} left uncorrected: no category above {}", actual, threshold);
            return;
        }
        for &i in &candidates {
            let share = self.slots[i].share;
            self.slots[i].share = (share + share / candidate_total * diff).max(min);
        }
        let corrected = self.total();
        if (corrected - TOTAL).abs() > tolerance {
            debug!("mix total drifted to {:.4} after correction", corrected);
        }
    }
}
