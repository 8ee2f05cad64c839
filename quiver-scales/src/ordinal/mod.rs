use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::QuiverScaleError;
use quiver_common::types::StyleColor;
use quiver_common::value::PropertyValue;

/// Position annotations recorded on the range by the `split*` generators.
///
/// `band` is the width of one band and `margin` the blank space between
/// adjacent bands; both are 0 for the point-style generators.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandLayout {
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub band: f32,
    pub margin: f32,
}

/// A discrete scale mapping domain values to range positions by index.
///
/// The domain keeps unique values in first-seen order; a value's index is its
/// position among those unique values. The range is either set explicitly or
/// generated over a continuous interval by one of the `split*` methods. When
/// the domain outgrows the range, indexing wraps around modulo the range
/// length rather than failing.
#[derive(Debug, Clone)]
pub struct OrdinalScale<D, R>
where
    D: Clone + Hash + Eq + Debug + 'static,
    R: Clone + Debug + 'static,
{
    domain: IndexSet<D>,
    range: Vec<R>,
    layout: Option<BandLayout>,
}

impl<D, R> Default for OrdinalScale<D, R>
where
    D: Clone + Hash + Eq + Debug + 'static,
    R: Clone + Debug + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<D, R> OrdinalScale<D, R>
where
    D: Clone + Hash + Eq + Debug + 'static,
    R: Clone + Debug + 'static,
{
    /// Creates an empty scale. Domain values may be seeded with `domain` or
    /// discovered on first use by `invoke`.
    pub fn new() -> Self {
        Self {
            domain: IndexSet::new(),
            range: Vec::new(),
            layout: None,
        }
    }

    /// Replaces the domain, deduplicating while preserving first-seen order.
    pub fn domain(mut self, values: impl IntoIterator<Item = D>) -> Self {
        self.domain = values.into_iter().collect();
        self
    }

    /// Replaces the domain with values extracted from `items`.
    pub fn domain_by<A>(self, items: &[A], accessor: impl Fn(&A) -> D) -> Self {
        self.domain(items.iter().map(accessor))
    }

    /// Sets the range to an explicit sequence of output values.
    pub fn range(mut self, values: impl IntoIterator<Item = R>) -> Self {
        self.range = values.into_iter().collect();
        self.layout = None;
        self
    }

    /// Sets the range to values extracted from `items`.
    pub fn range_by<A>(self, items: &[A], accessor: impl Fn(&A) -> R) -> Self {
        self.range(items.iter().map(accessor))
    }

    /// Returns the domain in first-seen order.
    pub fn get_domain(&self) -> Vec<D> {
        self.domain.iter().cloned().collect()
    }

    /// Returns the current range values.
    pub fn get_range(&self) -> &[R] {
        &self.range
    }

    /// Returns the annotations of the last `split*`, if any.
    pub fn get_layout(&self) -> Option<&BandLayout> {
        self.layout.as_ref()
    }

    /// Returns the index of a known domain value.
    pub fn index_of(&self, value: &D) -> Option<usize> {
        self.domain.get_index_of(value)
    }

    pub fn domain_len(&self) -> usize {
        self.domain.len()
    }

    /// Maps `value` to its range position, appending it to the domain first
    /// if it has not been seen before.
    ///
    /// Discovery is the documented mutation of this scale: repeated
    /// invocations with the same values are idempotent on the domain. The
    /// value is recorded even when the range is empty and `None` is returned.
    pub fn invoke(&mut self, value: &D) -> Option<R> {
        let index = match self.domain.get_index_of(value) {
            Some(index) => index,
            None => self.domain.insert_full(value.clone()).0,
        };
        self.range_at(index)
    }

    /// Pure variant of `invoke`: maps a value already in the domain and
    /// never mutates. Returns `None` for unknown values.
    pub fn lookup(&self, value: &D) -> Option<R> {
        self.domain
            .get_index_of(value)
            .and_then(|index| self.range_at(index))
    }

    fn range_at(&self, index: usize) -> Option<R> {
        if self.range.is_empty() {
            None
        } else {
            Some(self.range[index % self.range.len()].clone())
        }
    }

    /// Sets the range to the N interval midpoints of `[min, max]`, where N is
    /// the current domain length: `step = (max - min) / N`, first point at
    /// `min + step / 2`.
    pub fn split(mut self, min: f32, max: f32) -> Self
    where
        R: From<f32>,
    {
        let n = self.domain.len();
        if max == min {
            return self.collapsed(min, max, n);
        }
        let step = (max - min) / n as f32;
        self.range = (0..n)
            .map(|i| R::from(min + step / 2.0 + step * i as f32))
            .collect();
        self.layout = Some(BandLayout {
            min,
            max,
            step,
            band: 0.0,
            margin: 0.0,
        });
        self
    }

    /// Sets the range to N evenly spaced points with the first at `min` and
    /// the last at `max` (`step = (max - min) / (N - 1)`). A single-value
    /// domain gets the one point at the interval midpoint.
    pub fn split_flush(mut self, min: f32, max: f32) -> Self
    where
        R: From<f32>,
    {
        let n = self.domain.len();
        if max == min {
            return self.collapsed(min, max, n);
        }
        let step = (max - min) / (n as f32 - 1.0);
        self.range = if n == 1 {
            vec![R::from((min + max) / 2.0)]
        } else {
            (0..n).map(|i| R::from(min + step * i as f32)).collect()
        };
        self.layout = Some(BandLayout {
            min,
            max,
            step,
            band: 0.0,
            margin: 0.0,
        });
        self
    }

    /// Divides `[min, max]` into N bands with a leading margin before each.
    ///
    /// A `band` in `0..=1` is the fraction of each step occupied by the band
    /// (`step = (max - min) / (N + 1 - band)`). A negative `band` switches to
    /// fixed-width mode: every band is `-band` wide and the remaining space
    /// is split into N + 1 equal margins.
    pub fn split_banded(mut self, min: f32, max: f32, band: f32) -> Self
    where
        R: From<f32>,
    {
        let n = self.domain.len();
        if max == min {
            return self.collapsed(min, max, n);
        }
        if band < 0.0 {
            let band_width = -band;
            let total = band_width * n as f32;
            let margin = (max - min - total) / (n as f32 + 1.0);
            let step = band_width + margin;
            self.range = (0..n)
                .map(|i| R::from(min + margin + step * i as f32))
                .collect();
            self.layout = Some(BandLayout {
                min,
                max,
                step,
                band: band_width,
                margin,
            });
        } else {
            let step = (max - min) / (n as f32 + (1.0 - band));
            let band_width = step * band;
            self.range = (0..n)
                .map(|i| R::from(min + step * (1.0 - band) + step * i as f32))
                .collect();
            self.layout = Some(BandLayout {
                min,
                max,
                step,
                band: band_width,
                margin: step - band_width,
            });
        }
        self
    }

    /// Like `split_banded`, but the positions are the interval midpoints of
    /// `split` and bands are centered on them.
    pub fn split_banded_center(self, min: f32, max: f32, band: f32) -> Self
    where
        R: From<f32>,
    {
        let mut scale = self.split(min, max);
        if let Some(layout) = scale.layout.as_mut() {
            layout.band = layout.step * band;
            layout.margin = layout.step - layout.band;
        }
        scale
    }

    /// Centered bands with the first flush against `min` and the last flush
    /// against `max`: band width `B = (max - min) * band / N`, margin
    /// `M = (max - min - N * B) / (N - 1)` (0 when N is 1), positions start
    /// at `min + B / 2` and advance by `M + B`.
    pub fn split_banded_flush_center(mut self, min: f32, max: f32, band: f32) -> Self
    where
        R: From<f32>,
    {
        let n = self.domain.len();
        if max == min {
            return self.collapsed(min, max, n);
        }
        let span = max - min;
        let band_width = span * band / n as f32;
        let margin = if n > 1 {
            (span - n as f32 * band_width) / (n as f32 - 1.0)
        } else {
            0.0
        };
        let step = margin + band_width;
        self.range = (0..n)
            .map(|i| R::from(min + band_width / 2.0 + step * i as f32))
            .collect();
        self.layout = Some(BandLayout {
            min,
            max,
            step,
            band: band_width,
            margin,
        });
        self
    }

    // Zero-width interval: every position is min, repeated for the whole domain.
    fn collapsed(mut self, min: f32, max: f32, n: usize) -> Self
    where
        R: From<f32>,
    {
        self.range = (0..n).map(|_| R::from(min)).collect();
        self.layout = Some(BandLayout {
            min,
            max,
            step: 0.0,
            band: 0.0,
            margin: 0.0,
        });
        self
    }

    /// Maps a continuous position back to a fractional domain index, without
    /// rounding.
    ///
    /// Sentinels are in-band values for the caller to clamp against: -1 for
    /// an empty domain, 0 below the interval (or when the interval has zero
    /// width or was never split), and N at or above the interval's max.
    pub fn invert_index_raw(&self, y: f32) -> f32 {
        let n = self.domain.len();
        if n == 0 {
            return -1.0;
        }
        let Some(layout) = self.layout else {
            return 0.0;
        };
        let span = layout.max - layout.min;
        if span == 0.0 {
            return 0.0;
        }
        if y >= layout.max {
            return n as f32;
        }
        if y < layout.min {
            return 0.0;
        }
        (y - layout.min) / (span / n as f32)
    }

    /// `invert_index_raw` rounded to the nearest whole index. The sentinel
    /// values pass through unchanged.
    pub fn invert_index(&self, y: f32) -> f32 {
        self.invert_index_raw(y).round()
    }

    /// Wraps this scale in a shared single-threaded handle.
    pub fn shared(self) -> SharedOrdinalScale<D, R> {
        SharedOrdinalScale {
            scale: Rc::new(RefCell::new(self)),
        }
    }
}

impl<D> OrdinalScale<D, StyleColor>
where
    D: Clone + Hash + Eq + Debug + 'static,
{
    /// Sets the range to CSS color strings, normalized to RGBA.
    pub fn styles<S: AsRef<str>>(
        mut self,
        colors: impl IntoIterator<Item = S>,
    ) -> Result<Self, QuiverScaleError> {
        self.range = colors
            .into_iter()
            .map(|c| StyleColor::from_css(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        self.layout = None;
        Ok(self)
    }
}

/// A clonable handle for driving one scale from several property closures.
///
/// Single threaded by design: handles share the scale through `Rc<RefCell>`,
/// so discovery performed while one mark resolves is visible to the next.
#[derive(Debug, Clone)]
pub struct SharedOrdinalScale<D, R>
where
    D: Clone + Hash + Eq + Debug + 'static,
    R: Clone + Debug + 'static,
{
    scale: Rc<RefCell<OrdinalScale<D, R>>>,
}

impl<D, R> SharedOrdinalScale<D, R>
where
    D: Clone + Hash + Eq + Debug + 'static,
    R: Clone + Debug + 'static,
{
    pub fn invoke(&self, value: &D) -> Option<R> {
        self.scale.borrow_mut().invoke(value)
    }

    pub fn lookup(&self, value: &D) -> Option<R> {
        self.scale.borrow().lookup(value)
    }

    pub fn get_domain(&self) -> Vec<D> {
        self.scale.borrow().get_domain()
    }

    pub fn get_layout(&self) -> Option<BandLayout> {
        self.scale.borrow().layout
    }

    /// Hands the inner scale back out, if this is the last handle.
    pub fn unshare(self) -> Option<OrdinalScale<D, R>> {
        Rc::try_unwrap(self.scale).ok().map(RefCell::into_inner)
    }
}

impl<D> SharedOrdinalScale<D, f32>
where
    D: Clone + Hash + Eq + Debug + 'static,
{
    /// Bridges this scale into a mark property: the returned property invokes
    /// the scale on the accessor's value, so unseen values extend the domain
    /// as marks resolve. Positions the scale cannot produce come out as NaN.
    pub fn by<A>(&self, accessor: impl Fn(&A) -> D + 'static) -> PropertyValue<A, f32> {
        let scale = self.clone();
        PropertyValue::derived(move |datum: &A| {
            scale.invoke(&accessor(datum)).unwrap_or(f32::NAN)
        })
    }
}
