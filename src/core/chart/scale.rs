//! Scales mapping data values onto SVG coordinates and colours

/// Continuous linear mapping from a data domain onto a pixel range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain: (f64, f64),
    range: (f64, f64),
}

impl LinearScale {
    /// Create a scale.
    ///
    /// The domain is sorted; a zero-width domain is widened (by 10% of its
    /// magnitude, or by 1 around zero) and a non-finite one becomes `0..1`,
    /// so [`map`](Self::map) always returns finite values.
    #[must_use]
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        let (mut lo, mut hi) = if domain.0 <= domain.1 {
            domain
        } else {
            (domain.1, domain.0)
        };
        if !lo.is_finite() || !hi.is_finite() {
            (lo, hi) = (0.0, 1.0);
        }
        if (hi - lo).abs() < f64::EPSILON {
            let pad = if lo.abs() > f64::EPSILON {
                lo.abs() * 0.1
            } else {
                1.0
            };
            lo -= pad;
            hi += pad;
        }
        Self {
            domain: (lo, hi),
            range,
        }
    }

    /// Data domain
    #[must_use]
    pub const fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Output range
    #[must_use]
    pub const fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Map a data value onto the range
    #[must_use]
    pub fn map(&self, value: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        r0 + (value - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Map a range position back onto the domain
    #[must_use]
    pub fn invert(&self, position: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if (r1 - r0).abs() < f64::EPSILON {
            return d0;
        }
        d0 + (position - r0) / (r1 - r0) * (d1 - d0)
    }

    /// Extend the domain outward to round tick values
    #[must_use]
    pub fn nice(self, count: usize) -> Self {
        let (mut lo, mut hi) = self.domain;
        for _ in 0..2 {
            let step = tick_step(lo, hi, count);
            if step <= 0.0 {
                break;
            }
            lo = (lo / step).floor() * step;
            hi = (hi / step).ceil() * step;
        }
        Self::new((lo, hi), self.range)
    }

    /// Roughly `count` round values spanning the domain
    #[must_use]
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (lo, hi) = self.domain;
        let step = tick_step(lo, hi, count);
        if step <= 0.0 {
            return vec![lo];
        }
        #[allow(clippy::cast_possible_truncation)]
        let (first, last) = ((lo / step).ceil() as i64, (hi / step).floor() as i64);
        // Round to the step's precision to drop float noise such as 0.30000000000000004
        let precision = 10f64.powi((-step.log10().floor()).max(0.0) as i32);
        #[allow(clippy::cast_precision_loss)]
        let ticks = (first..=last)
            .map(|i| (i as f64 * step * precision).round() / precision)
            .collect();
        ticks
    }
}

/// Tick spacing of 1, 2 or 5 times a power of ten
#[must_use]
pub fn tick_step(lo: f64, hi: f64, count: usize) -> f64 {
    let span = hi - lo;
    if !span.is_finite() || span <= 0.0 || count == 0 {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let raw = span / count as f64;
    let power = 10f64.powf(raw.log10().floor());
    let error = raw / power;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * power
}

/// Evenly spaced bands for categorical positions (bars)
#[derive(Debug, Clone, PartialEq)]
pub struct BandScale {
    keys: Vec<String>,
    range: (f64, f64),
    padding: f64,
}

impl BandScale {
    /// Create a band scale; `padding` is the fraction of each step left empty
    #[must_use]
    pub fn new(keys: Vec<String>, range: (f64, f64), padding: f64) -> Self {
        Self {
            keys,
            range,
            padding: padding.clamp(0.0, 0.95),
        }
    }

    /// Distance between the starts of neighbouring bands
    #[must_use]
    pub fn step(&self) -> f64 {
        if self.keys.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let n = self.keys.len() as f64;
        (self.range.1 - self.range.0) / n
    }

    /// Width of one band
    #[must_use]
    pub fn bandwidth(&self) -> f64 {
        self.step() * (1.0 - self.padding)
    }

    /// Start of the band at `index`
    #[must_use]
    pub fn position_at(&self, index: usize) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let i = index as f64;
        self.range.0 + self.step() * i + self.step() * self.padding / 2.0
    }

    /// Start of the band for `key`
    #[must_use]
    pub fn position(&self, key: &str) -> Option<f64> {
        self.keys
            .iter()
            .position(|k| k == key)
            .map(|idx| self.position_at(idx))
    }

    /// Keys in band order
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Maps values onto a discrete palette using ascending thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizeScale {
    thresholds: Vec<f64>,
    colors: Vec<&'static str>,
}

impl QuantizeScale {
    /// Equal-width bins over `domain`
    #[must_use]
    pub fn linear(domain: (f64, f64), colors: &[&'static str]) -> Self {
        let (lo, hi) = if domain.0 <= domain.1 {
            domain
        } else {
            (domain.1, domain.0)
        };
        let n = colors.len().max(1);
        #[allow(clippy::cast_precision_loss)]
        let thresholds = (1..n)
            .map(|i| lo + (hi - lo) * i as f64 / n as f64)
            .collect();
        Self {
            thresholds,
            colors: colors.to_vec(),
        }
    }

    /// Bins holding roughly equal numbers of the given values.
    ///
    /// Suited to heavy-tailed data such as national emissions, where equal
    /// width bins would leave most countries in the lightest colour.
    #[must_use]
    pub fn quantiles(values: impl IntoIterator<Item = f64>, colors: &[&'static str]) -> Self {
        let mut sorted: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        if sorted.is_empty() {
            return Self::linear((0.0, 1.0), colors);
        }
        let n = colors.len().max(1);
        #[allow(
            clippy::cast_precision_loss,
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss
        )]
        let thresholds = (1..n)
            .map(|i| {
                let pos = (sorted.len() - 1) as f64 * i as f64 / n as f64;
                let (below, above) = (pos.floor() as usize, pos.ceil() as usize);
                let frac = pos - pos.floor();
                sorted[below] + (sorted[above] - sorted[below]) * frac
            })
            .collect();
        Self {
            thresholds,
            colors: colors.to_vec(),
        }
    }

    /// Colour for `value`; `None` when the value is not finite or the palette is empty
    #[must_use]
    pub fn color(&self, value: f64) -> Option<&'static str> {
        if !value.is_finite() {
            return None;
        }
        let idx = self.thresholds.partition_point(|t| *t <= value);
        self.colors.get(idx.min(self.colors.len().saturating_sub(1))).copied()
    }

    /// Interior bin boundaries
    #[must_use]
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Palette in bin order
    #[must_use]
    pub fn colors(&self) -> &[&'static str] {
        &self.colors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_map_and_invert() {
        let s = LinearScale::new((0.0, 10.0), (0.0, 100.0));
        assert!((s.map(5.0) - 50.0).abs() < 1e-9);
        assert!((s.invert(25.0) - 2.5).abs() < 1e-9);

        let flipped = LinearScale::new((0.0, 10.0), (200.0, 0.0));
        assert!((flipped.map(10.0)).abs() < 1e-9);
        assert!((flipped.map(0.0) - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_domain_is_widened() {
        let s = LinearScale::new((5.0, 5.0), (0.0, 100.0));
        assert!(s.map(5.0).is_finite());
        assert!((s.map(5.0) - 50.0).abs() < 1e-9);

        let zero = LinearScale::new((0.0, 0.0), (0.0, 10.0));
        assert_eq!(zero.domain(), (-1.0, 1.0));

        let nan = LinearScale::new((f64::NAN, 3.0), (0.0, 10.0));
        assert_eq!(nan.domain(), (0.0, 1.0));
    }

    #[test]
    fn test_tick_step() {
        assert!((tick_step(0.0, 10.0, 5) - 2.0).abs() < 1e-12);
        assert!((tick_step(0.0, 1.0, 10) - 0.1).abs() < 1e-12);
        assert!((tick_step(0.0, 937.0, 5) - 200.0).abs() < 1e-9);
        assert!(tick_step(1.0, 1.0, 5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_nice_and_ticks() {
        let s = LinearScale::new((3.2, 97.5), (0.0, 1.0)).nice(5);
        assert_eq!(s.domain(), (0.0, 100.0));
        assert_eq!(s.ticks(5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn test_band_scale() {
        let keys = vec!["a".to_string(), "b".to_string(), "c".to_string(), "d".to_string()];
        let b = BandScale::new(keys, (0.0, 400.0), 0.2);
        assert!((b.step() - 100.0).abs() < 1e-9);
        assert!((b.bandwidth() - 80.0).abs() < 1e-9);
        assert!((b.position("b").unwrap() - 110.0).abs() < 1e-9);
        assert!(b.position("z").is_none());
    }

    #[test]
    fn test_quantize_linear() {
        let q = QuantizeScale::linear((0.0, 100.0), &["#a", "#b", "#c", "#d"]);
        assert_eq!(q.thresholds(), &[25.0, 50.0, 75.0]);
        assert_eq!(q.color(0.0), Some("#a"));
        assert_eq!(q.color(30.0), Some("#b"));
        assert_eq!(q.color(100.0), Some("#d"));
        assert_eq!(q.color(1000.0), Some("#d"));
        assert_eq!(q.color(f64::NAN), None);
    }

    #[test]
    fn test_quantize_quantiles() {
        let q = QuantizeScale::quantiles(vec![1.0, 2.0, 3.0, 4.0, 1000.0], &["#a", "#b"]);
        assert_eq!(q.thresholds(), &[3.0]);
        assert_eq!(q.color(2.0), Some("#a"));
        assert_eq!(q.color(4.0), Some("#b"));
    }
}
