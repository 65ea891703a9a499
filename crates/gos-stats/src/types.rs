/// Visitor and conversion counts for one arm of an experiment.
///
/// Invariant (caller-owned): `conversions <= visitors`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct VariantObservation {
    pub visitors: u64,
    pub conversions: u64,
}

impl VariantObservation {
    pub fn new(visitors: u64, conversions: u64) -> Self {
        Self {
            visitors,
            conversions,
        }
    }

    /// Conversion rate as a proportion in `[0, 1]`. Zero visitors => 0.
    pub fn proportion(&self) -> f64 {
        if self.visitors == 0 {
            0.0
        } else {
            self.conversions as f64 / self.visitors as f64
        }
    }

    /// Conversion rate as a percentage in `[0, 100]`. Zero visitors => 0.
    pub fn conversion_rate(&self) -> f64 {
        self.proportion() * 100.0
    }

    pub fn is_consistent(&self) -> bool {
        self.conversions <= self.visitors
    }
}

/// Control (A) and treatment (B) observations compared by one test.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ComparisonPair {
    pub control: VariantObservation,
    pub treatment: VariantObservation,
}

impl ComparisonPair {
    pub fn new(control: VariantObservation, treatment: VariantObservation) -> Self {
        Self { control, treatment }
    }

    /// Confidence (percent) that the two arms differ.
    pub fn confidence(&self) -> f64 {
        crate::compute_confidence(
            self.control.visitors,
            self.control.conversions,
            self.treatment.visitors,
            self.treatment.conversions,
        )
    }

    /// Uplift (percent) of the treatment rate over the control rate.
    pub fn uplift(&self) -> f64 {
        crate::compute_uplift(
            self.control.conversion_rate(),
            self.treatment.conversion_rate(),
        )
    }

    /// Same pair with the arms swapped.
    pub fn swapped(&self) -> Self {
        Self {
            control: self.treatment,
            treatment: self.control,
        }
    }
}
