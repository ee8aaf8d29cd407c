//! Categorical Buckets for Conditional Fields

/// Selector choice for a conditional field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    Low,
    Medium,
    High,
    /// Read the companion free-text field instead of a constant
    EnterManually,
}

impl Bucket {
    /// All selector choices, in menu order
    pub const ALL: [Bucket; 4] = [
        Bucket::Low,
        Bucket::Medium,
        Bucket::High,
        Bucket::EnterManually,
    ];

    /// Get the selector label
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Low => "Low",
            Bucket::Medium => "Medium",
            Bucket::High => "High",
            Bucket::EnterManually => "Enter Manually",
        }
    }

    /// Look up a selector by its exact label
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.as_str() == label)
    }
}

/// Constants substituted for the Low/Medium/High buckets of one field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BucketTable {
    pub low: f64,
    pub medium: f64,
    pub high: f64,
}

impl BucketTable {
    /// Constant for a bucket, `None` for [`Bucket::EnterManually`]
    pub fn value(&self, bucket: Bucket) -> Option<f64> {
        match bucket {
            Bucket::Low => Some(self.low),
            Bucket::Medium => Some(self.medium),
            Bucket::High => Some(self.high),
            Bucket::EnterManually => None,
        }
    }
}

/// Heart rate buckets (beats per minute)
///
/// Medium is the training-set mean and must stay verbatim.
pub const HEART_RATE_BUCKETS: BucketTable = BucketTable {
    low: 77.0,
    medium: 95.518533,
    high: 115.0,
};

/// Body temperature buckets (degrees Celsius)
///
/// Medium is the training-set mean and must stay verbatim.
pub const BODY_TEMPERATURE_BUCKETS: BucketTable = BucketTable {
    low: 37.5,
    medium: 40.025453,
    high: 41.5,
};
