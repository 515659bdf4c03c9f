//! Flash storage budget check

/// Data partition size of the target device
pub const DEFAULT_PARTITION_BYTES: u64 = 0x5F_0000;

/// Fraction of the partition left after filesystem overhead
pub const DEFAULT_USABLE_RATIO: f64 = 0.95;

/// How much flash the generated artifacts may occupy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StorageBudget {
    /// Raw partition size in bytes
    pub partition_bytes: u64,
    /// Share of the partition available for files
    pub usable_ratio: f64,
}

impl Default for StorageBudget {
    fn default() -> Self {
        Self {
            partition_bytes: DEFAULT_PARTITION_BYTES,
            usable_ratio: DEFAULT_USABLE_RATIO,
        }
    }
}

impl StorageBudget {
    /// Creates a budget for a partition of `partition_bytes`
    pub fn new(partition_bytes: u64) -> Self {
        Self {
            partition_bytes,
            ..Self::default()
        }
    }

    /// Bytes actually available for artifacts
    pub fn usable_bytes(&self) -> u64 {
        (self.partition_bytes as f64 * self.usable_ratio.clamp(0.0, 1.0)) as u64
    }

    /// Compares artifact sizes against the budget
    pub fn check(&self, video_bytes: u64, audio_bytes: u64) -> StorageReport {
        let report = StorageReport {
            video_bytes,
            audio_bytes,
            usable_bytes: self.usable_bytes(),
        };
        if !report.fits() {
            log::warn!(
                "artifacts take {} bytes, only {} usable",
                report.total_bytes(),
                report.usable_bytes
            );
        }
        report
    }
}

/// Outcome of a [`StorageBudget::check`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageReport {
    pub video_bytes: u64,
    pub audio_bytes: u64,
    pub usable_bytes: u64,
}

impl StorageReport {
    /// Combined size of all artifacts
    pub fn total_bytes(&self) -> u64 {
        self.video_bytes + self.audio_bytes
    }

    /// Whether everything fits in the usable space
    pub fn fits(&self) -> bool {
        self.total_bytes() <= self.usable_bytes
    }

    /// Bytes left over, negative when over budget
    pub fn headroom(&self) -> i64 {
        self.usable_bytes as i64 - self.total_bytes() as i64
    }
}
