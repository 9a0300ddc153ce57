//! Transfer identifiers for damaged and picked goods

use crate::types::Clock;

pub const DAMAGED_TRANSFER_PREFIX: &str = "TFR-D";
pub const PICKED_TRANSFER_PREFIX: &str = "TFR-P";

/// Issues `PREFIX-NNNNNN` identifiers within one workflow cycle.
///
/// `NNNNNN` is the last six digits of the clock reading offset by the number
/// of ids already issued this cycle, so two ids read at the same instant still
/// differ.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferIdGenerator {
    issued: u32,
}

impl TransferIdGenerator {
    pub fn generate(&mut self, prefix: &str, clock: &impl Clock) -> String {
        let stamp = clock.now_millis().saturating_add(i64::from(self.issued));
        self.issued += 1;
        format!("{}-{:06}", prefix, stamp.rem_euclid(1_000_000))
    }

    /// Start a new cycle
    pub fn reset(&mut self) {
        self.issued = 0;
    }
}
