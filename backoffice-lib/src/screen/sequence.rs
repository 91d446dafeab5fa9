//! Request sequencing for overlapping fetches

/// Numbers fetches and decides which responses may still be applied.
///
/// Ids increase monotonically. Only the response to the newest request is
/// applied; a response to any older request is stale and dropped, even if
/// it arrives first. Failed responses go through the same check, so a late
/// failure of an old request never shows an error over newer data.
///
/// # Example
///
/// ```
/// use backoffice_lib::screen::RequestSequencer;
///
/// let mut seq = RequestSequencer::new();
/// let first = seq.issue();
/// let second = seq.issue();
///
/// assert!(!seq.try_apply(first));
/// assert!(seq.try_apply(second));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestSequencer {
    issued: u64,
    applied: u64,
    in_flight: usize,
}

impl RequestSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a request and returns its id.
    pub fn issue(&mut self) -> u64 {
        self.issued += 1;
        self.in_flight += 1;
        self.issued
    }

    /// Marks a response as arrived and returns `true` if it answers the
    /// newest request and may be applied.
    pub fn try_apply(&mut self, id: u64) -> bool {
        self.in_flight = self.in_flight.saturating_sub(1);
        if id == self.issued && id > self.applied {
            self.applied = id;
            true
        } else {
            false
        }
    }

    /// Id of the newest request issued.
    pub fn latest(&self) -> u64 {
        self.issued
    }

    /// Id of the last response applied.
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Returns `true` while any request awaits its response.
    pub fn is_loading(&self) -> bool {
        self.in_flight > 0
    }
}
