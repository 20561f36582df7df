use std::cell::Cell;

/// Orders the responses of one state slot (list, form, file content)
///
/// Each request takes a ticket with [`begin`](Self::begin); its response may
/// only be applied if no newer ticket has been applied already, so a slow
/// response can never overwrite the result of a later request.
#[derive(Debug, Default)]
pub struct RequestSequence {
    issued: Cell<u64>,
    applied: Cell<u64>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> u64 {
        let ticket = self.issued.get() + 1;
        self.issued.set(ticket);
        ticket
    }

    /// Claim the slot for `ticket`; false when a newer response was applied
    pub fn try_apply(&self, ticket: u64) -> bool {
        if ticket <= self.applied.get() {
            return false;
        }
        self.applied.set(ticket);
        true
    }

    pub fn latest_issued(&self) -> u64 {
        self.issued.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_ticket_rejected() {
        let seq = RequestSequence::new();
        let first = seq.begin();
        let second = seq.begin();

        assert!(seq.try_apply(second));
        assert!(!seq.try_apply(first));
        assert_eq!(seq.latest_issued(), 2);
    }

    #[test]
    fn test_in_order_tickets_apply() {
        let seq = RequestSequence::new();
        let first = seq.begin();
        let second = seq.begin();

        assert!(seq.try_apply(first));
        assert!(seq.try_apply(second));
    }
}
