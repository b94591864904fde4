//! Status returned by behavior nodes.

/// The result of evaluating a behavior node within one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// The condition held, or the action committed a decision.
    Success,
    /// The condition did not hold, or the action had nothing to do.
    Failure,
}

impl Status {
    #[inline]
    pub fn from_bool(ok: bool) -> Self {
        if ok { Status::Success } else { Status::Failure }
    }

    #[inline]
    pub fn is_success(self) -> bool {
        matches!(self, Status::Success)
    }

    #[inline]
    pub fn is_failure(self) -> bool {
        matches!(self, Status::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_bool_maps_both_ways() {
        assert_eq!(Status::from_bool(true), Status::Success);
        assert!(Status::from_bool(false).is_failure());
    }
}
