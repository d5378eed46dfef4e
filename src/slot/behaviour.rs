//! Ways to make a [`MemorySlot`](super::MemorySlot) fail on purpose, so that error paths can be tested

use std::error::Error;

/// Describes how a slot will behave
///
/// So that a function fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct SlotBehaviour {
    pub read_behaviour: (u32, u32),
    pub write_behaviour: (u32, u32),
}

impl SlotBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            read_behaviour: (0, n_fails),
            write_behaviour: (0, n_fails),
        }
    }

    pub fn can_read(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.read_behaviour, "read")
    }
    pub fn can_write(&mut self) -> Result<(), Box<dyn Error>> {
        decrement(&mut self.write_behaviour, "write")
    }
}


/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 -= 1;
        log::debug!("Slot behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else if remaining_failures > 0 {
        value.1 -= 1;
        log::debug!("Slot behaviour: failing a {} ({:?})", descr, value);
        Err(format!("Slot behaviour requires this {} to fail this time. ({:?})", descr, value).into())
    } else {
        log::debug!("Slot behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_slot_behaviour() {
        let mut ok = SlotBehaviour::new();
        assert!(ok.can_read().is_ok());
        assert!(ok.can_write().is_ok());
        assert!(ok.can_write().is_ok());

        let mut now = SlotBehaviour::fail_now(2);
        assert!(now.can_read().is_err());
        assert!(now.can_write().is_err());
        assert!(now.can_write().is_err());
        assert!(now.can_read().is_err());
        assert!(now.can_read().is_ok());
        assert!(now.can_write().is_ok());

        let mut custom = SlotBehaviour {
            write_behaviour: (1, 2),
            ..SlotBehaviour::default()
        };
        assert!(custom.can_read().is_ok());
        assert!(custom.can_write().is_ok());
        assert!(custom.can_write().is_err());
        assert!(custom.can_write().is_err());
        assert!(custom.can_write().is_ok());
    }
}
