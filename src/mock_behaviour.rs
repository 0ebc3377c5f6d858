//! This module provides ways to tweak a mocked server, so that it can return errors on some tests
#![cfg(feature = "mock_server")]

use std::error::Error;

/// This stores some behaviour tweaks, that describe how a mocked server will behave during a given test
///
/// So that a function fails _n_ times after _m_ initial successes, set `(m, n)` for the suited parameter
#[derive(Default, Clone, Debug)]
pub struct MockBehaviour {
    /// If this is true, every action will be allowed
    pub is_suspended: bool,

    pub get_tasks_behaviour: (u32, u32),
    pub modify_task_behaviour: (u32, u32),
    pub create_section_behaviour: (u32, u32),
    pub delete_section_behaviour: (u32, u32),
    pub rename_section_behaviour: (u32, u32),
    pub get_events_behaviour: (u32, u32),
    pub get_settings_behaviour: (u32, u32),
}

impl MockBehaviour {
    pub fn new() -> Self {
        Self::default()
    }

    /// All operations will fail at once, for `n_fails` times
    pub fn fail_now(n_fails: u32) -> Self {
        Self {
            is_suspended: false,
            get_tasks_behaviour: (0, n_fails),
            modify_task_behaviour: (0, n_fails),
            create_section_behaviour: (0, n_fails),
            delete_section_behaviour: (0, n_fails),
            rename_section_behaviour: (0, n_fails),
            get_events_behaviour: (0, n_fails),
            get_settings_behaviour: (0, n_fails),
        }
    }

    /// Suspend this mock behaviour until you call `resume`
    pub fn suspend(&mut self) {
        self.is_suspended = true;
    }
    /// Make this behaviour active again
    pub fn resume(&mut self) {
        self.is_suspended = false;
    }

    pub fn can_get_tasks(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_tasks_behaviour, "get_tasks")
    }
    pub fn can_modify_task(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.modify_task_behaviour, "modify_task")
    }
    pub fn can_create_section(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.create_section_behaviour, "create_section")
    }
    pub fn can_delete_section(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.delete_section_behaviour, "delete_section")
    }
    pub fn can_rename_section(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.rename_section_behaviour, "rename_section")
    }
    pub fn can_get_events(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_events_behaviour, "get_events")
    }
    pub fn can_get_settings(&mut self) -> Result<(), Box<dyn Error>> {
        if self.is_suspended { return Ok(()) }
        decrement(&mut self.get_settings_behaviour, "get_settings")
    }
}

/// Return Ok(()) in case the value is `(1+, _)` or `(_, 0)`, or return Err and decrement otherwise
fn decrement(value: &mut (u32, u32), descr: &str) -> Result<(), Box<dyn Error>> {
    let remaining_successes = value.0;
    let remaining_failures = value.1;

    if remaining_successes > 0 {
        value.0 = value.0 - 1;
        log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
        Ok(())
    } else {
        if remaining_failures > 0 {
            value.1 = value.1 - 1;
            log::debug!("Mock behaviour: failing a {} ({:?})", descr, value);
            Err(format!("Mocked behaviour requires this {} to fail this time. ({:?})", descr, value).into())
        } else {
            log::debug!("Mock behaviour: allowing a {} ({:?})", descr, value);
            Ok(())
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mock_behaviour() {
        let mut ok = MockBehaviour::new();
        assert!(ok.can_get_tasks().is_ok());
        assert!(ok.can_get_tasks().is_ok());
        assert!(ok.can_modify_task().is_ok());
        assert!(ok.can_modify_task().is_ok());

        let mut now = MockBehaviour::fail_now(2);
        assert!(now.can_get_tasks().is_err());
        assert!(now.can_modify_task().is_err());
        assert!(now.can_modify_task().is_err());
        assert!(now.can_get_tasks().is_err());
        assert!(now.can_get_tasks().is_ok());
        assert!(now.can_modify_task().is_ok());

        let mut custom = MockBehaviour {
            get_tasks_behaviour: (0, 1),
            modify_task_behaviour: (1, 3),
            ..MockBehaviour::default()
        };
        assert!(custom.can_get_tasks().is_err());
        assert!(custom.can_get_tasks().is_ok());
        assert!(custom.can_modify_task().is_ok());
        assert!(custom.can_modify_task().is_err());
        assert!(custom.can_modify_task().is_err());
        assert!(custom.can_modify_task().is_err());
        assert!(custom.can_modify_task().is_ok());
    }
}
