//! Probe command table
//!
//! Registration with the host's command dispatcher is thin glue and
//! happens outside the core; the core just owns the names, help text,
//! and the mapping back from a name.

/// Commands exposed by the probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProbeCommand {
    /// Start a vibration probe run
    Vibrate,
    /// Request cancellation of a running probe
    StopVibrate,
}

impl ProbeCommand {
    /// All commands, in registration order
    pub const ALL: [ProbeCommand; 2] = [ProbeCommand::Vibrate, ProbeCommand::StopVibrate];

    /// Command name as registered with the dispatcher
    pub const fn name(self) -> &'static str {
        match self {
            ProbeCommand::Vibrate => "VIBRATE_EXTRUDER",
            ProbeCommand::StopVibrate => "STOP_VIBRATE_EXTRUDER",
        }
    }

    /// Help text shown by the dispatcher
    pub const fn help(self) -> &'static str {
        match self {
            ProbeCommand::Vibrate => {
                "Vibrate the extruder with the frequency set in the config"
            }
            ProbeCommand::StopVibrate => "Stop vibrating the extruder",
        }
    }

    /// Look a command up by its registered name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|cmd| cmd.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_round_trip() {
        for cmd in ProbeCommand::ALL {
            assert_eq!(ProbeCommand::from_name(cmd.name()), Some(cmd));
        }
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(ProbeCommand::from_name("HOME_ALL"), None);
    }
}
