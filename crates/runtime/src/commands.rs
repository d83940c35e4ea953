//! The user-facing command set.
//!
//! Six zero-argument commands cover everything the runtime can be told to do.
//! How they are presented is up to the host (a menu, a palette, a toolbar);
//! the runtime only fixes their identity and labels.

/// A user-invoked command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleDownscale,
    ToggleProportional,
    EnableCurrentDomain,
    DisableCurrentDomain,
    ListEnabledDomains,
    ClearEnabledDomains,
}

impl Command {
    /// Every command, in menu order.
    pub const ALL: [Self; 6] = [
        Self::ToggleDownscale,
        Self::ToggleProportional,
        Self::EnableCurrentDomain,
        Self::DisableCurrentDomain,
        Self::ListEnabledDomains,
        Self::ClearEnabledDomains,
    ];

    /// The label a host displays for this command.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ToggleDownscale => "Toggle Downscale (blue) highlight",
            Self::ToggleProportional => "Toggle Proportional (green) highlight",
            Self::EnableCurrentDomain => "Enable for this domain",
            Self::DisableCurrentDomain => "Disable for this domain",
            Self::ListEnabledDomains => "List enabled domains",
            Self::ClearEnabledDomains => "Clear enabled domains",
        }
    }
}

/// What a command produced beyond its store/session side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Done,
    /// The enabled-domain list, for [`Command::ListEnabledDomains`].
    Domains(Vec<String>),
}

/// Host surface the commands are registered against.
pub trait MenuSurface {
    fn register(&mut self, command: Command);
}

/// Register the full command set, in order. Commands are available regardless
/// of whether the current domain is enabled.
pub fn register_menu(surface: &mut dyn MenuSurface) {
    for command in Command::ALL {
        surface.register(command);
    }
}
