//! Tab context-menu commands.

use std::fmt;
use std::str::FromStr;

use wbench_layout::{PaneId, SplitSide, TabId, TabRef};

/// A command applied to one tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TabCommand {
    Close,
    /// Close every unlocked tab in the pane except this one.
    CloseOthers,
    /// Open a second tab for the same document right after this one.
    Duplicate,
    ToggleLock,
    /// Move the tab into a new pane on `side`. A tab alone in its pane is
    /// duplicated into the new pane instead.
    Split(SplitSide),
}

impl TabCommand {
    /// Every command, in menu order.
    pub const ALL: [Self; 8] = [
        Self::Close,
        Self::CloseOthers,
        Self::Duplicate,
        Self::ToggleLock,
        Self::Split(SplitSide::Left),
        Self::Split(SplitSide::Right),
        Self::Split(SplitSide::Top),
        Self::Split(SplitSide::Bottom),
    ];

    /// Stable command name used by keybindings and menus.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Close => "tab.close",
            Self::CloseOthers => "tab.close_others",
            Self::Duplicate => "tab.duplicate",
            Self::ToggleLock => "tab.toggle_lock",
            Self::Split(SplitSide::Left) => "tab.split_left",
            Self::Split(SplitSide::Right) => "tab.split_right",
            Self::Split(SplitSide::Top) => "tab.split_up",
            Self::Split(SplitSide::Bottom) => "tab.split_down",
        }
    }
}

impl fmt::Display for TabCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unrecognised command name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown tab command {name:?}")]
pub struct UnknownCommand {
    pub name: String,
}

impl FromStr for TabCommand {
    type Err = UnknownCommand;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|command| command.name() == name)
            .ok_or_else(|| UnknownCommand {
                name: name.to_owned(),
            })
    }
}

/// What [`Workbench::execute`](crate::Workbench::execute) did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Closed { tab: TabRef, pane_id: PaneId },
    ClosedOthers { closed: Vec<TabRef> },
    Duplicated { tab_id: TabId, pane_id: PaneId },
    LockToggled { tab_id: TabId, locked: bool },
    Split { tab_id: TabId, split_id: PaneId, new_pane: PaneId },
    /// The command resolved to no change.
    Unchanged,
}
