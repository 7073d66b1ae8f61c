//! Positional field names for Hyprland socket events
//!
//! Hyprland emits event data as comma separated values whose meaning depends
//! on the event type. This table gives each position a property name so that
//! rule conditions can address fields by name.

/// Event types with a known field layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    OpenWindow,
    CloseWindow,
    ActiveWindow,
    ActiveWindowV2,
    Workspace,
    WorkspaceV2,
    DestroyWorkspaceV2,
    WindowTitle,
    WindowTitleV2,
    ActiveLayout,
}

impl EventKind {
    /// Every known event type, in listing order
    pub const ALL: [EventKind; 10] = [
        EventKind::OpenWindow,
        EventKind::CloseWindow,
        EventKind::ActiveWindow,
        EventKind::ActiveWindowV2,
        EventKind::Workspace,
        EventKind::WorkspaceV2,
        EventKind::DestroyWorkspaceV2,
        EventKind::WindowTitle,
        EventKind::WindowTitleV2,
        EventKind::ActiveLayout,
    ];

    /// Look up an event type by its wire name (e.g. `openwindow`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "openwindow" => Some(Self::OpenWindow),
            "closewindow" => Some(Self::CloseWindow),
            "activewindow" => Some(Self::ActiveWindow),
            "activewindowv2" => Some(Self::ActiveWindowV2),
            "workspace" => Some(Self::Workspace),
            "workspacev2" => Some(Self::WorkspaceV2),
            "destroyworkspacev2" => Some(Self::DestroyWorkspaceV2),
            "windowtitle" => Some(Self::WindowTitle),
            "windowtitlev2" => Some(Self::WindowTitleV2),
            "activelayout" => Some(Self::ActiveLayout),
            _ => None,
        }
    }

    /// The wire name of this event type
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenWindow => "openwindow",
            Self::CloseWindow => "closewindow",
            Self::ActiveWindow => "activewindow",
            Self::ActiveWindowV2 => "activewindowv2",
            Self::Workspace => "workspace",
            Self::WorkspaceV2 => "workspacev2",
            Self::DestroyWorkspaceV2 => "destroyworkspacev2",
            Self::WindowTitle => "windowtitle",
            Self::WindowTitleV2 => "windowtitlev2",
            Self::ActiveLayout => "activelayout",
        }
    }

    /// Property names in the order they appear in the event data
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::OpenWindow | Self::CloseWindow => &["address", "workspace", "class", "title"],
            Self::ActiveWindow => &["class", "title"],
            Self::ActiveWindowV2 | Self::WindowTitle => &["address"],
            Self::Workspace => &["name"],
            Self::WorkspaceV2 | Self::DestroyWorkspaceV2 => &["name", "id"],
            Self::WindowTitleV2 => &["address", "title"],
            Self::ActiveLayout => &["keyboard", "layout"],
        }
    }

    /// Zero-based position of `property` in this event's data, if it has one
    pub fn field_index(self, property: &str) -> Option<usize> {
        self.fields().iter().position(|name| *name == property)
    }
}

/// Resolve `(event_type, property)` to a position in the event data.
///
/// Returns `None` when either the event type or the property is unknown.
pub fn field_index(event_type: &str, property: &str) -> Option<usize> {
    EventKind::from_name(event_type)?.field_index(property)
}
