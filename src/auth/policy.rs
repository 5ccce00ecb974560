//! Authorization policy: `(role, action) -> allow/deny`

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{StayError, StayResult};

/// Role of the acting user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Staff,
    Viewer,
}

impl Role {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "staff" => Some(Self::Staff),
            "viewer" => Some(Self::Viewer),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Staff => write!(f, "staff"),
            Self::Viewer => write!(f, "viewer"),
        }
    }
}

/// Something a caller wants to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Read any record or report
    View,
    /// Create, edit or delete properties and units
    ManageProperties,
    CreateBooking,
    UpdateBooking,
    DeleteBooking,
    ManageGuests,
    ManageExpenses,
    /// Run the recurring expense generator
    GenerateExpenses,
    ManageInquiries,
    ViewAudit,
    Export,
}

impl Action {
    pub fn is_mutation(&self) -> bool {
        !matches!(self, Self::View | Self::ViewAudit | Self::Export)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::View => "view records",
            Self::ManageProperties => "manage properties and units",
            Self::CreateBooking => "create bookings",
            Self::UpdateBooking => "update bookings",
            Self::DeleteBooking => "delete bookings",
            Self::ManageGuests => "manage guests",
            Self::ManageExpenses => "manage expenses",
            Self::GenerateExpenses => "generate recurring expenses",
            Self::ManageInquiries => "manage inquiries",
            Self::ViewAudit => "view the audit log",
            Self::Export => "export data",
        };
        write!(f, "{}", text)
    }
}

/// Whether `role` may perform `action`
pub fn is_allowed(role: Role, action: Action) -> bool {
    match action {
        Action::View | Action::Export => true,
        Action::ManageProperties | Action::DeleteBooking | Action::ViewAudit => {
            role == Role::Admin
        }
        _ => role != Role::Viewer,
    }
}

/// Fail with [`StayError::Unauthorized`] unless `role` may perform `action`
pub fn authorize(role: Role, action: Action) -> StayResult<()> {
    if is_allowed(role, action) {
        Ok(())
    } else {
        tracing::warn!(%role, %action, "authorization denied");
        Err(StayError::Unauthorized {
            role: role.to_string(),
            action: action.to_string(),
        })
    }
}
