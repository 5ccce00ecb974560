//! Audit log CLI command

use crate::auth::{authorize, Action, Role};
use crate::display::format_audit_entries;
use crate::error::StayResult;
use crate::storage::Storage;

/// Print the most recent `limit` audit entries
pub fn handle_audit_command(storage: &Storage, role: Role, limit: usize) -> StayResult<()> {
    authorize(role, Action::ViewAudit)?;
    let entries = storage.audit().read_recent(limit)?;
    print!("{}", format_audit_entries(&entries));
    Ok(())
}
