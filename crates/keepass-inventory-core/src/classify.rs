// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 MuVeraAI Corporation

//! Entry classification by title prefix.

use crate::types::Role;

/// Decide what an entry title declares.
///
/// The title is trimmed and its first character selects the [`Role`]; the
/// rest, trimmed again, is the name.  Exactly one role is chosen per title.
/// Titles with any other first character are not inventory data and yield
/// `None`.  The returned name may be empty; callers report that.
///
/// # Examples
///
/// ```rust
/// use keepass_inventory_core::classify::classify;
/// use keepass_inventory_core::types::Role;
///
/// assert_eq!(classify("@web01"), Some((Role::Host, "web01")));
/// assert_eq!(classify("  :ntp "), Some((Role::GroupVars, "ntp")));
/// assert_eq!(classify("%dbservers"), Some((Role::SymbolicGroup, "dbservers")));
/// assert_eq!(classify("Gmail account"), None);
/// ```
pub fn classify(title: &str) -> Option<(Role, &str)> {
    let title = title.trim();
    let mut chars = title.chars();
    let role = match chars.next()? {
        '@' => Role::Host,
        ':' => Role::GroupVars,
        '%' => Role::SymbolicGroup,
        _ => return None,
    };
    Some((role, chars.as_str().trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_title() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("   "), None);
    }

    #[test]
    fn test_marker_only_yields_empty_name() {
        assert_eq!(classify("@"), Some((Role::Host, "")));
        assert_eq!(classify(": "), Some((Role::GroupVars, "")));
    }

    #[test]
    fn test_first_marker_wins() {
        // Only the leading character counts; later markers are part of the name.
        assert_eq!(classify("@:%mixed"), Some((Role::Host, ":%mixed")));
        assert_eq!(classify(":@vars"), Some((Role::GroupVars, "@vars")));
        assert_eq!(classify("%@link"), Some((Role::SymbolicGroup, "@link")));
    }

    #[test]
    fn test_marker_not_leading_is_ignored() {
        assert_eq!(classify("web@example.com"), None);
        assert_eq!(classify("#@host"), None);
    }

    #[test]
    fn test_role_markers() {
        for role in [Role::Host, Role::GroupVars, Role::SymbolicGroup] {
            let title = format!("{}name", role.marker());
            assert_eq!(classify(&title), Some((role, "name")));
        }
    }
}
