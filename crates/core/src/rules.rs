//! Mapping rules shared by every backend: field visibility and wire numbering.

use std::collections::BTreeMap;

use typemux_common::{Field, Format};

use crate::error::GenerateError;

/// Whether `field` of `owner` is rendered for `format`.
///
/// `exclude` and `only` are mutually exclusive; setting both is fatal.
pub fn is_visible(owner: &str, field: &Field, format: Format) -> Result<bool, GenerateError> {
    if !field.exclude.is_empty() && !field.only.is_empty() {
        return Err(GenerateError::ConflictingVisibility {
            path: format!("{owner}.{}", field.name),
        });
    }
    if field.exclude.contains(&format) {
        return Ok(false);
    }
    Ok(field.only.is_empty() || field.only.contains(&format))
}

/// Declaration-order number assignment for one scope (a message or an enum).
///
/// Explicit numbers are claimed as they are met and move the cursor past
/// themselves. Each implicit member takes the cursor, stepping over numbers
/// already claimed. Claiming a number twice is a
/// [`GenerateError::FieldNumberCollision`].
#[derive(Debug, Clone)]
pub struct Numbering {
    owner: String,
    claimed: BTreeMap<u32, String>,
    cursor: u32,
}

impl Numbering {
    /// Numbering for the members of `owner`, starting implicit numbers at `first`.
    pub fn new(owner: impl Into<String>, first: u32) -> Self {
        Self {
            owner: owner.into(),
            claimed: BTreeMap::new(),
            cursor: first,
        }
    }

    /// Pre-claim `number` for a member the caller injects itself.
    pub fn reserve(&mut self, number: u32, claimant: impl Into<String>) {
        self.claimed.insert(number, claimant.into());
    }

    /// Claim the wire number of `member`, explicit or next in sequence.
    pub fn assign(&mut self, member: &str, explicit: Option<u32>) -> Result<u32, GenerateError> {
        let number = match explicit {
            Some(n) => {
                if let Some(claimed_by) = self.claimed.get(&n) {
                    return Err(GenerateError::FieldNumberCollision {
                        path: format!("{}.{member}", self.owner),
                        number: n,
                        claimed_by: claimed_by.clone(),
                    });
                }
                self.cursor = self.cursor.max(n.saturating_add(1));
                n
            }
            None => {
                while self.claimed.contains_key(&self.cursor) {
                    self.cursor += 1;
                }
                let n = self.cursor;
                self.cursor += 1;
                n
            }
        };
        self.claimed.insert(number, member.to_string());
        Ok(number)
    }
}
