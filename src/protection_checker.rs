//! Branch protection checking for branch-sweep
//!
//! Removes branches that don't allow deletions from a candidate list.
//! Two mechanisms are consulted per branch: legacy branch protection and
//! the newer repository rules ("rulesets").

use tracing::{info, warn};

use crate::github::{Branch, GithubClient};

/// Why a branch was kept or dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BranchDisposition {
    /// Neither mechanism blocks deletion
    Deletable,
    /// Legacy branch protection exists and does not allow deletion
    ProtectedByLegacy,
    /// A branch rule blocks deletion
    ProtectedByRule { rule_type: String },
    /// Protection status could not be verified (treated as protected)
    Undetermined,
}

impl BranchDisposition {
    /// Deletion is permitted only for a verified-deletable branch
    pub fn is_deletable(&self) -> bool {
        matches!(self, Self::Deletable)
    }
}

/// Protection checker
pub struct ProtectionChecker<'a> {
    client: &'a GithubClient,
}

impl<'a> ProtectionChecker<'a> {
    pub fn new(client: &'a GithubClient) -> Self {
        Self { client }
    }

    /// Remove branches that don't allow deletions from the list
    ///
    /// Fully sequential: one branch at a time, two API calls per branch,
    /// then a single in-place removal pass. API failures are logged and
    /// never propagated; an unverifiable branch is dropped from the list.
    pub async fn retain_deletable(&self, branches: &mut Vec<Branch>) {
        // One verdict per entry, in order, so duplicate names stay independent
        let mut keep: Vec<bool> = Vec::with_capacity(branches.len());

        for branch in branches.iter() {
            let disposition = self.disposition(&branch.name).await;
            match &disposition {
                BranchDisposition::Deletable => {
                    info!(branch = %branch.name, "deletable");
                }
                BranchDisposition::ProtectedByLegacy => {
                    info!(branch = %branch.name, "protected by branch protection");
                }
                BranchDisposition::ProtectedByRule { rule_type } => {
                    info!(branch = %branch.name, rule = %rule_type, "protected by repository rule");
                }
                BranchDisposition::Undetermined => {
                    // warn already emitted with the underlying error
                }
            }
            keep.push(disposition.is_deletable());
        }

        let mut verdicts = keep.into_iter();
        branches.retain(|_| verdicts.next().unwrap_or(false));
    }

    /// Check both protection mechanisms for a single branch
    ///
    /// Not-found means the mechanism is absent and does not block. Any
    /// other failure yields `Undetermined`: a branch whose protection
    /// cannot be verified is never reported deletable.
    pub async fn disposition(&self, branch: &str) -> BranchDisposition {
        let protection = match self.client.branch_protection(branch).await {
            Ok(p) => p,
            Err(e) => {
                warn!(branch = %branch, error = %e, "failed to retrieve branch protection");
                return BranchDisposition::Undetermined;
            }
        };

        if let Some(protection) = protection {
            if !protection.allows_deletion() {
                return BranchDisposition::ProtectedByLegacy;
            }
        }

        let rules = match self.client.branch_rules(branch).await {
            Ok(r) => r.unwrap_or_default(),
            Err(e) => {
                warn!(branch = %branch, error = %e, "failed to retrieve branch rules");
                return BranchDisposition::Undetermined;
            }
        };

        if let Some(rule) = rules.iter().find(|r| r.blocks_deletion()) {
            return BranchDisposition::ProtectedByRule {
                rule_type: rule.rule_type.clone(),
            };
        }

        BranchDisposition::Deletable
    }
}
