//! One-time setup of the member role and the two classification tags.

use std::sync::Arc;

use coopmember_auth::{RoleStore, ensure_role};
use coopmember_catalog::{TagStore, ensure_tag};
use coopmember_core::{Provisioned, RuleError, RuleResult};

use crate::{MembershipConfig, log_rule_error};

/// Per-resource results of one [`Provisioner::run`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningReport {
    pub role: RuleResult<Provisioned>,
    pub membership_tag: RuleResult<Provisioned>,
    pub discount_tag: RuleResult<Provisioned>,
}

impl ProvisioningReport {
    /// Every resource exists after the run (created now or before).
    pub fn is_complete(&self) -> bool {
        self.role.is_ok() && self.membership_tag.is_ok() && self.discount_tag.is_ok()
    }

    /// First failure, in provisioning order.
    pub fn first_error(&self) -> Option<&RuleError> {
        [&self.role, &self.membership_tag, &self.discount_tag]
            .into_iter()
            .find_map(|result| result.as_ref().err())
    }

    /// `Ok` when complete, else the first failure.
    pub fn into_result(self) -> RuleResult<()> {
        self.role?;
        self.membership_tag?;
        self.discount_tag?;
        Ok(())
    }
}

/// Ensures the member role, the membership tag and the discount tag exist.
///
/// Idempotent; a failure on one resource is logged and the others are still
/// attempted. The rules treat a missing tag or role as "nothing matches".
pub struct Provisioner {
    config: Arc<MembershipConfig>,
    tags: Arc<dyn TagStore>,
    roles: Arc<dyn RoleStore>,
}

impl Provisioner {
    /// Fails with [`RuleError::Config`] when `config` does not validate.
    pub fn new(
        config: Arc<MembershipConfig>,
        tags: Arc<dyn TagStore>,
        roles: Arc<dyn RoleStore>,
    ) -> RuleResult<Self> {
        config.validate()?;
        Ok(Self { config, tags, roles })
    }

    pub fn run(&self) -> ProvisioningReport {
        let role = ensure_role(self.roles.as_ref(), &self.config.member_role)
            .inspect_err(|e| log_rule_error(e, "member role provisioning failed"));
        let membership_tag = ensure_tag(self.tags.as_ref(), &self.config.membership_tag)
            .inspect_err(|e| log_rule_error(e, "membership tag provisioning failed"));
        let discount_tag = ensure_tag(self.tags.as_ref(), &self.config.discount_tag)
            .inspect_err(|e| log_rule_error(e, "discount tag provisioning failed"));

        let report = ProvisioningReport {
            role,
            membership_tag,
            discount_tag,
        };
        tracing::info!(complete = report.is_complete(), "membership provisioning finished");
        report
    }
}

#[cfg(test)]
mod tests {
    use coopmember_core::StoreError;
    use coopmember_infra::{InMemoryCatalog, InMemoryUserDirectory};

    use super::*;

    fn provisioner(
        catalog: &Arc<InMemoryCatalog>,
        directory: &Arc<InMemoryUserDirectory>,
    ) -> Provisioner {
        Provisioner::new(
            Arc::new(MembershipConfig::default()),
            catalog.clone(),
            directory.clone(),
        )
        .unwrap()
    }

    #[test]
    fn first_run_creates_everything() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let directory = Arc::new(InMemoryUserDirectory::new());

        let report = provisioner(&catalog, &directory).run();

        assert_eq!(report.role, Ok(Provisioned::Created));
        assert_eq!(report.membership_tag, Ok(Provisioned::Created));
        assert_eq!(report.discount_tag, Ok(Provisioned::Created));
        assert_eq!(catalog.tag_count(), 2);

        let config = MembershipConfig::default();
        let role = directory.role(&config.member_role.role).unwrap();
        assert_eq!(role.display_name, "Coop Member");
        assert!(role.capabilities.allows(&coopmember_auth::Capability::READ));
        let tag = catalog.tag(&config.discount_tag.slug).unwrap();
        assert_eq!(tag.name, "Coop Discount");
        assert!(!tag.description.is_empty());
    }

    #[test]
    fn second_run_is_a_no_op() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        let provisioner = provisioner(&catalog, &directory);

        provisioner.run().into_result().unwrap();
        let report = provisioner.run();

        assert!(report.is_complete());
        assert_eq!(report.membership_tag, Ok(Provisioned::AlreadyExists));
        assert_eq!(report.discount_tag, Ok(Provisioned::AlreadyExists));
        assert_eq!(report.role, Ok(Provisioned::AlreadyExists));
        assert_eq!(catalog.tag_count(), 2);
    }

    #[test]
    fn tag_failure_does_not_block_the_role() {
        let catalog = Arc::new(InMemoryCatalog::new());
        let directory = Arc::new(InMemoryUserDirectory::new());
        catalog.failures().set_fail_writes(true);

        let report = provisioner(&catalog, &directory).run();

        assert!(!report.is_complete());
        assert_eq!(report.role, Ok(Provisioned::Created));
        assert!(matches!(
            report.membership_tag,
            Err(RuleError::ExternalStore(StoreError::Rejected(_)))
        ));
        assert!(report.discount_tag.is_err());
        assert!(report.first_error().is_some());
        assert_eq!(catalog.tag_count(), 0);
    }
}
