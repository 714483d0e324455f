//! Membership rule configuration.
//!
//! One immutable value, built at startup and shared (`Arc`) by every rule.
//! Sources, lowest precedence first: built-in defaults, a JSON document,
//! `COOPMEMBER_*` environment overrides.
//!
//! The `with_*` builders do not validate. Every rule constructor calls
//! [`MembershipConfig::validate`] and refuses an invalid config.

use serde::{Deserialize, Serialize};

use coopmember_auth::{Capabilities, Role, RoleDefinition};
use coopmember_catalog::{Tag, TagSlug};
use coopmember_core::{DiscountFraction, RuleError, RuleResult};

pub const ENV_DISCOUNT_PERCENT: &str = "COOPMEMBER_DISCOUNT_PERCENT";
pub const ENV_ROLE_ID: &str = "COOPMEMBER_ROLE_ID";
pub const ENV_ROLE_NAME: &str = "COOPMEMBER_ROLE_NAME";
pub const ENV_MEMBERSHIP_TAG: &str = "COOPMEMBER_MEMBERSHIP_TAG";
pub const ENV_DISCOUNT_TAG: &str = "COOPMEMBER_DISCOUNT_TAG";
pub const ENV_REENTRANCY_LIMIT: &str = "COOPMEMBER_REENTRANCY_LIMIT";

const MEMBERSHIP_TAG_DESCRIPTION: &str = "Products with this tag grant the buyer a cooperative \
     membership when an order containing them is completed.";
const DISCOUNT_TAG_DESCRIPTION: &str = "Products with this tag are sold to cooperative members \
     at the member discount.";

/// Settings shared by the provisioning step and both rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MembershipConfig {
    /// The role granted on membership purchase and checked for the discount.
    pub member_role: RoleDefinition,
    /// Tag marking products whose purchase grants membership.
    pub membership_tag: Tag,
    /// Tag marking products members buy at a discount.
    pub discount_tag: Tag,
    /// Fraction taken off the regular price (`0.10` = 10 %).
    pub discount: DiscountFraction,
    /// Invocation ordinal, within one recalculation pass, from which the
    /// discount hook stops pricing. The host fires the hook more than once per
    /// cart computation; `2` means only the first firing prices the cart.
    pub reentrancy_limit: u32,
}

impl Default for MembershipConfig {
    fn default() -> Self {
        Self {
            member_role: RoleDefinition::new(
                Role::new("coop_member"),
                "Coop Member",
                Capabilities::read_only(),
            ),
            membership_tag: Tag::new(
                TagSlug::from_static("coop-membership"),
                "Coop Membership",
                MEMBERSHIP_TAG_DESCRIPTION,
            ),
            discount_tag: Tag::new(
                TagSlug::from_static("coop-discount"),
                "Coop Discount",
                DISCOUNT_TAG_DESCRIPTION,
            ),
            discount: DiscountFraction::default(),
            reentrancy_limit: 2,
        }
    }
}

impl MembershipConfig {
    pub fn with_member_role(mut self, definition: RoleDefinition) -> Self {
        self.member_role = definition;
        self
    }

    pub fn with_membership_tag(mut self, tag: Tag) -> Self {
        self.membership_tag = tag;
        self
    }

    pub fn with_discount_tag(mut self, tag: Tag) -> Self {
        self.discount_tag = tag;
        self
    }

    pub fn with_discount(mut self, discount: DiscountFraction) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_reentrancy_limit(mut self, limit: u32) -> Self {
        self.reentrancy_limit = limit;
        self
    }

    /// Parse a JSON document; missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> RuleResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| RuleError::config(format!("membership config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `COOPMEMBER_*` environment variables.
    pub fn from_env() -> RuleResult<Self> {
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (environment-shaped keys), then validate.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> RuleResult<Self> {
        if let Some(raw) = lookup(ENV_DISCOUNT_PERCENT) {
            let percent = raw.trim().parse::<u32>().map_err(|e| {
                RuleError::config(format!("{ENV_DISCOUNT_PERCENT}='{raw}': {e}"))
            })?;
            self.discount = DiscountFraction::from_percent(percent)?;
        }
        if let Some(raw) = lookup(ENV_ROLE_ID) {
            self.member_role.role = Role::new(raw.trim().to_string());
        }
        if let Some(raw) = lookup(ENV_ROLE_NAME) {
            self.member_role.display_name = raw;
        }
        if let Some(raw) = lookup(ENV_MEMBERSHIP_TAG) {
            self.membership_tag.slug = TagSlug::parse(raw.trim())?;
        }
        if let Some(raw) = lookup(ENV_DISCOUNT_TAG) {
            self.discount_tag.slug = TagSlug::parse(raw.trim())?;
        }
        if let Some(raw) = lookup(ENV_REENTRANCY_LIMIT) {
            self.reentrancy_limit = raw.trim().parse::<u32>().map_err(|e| {
                RuleError::config(format!("{ENV_REENTRANCY_LIMIT}='{raw}': {e}"))
            })?;
        }

        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> RuleResult<()> {
        if self.member_role.role.as_str().trim().is_empty() {
            return Err(RuleError::config("member role id cannot be empty"));
        }
        if self.membership_tag.slug == self.discount_tag.slug {
            return Err(RuleError::config(format!(
                "membership and discount tags must differ (both are '{}')",
                self.membership_tag.slug
            )));
        }
        if self.reentrancy_limit < 2 {
            return Err(RuleError::config(format!(
                "reentrancy_limit must be at least 2 (got {})",
                self.reentrancy_limit
            )));
        }
        Ok(())
    }
}
