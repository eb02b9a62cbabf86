//! Checkout step gating.
//!
//! Steps are strictly ordered: `SignIn → Shipping → Payment → PlaceOrder`.
//! Whether a step is enabled is derived from a [`CheckoutState`] snapshot and
//! never stored; callers rebuild the snapshot from persisted state on every
//! navigation so edits made elsewhere are always re-validated.

use serde::{Deserialize, Serialize};

/// One of the four checkout steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    SignIn,
    Shipping,
    Payment,
    PlaceOrder,
}

impl CheckoutStep {
    /// All steps in order.
    pub const ALL: [Self; 4] = [Self::SignIn, Self::Shipping, Self::Payment, Self::PlaceOrder];

    /// Page path for the step.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::SignIn => "/login",
            Self::Shipping => "/shipping",
            Self::Payment => "/payment",
            Self::PlaceOrder => "/placeorder",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::SignIn => "Sign In",
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::PlaceOrder => "Place Order",
        }
    }

    /// Step served at `path`, if any.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.path() == path)
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inputs the gating rules look at, read fresh from persistence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutState {
    /// A signed-in identity is present.
    pub authenticated: bool,
    /// A shipping address with a non-empty street line is persisted.
    pub has_shipping_address: bool,
    /// A payment method is persisted.
    pub has_payment_method: bool,
    /// Sum of cart quantities.
    pub cart_item_count: u64,
}

/// Outcome of trying to enter a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "access", content = "step", rename_all = "snake_case")]
pub enum StepAccess {
    /// The step may be shown.
    Allowed,
    /// Send the shopper back to this (earlier) step.
    Redirect(CheckoutStep),
    /// Every step is satisfied but there is nothing to order.
    EmptyCart,
}

impl CheckoutState {
    /// Whether `step` is currently enabled.
    #[must_use]
    pub const fn is_enabled(&self, step: CheckoutStep) -> bool {
        match step {
            CheckoutStep::SignIn => true,
            CheckoutStep::Shipping => self.authenticated,
            CheckoutStep::Payment => self.authenticated && self.has_shipping_address,
            CheckoutStep::PlaceOrder => {
                self.authenticated
                    && self.has_shipping_address
                    && self.has_payment_method
                    && self.cart_item_count > 0
            }
        }
    }

    /// Enabled steps, in order.
    #[must_use]
    pub fn enabled_steps(&self) -> Vec<CheckoutStep> {
        CheckoutStep::ALL
            .into_iter()
            .filter(|step| self.is_enabled(*step))
            .collect()
    }

    /// The earliest step whose data is still missing.
    #[must_use]
    pub const fn next_required_step(&self) -> CheckoutStep {
        next_required_step(self)
    }

    /// Decide whether `target` may be entered. Never redirects forward.
    #[must_use]
    pub fn resolve(&self, target: CheckoutStep) -> StepAccess {
        if self.is_enabled(target) {
            return StepAccess::Allowed;
        }

        let required = self.next_required_step();
        if required < target {
            StepAccess::Redirect(required)
        } else {
            StepAccess::EmptyCart
        }
    }

    /// Share of enabled steps, as a percentage.
    #[must_use]
    pub fn progress_percent(&self) -> u8 {
        let enabled = self.enabled_steps().len();
        u8::try_from(enabled * 100 / CheckoutStep::ALL.len()).unwrap_or(100)
    }
}

/// The earliest step whose data is still missing.
///
/// `PlaceOrder` when sign-in, shipping and payment are all satisfied; an empty
/// cart is reported by [`CheckoutState::resolve`] rather than here.
#[must_use]
pub const fn next_required_step(state: &CheckoutState) -> CheckoutStep {
    if !state.authenticated {
        CheckoutStep::SignIn
    } else if !state.has_shipping_address {
        CheckoutStep::Shipping
    } else if !state.has_payment_method {
        CheckoutStep::Payment
    } else {
        CheckoutStep::PlaceOrder
    }
}
