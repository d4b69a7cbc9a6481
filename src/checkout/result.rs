use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::backend::{BackendError, RegisterPaymentRequest};
use crate::state::AppState;

/// Query parameters the provider appends to the success callback URL.
#[derive(Debug, Default, Clone)]
pub struct SuccessParams {
    pub payment_key: Option<String>,
    pub order_id: Option<String>,
    pub amount: Option<String>,
}

/// Query parameters of the fail callback URL.
#[derive(Debug, Default, Clone)]
pub struct FailParams {
    pub message: Option<String>,
    pub code: Option<String>,
    pub order_id: Option<String>,
}

/// Frontend route the user should land on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Home,
    Products,
    Orders,
    OrderComplete,
}

impl Destination {
    pub fn path(self) -> &'static str {
        match self {
            Destination::Home => "/",
            Destination::Products => "/products",
            Destination::Orders => "/orders",
            Destination::OrderComplete => "/orders/complete",
        }
    }
}

#[derive(Debug)]
pub enum SuccessOutcome {
    /// Payment confirmed (directly or via reconciliation). `next` carries
    /// the count of bulk-checkout items still waiting for their own
    /// order/payment round.
    Completed { payment: Value, remaining: usize },
    /// Flow stopped short of confirmation; the user is redirected with a
    /// message instead of seeing a hard failure.
    Rejected {
        destination: Destination,
        message: String,
    },
}

#[derive(Debug)]
pub struct FailOutcome {
    pub destination: Destination,
    pub message: String,
}

/// Phases of the success-callback handler. Progression is strictly
/// forward; any phase can bail out to a rejection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Validating,
    LookupPending,
    Registering,
    Confirming,
}

/// Runs the success-callback flow: validate the redirect parameters, look
/// up the pending-payment mapping, register and confirm the payment with
/// the backend, and resolve to a navigation outcome.
///
/// The whole attempt is reconstructed from the query parameters and the
/// pending-payment store; no state from the initiating request is assumed
/// to exist. Never returns an error: every failure resolves to a redirect
/// plus a user-visible message.
pub async fn handle_success(state: &AppState, params: SuccessParams) -> SuccessOutcome {
    let mut phase = Phase::Validating;
    tracing::debug!(?phase, "payment success callback");

    // VALIDATING: all three parameters present, amount numeric.
    let (Some(payment_key), Some(order_token), Some(raw_amount)) = (
        params.payment_key.filter(|s| !s.is_empty()),
        params.order_id.filter(|s| !s.is_empty()),
        params.amount.filter(|s| !s.is_empty()),
    ) else {
        return rejected(phase, Destination::Home, "invalid payment parameters");
    };
    let Some(amount) = parse_amount(&raw_amount) else {
        return rejected(phase, Destination::Home, "invalid payment parameters");
    };

    // At most one confirmation per token at a time within this process.
    let Some(_guard) = ConfirmGuard::acquire(&state.confirming, &order_token) else {
        return rejected(
            phase,
            Destination::Orders,
            "payment confirmation already in progress",
        );
    };

    // LOOKUP_PENDING: recover the internal order id for this token. A
    // missing mapping means a replayed/stale redirect or an expired
    // session; the user retries from the order list.
    phase = Phase::LookupPending;
    let Some(pending) = state.stores.pending.get(&order_token) else {
        tracing::warn!(%order_token, "no pending payment for order token");
        return rejected(phase, Destination::Orders, "order mapping not found");
    };
    if pending.amount != amount {
        tracing::warn!(
            %order_token,
            expected = pending.amount,
            got = amount,
            "redirect amount differs from pending amount"
        );
    }

    // REGISTERING: link the payment key to the order. "Already registered"
    // is expected on reload, so failure is remembered, not fatal.
    phase = Phase::Registering;
    tracing::debug!(?phase, order_id = pending.order_id, "registering payment");
    let register_error = match state
        .backend
        .register_payment(RegisterPaymentRequest {
            order_id: pending.order_id,
            payment_key: payment_key.clone(),
        })
        .await
    {
        Ok(()) => None,
        Err(err) => {
            tracing::warn!(order_id = pending.order_id, error = %err, "payment registration failed");
            Some(err.to_string())
        }
    };

    // CONFIRMING.
    phase = Phase::Confirming;
    tracing::debug!(?phase, "confirming payment");
    let confirm_error = match state.backend.confirm_payment(payment_key.clone()).await {
        Ok(payment) => {
            return completed(state, &order_token, payment.raw);
        }
        Err(err) => err,
    };

    // A reload can re-confirm a payment that already went through. When the
    // error looks like that case, the actual payment state decides.
    if looks_already_confirmed(&confirm_error) {
        match state.backend.payment_by_key(payment_key).await {
            Ok(payment) if payment.is_done() => {
                tracing::info!(%order_token, "confirmation reconciled as already completed");
                return completed(state, &order_token, payment.raw);
            }
            Ok(payment) => {
                tracing::warn!(%order_token, status = ?payment.status, "reconciliation found non-terminal payment");
            }
            Err(err) => {
                tracing::warn!(%order_token, error = %err, "reconciliation lookup failed");
            }
        }
    }

    let mut message = format!("payment confirmation failed: {confirm_error}");
    if let Some(register_error) = register_error.filter(|e| *e != confirm_error.to_string()) {
        message.push_str(&format!(" (registration: {register_error})"));
    }
    rejected(phase, Destination::Products, &message)
}

/// Fail-callback flow: no backend calls, just cleanup and a retry
/// affordance back at the catalog.
pub fn handle_fail(state: &AppState, params: FailParams) -> FailOutcome {
    if let Some(order_token) = params.order_id.as_deref().filter(|s| !s.is_empty()) {
        state.stores.pending.clear(order_token);
    }

    let mut message = params
        .message
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "payment failed".to_string());
    if let Some(code) = params.code.filter(|c| !c.is_empty()) {
        message.push_str(&format!(" ({code})"));
    }

    FailOutcome {
        destination: Destination::Products,
        message,
    }
}

fn completed(state: &AppState, order_token: &str, payment: Value) -> SuccessOutcome {
    state.stores.pending.clear(order_token);
    let remaining = match state.stores.bulk.advance() {
        Some(_) => state
            .stores
            .bulk
            .load()
            .map(|q| q.items.len() - q.index)
            .unwrap_or(0),
        None => 0,
    };
    SuccessOutcome::Completed { payment, remaining }
}

fn rejected(phase: Phase, destination: Destination, message: &str) -> SuccessOutcome {
    tracing::warn!(?phase, message, "payment success flow rejected");
    SuccessOutcome::Rejected {
        destination,
        message: message.to_string(),
    }
}

/// Redirect amounts must parse as finite numbers; fractional values are
/// truncated to minor units.
fn parse_amount(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| raw.parse::<f64>().ok().filter(|f| f.is_finite()).map(|f| f as i64))
}

/// Does this confirmation error mean "a previous attempt already finished
/// the job"? Structured codes are checked first; the message substrings are
/// a legacy fallback for backends that only emit free text.
fn looks_already_confirmed(err: &BackendError) -> bool {
    const SIGNALS: [&str; 5] = ["already", "processed", "duplicate", "이미", "중복"];
    match err {
        BackendError::Rejected { code, message, .. } => {
            if let Some(code) = code {
                let code = code.to_ascii_uppercase();
                if code.starts_with("ALREADY") || code.starts_with("DUPLICATE") {
                    return true;
                }
            }
            let message = message.to_lowercase();
            SIGNALS.iter().any(|s| message.contains(s))
        }
        BackendError::Http(_) => false,
    }
}

/// Removes the token from the in-flight set when the handler finishes.
struct ConfirmGuard {
    tokens: Arc<Mutex<HashSet<String>>>,
    token: String,
}

impl ConfirmGuard {
    fn acquire(tokens: &Arc<Mutex<HashSet<String>>>, token: &str) -> Option<Self> {
        let mut set = tokens.lock().ok()?;
        if !set.insert(token.to_string()) {
            return None;
        }
        Some(Self {
            tokens: tokens.clone(),
            token: token.to_string(),
        })
    }
}

impl Drop for ConfirmGuard {
    fn drop(&mut self) {
        if let Ok(mut set) = self.tokens.lock() {
            set.remove(&self.token);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rejected_with(code: Option<&str>, message: &str) -> BackendError {
        BackendError::Rejected {
            status: 409,
            code: code.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn structured_code_wins_over_message() {
        assert!(looks_already_confirmed(&rejected_with(
            Some("ALREADY_PROCESSED_PAYMENT"),
            "no overlap with signals"
        )));
        assert!(looks_already_confirmed(&rejected_with(
            Some("DUPLICATE_PAYMENT_REQUEST"),
            ""
        )));
    }

    #[test]
    fn message_substrings_are_a_fallback() {
        assert!(looks_already_confirmed(&rejected_with(
            None,
            "This payment was Already Processed"
        )));
        assert!(looks_already_confirmed(&rejected_with(None, "이미 처리된 결제입니다")));
        assert!(!looks_already_confirmed(&rejected_with(None, "card declined")));
    }

    #[test]
    fn amount_parsing() {
        assert_eq!(parse_amount("6000"), Some(6000));
        assert_eq!(parse_amount(" 6000 "), Some(6000));
        assert_eq!(parse_amount("6000.0"), Some(6000));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("inf"), None);
    }
}
