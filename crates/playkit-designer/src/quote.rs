//! Quote requests and server-side verification.
//!
//! A quote is only worth submitting for a design that validates cleanly,
//! so preparation is gated on the session's current validation result.
//! The receiving side never trusts the client's arithmetic: it reprices
//! the submitted snapshot with the same pure pricing functions and
//! rejects the request on any mismatch.

use crate::persistence::DesignSnapshot;
use crate::pricing::{self, DeliveryLocation, PricingBreakdown};
use crate::session::DesignSession;
use crate::validation::{ValidationEngine, ValidationIssue};
use playkit_catalog::CatalogRepository;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Two totals within half a cent are considered equal.
const PRICE_TOLERANCE: f64 = 0.005;

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("design has {} blocking validation error(s)", .issues.len())]
    DesignInvalid { issues: Vec<ValidationIssue> },
    #[error("no pricing context set on the session")]
    MissingPricing,
    #[error("claimed total {claimed:.2} does not match recomputed total {recomputed:.2}")]
    PriceMismatch { claimed: f64, recomputed: f64 },
}

/// Who the quote goes to.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QuoteContact {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// A submittable quote: the design snapshot, the pricing inputs, and the
/// breakdown the client computed from them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub snapshot: DesignSnapshot,
    pub location: DeliveryLocation,
    pub include_installation: bool,
    pub claimed: PricingBreakdown,
    pub contact: QuoteContact,
}

impl QuoteRequest {
    /// Build a request from the session's current state.
    ///
    /// Fails if the design has blocking validation errors or the session
    /// has no pricing context yet.
    pub fn prepare(session: &DesignSession, contact: QuoteContact) -> Result<Self, QuoteError> {
        if !session.is_valid() {
            return Err(QuoteError::DesignInvalid {
                issues: session.validation().errors.clone(),
            });
        }
        let context = session.pricing_context().ok_or(QuoteError::MissingPricing)?;
        let claimed = session.pricing().cloned().ok_or(QuoteError::MissingPricing)?;
        Ok(Self {
            snapshot: DesignSnapshot::from_design(session.design()),
            location: context.location.clone(),
            include_installation: context.include_installation,
            claimed,
            contact,
        })
    }
}

/// Reprice and revalidate a submitted request against the catalog.
///
/// Returns the authoritative breakdown on success. The recomputed price,
/// not the claimed one, is what should be quoted.
pub fn verify_quote(
    request: &QuoteRequest,
    catalog: &CatalogRepository,
) -> Result<PricingBreakdown, QuoteError> {
    let mut design = request.snapshot.clone().into_design();
    design.recompute_metadata(catalog);

    let validation = ValidationEngine::default().validate(&design, catalog);
    if !validation.is_valid() {
        return Err(QuoteError::DesignInvalid {
            issues: validation.errors,
        });
    }

    let recomputed = pricing::pricing_breakdown(
        &design,
        catalog,
        &request.location,
        request.include_installation,
    );
    if (recomputed.total - request.claimed.total).abs() > PRICE_TOLERANCE {
        tracing::warn!(
            claimed = request.claimed.total,
            recomputed = recomputed.total,
            "Rejecting quote with stale pricing"
        );
        return Err(QuoteError::PriceMismatch {
            claimed: request.claimed.total,
            recomputed: recomputed.total,
        });
    }
    Ok(recomputed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use playkit_catalog::{CatalogPart, PartMetadata};
    use playkit_core::{Dimensions, Position, Rotation, Unit};
    use std::sync::Arc;

    fn slab(id: &str, price: f64) -> CatalogPart {
        CatalogPart {
            id: id.to_string(),
            name: id.to_string(),
            category: "decks".to_string(),
            unit_price: price,
            dimensions: Dimensions {
                width: 4.0,
                depth: 4.0,
                height: 1.0,
            },
            unit: Unit::Feet,
            weight_kg: 40.0,
            metadata: PartMetadata {
                capacity: 2,
                stackable: true,
                ..PartMetadata::default()
            },
            ..CatalogPart::default()
        }
    }

    fn session_with_part() -> DesignSession {
        let catalog = Arc::new(CatalogRepository::from_parts(vec![slab("deck", 120.0)]));
        let mut session = DesignSession::new(catalog);
        session
            .add_part("deck", Position::default(), Rotation::default())
            .unwrap();
        session.set_pricing_context(DeliveryLocation::new("Springfield", "IL"), false);
        session
    }

    #[test]
    fn prepare_requires_pricing_context() {
        let catalog = Arc::new(CatalogRepository::from_parts(vec![slab("deck", 120.0)]));
        let mut session = DesignSession::new(catalog);
        session
            .add_part("deck", Position::default(), Rotation::default())
            .unwrap();

        let err = QuoteRequest::prepare(&session, QuoteContact::default()).unwrap_err();
        assert!(matches!(err, QuoteError::MissingPricing));
    }

    #[test]
    fn prepare_rejects_invalid_design() {
        let catalog = Arc::new(CatalogRepository::from_parts(vec![slab("deck", 120.0)]));
        let mut session = DesignSession::new(catalog);
        session.set_pricing_context(DeliveryLocation::new("Springfield", "IL"), false);

        // An empty design is a blocking validation error.
        let err = QuoteRequest::prepare(&session, QuoteContact::default()).unwrap_err();
        match err {
            QuoteError::DesignInvalid { issues } => {
                assert!(issues.iter().any(|i| i.id == "design.empty"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn verify_accepts_matching_price() {
        let session = session_with_part();
        let request = QuoteRequest::prepare(&session, QuoteContact::default()).unwrap();

        let verified = verify_quote(&request, session.catalog()).unwrap();
        assert!((verified.total - request.claimed.total).abs() < PRICE_TOLERANCE);
    }

    #[test]
    fn verify_rejects_tampered_total() {
        let session = session_with_part();
        let mut request = QuoteRequest::prepare(&session, QuoteContact::default()).unwrap();
        request.claimed.total -= 50.0;

        let err = verify_quote(&request, session.catalog()).unwrap_err();
        assert!(matches!(err, QuoteError::PriceMismatch { .. }));
    }

    #[test]
    fn verify_reprices_against_updated_catalog() {
        let session = session_with_part();
        let request = QuoteRequest::prepare(&session, QuoteContact::default()).unwrap();

        // The catalog moved under the quote: the claimed price is stale.
        let newer = CatalogRepository::from_parts(vec![slab("deck", 150.0)]);
        let err = verify_quote(&request, &newer).unwrap_err();
        assert!(matches!(err, QuoteError::PriceMismatch { .. }));
    }
}
