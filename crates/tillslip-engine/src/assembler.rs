//! # Receipt Assembly
//!
//! Turns a [`ReceiptRequest`] into a fully priced [`Receipt`] without
//! writing anything.
//!
//! ## Checks (first failure wins)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. line requests     non-empty, every quantity ≥ 1                     │
//! │  2. customer          must resolve              → CustomerNotFound      │
//! │  3. products          every id must resolve     → ProductsNotFound(all) │
//! │  4. seller profile    must be present           → SellerProfileUnavail. │
//! │  5. price & classify  TaxPolicy::apply + is_tax_invoice                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A lookup backend error at any step is reported as `CoreError::Lookup`.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tillslip_core::receipt::receipt_number;
use tillslip_core::validation::validate_line_requests;
use tillslip_core::{
    CoreError, CustomerSnapshot, LineItem, Product, Receipt, ReceiptRequest, SellerSnapshot,
    TaxPolicy,
};
use tillslip_db::{CustomerDirectory, DbError, ProductCatalog, SellerProfileSource};
use tracing::debug;
use uuid::Uuid;

fn lookup_failed(err: DbError) -> CoreError {
    CoreError::Lookup(err.to_string())
}

/// Resolves requests against the collaborator lookups.
#[derive(Clone)]
pub struct ReceiptAssembler {
    customers: Arc<dyn CustomerDirectory>,
    products: Arc<dyn ProductCatalog>,
    seller: Arc<dyn SellerProfileSource>,
    policy: TaxPolicy,
}

impl ReceiptAssembler {
    pub fn new(
        customers: Arc<dyn CustomerDirectory>,
        products: Arc<dyn ProductCatalog>,
        seller: Arc<dyn SellerProfileSource>,
        policy: TaxPolicy,
    ) -> Self {
        ReceiptAssembler {
            customers,
            products,
            seller,
            policy,
        }
    }

    pub fn policy(&self) -> &TaxPolicy {
        &self.policy
    }

    /// Builds the receipt a request describes, with a fresh id.
    pub async fn assemble(&self, request: &ReceiptRequest) -> Result<Receipt, CoreError> {
        validate_line_requests(&request.line_requests)?;

        let customer = self
            .customers
            .customer_by_id(&request.customer_id)
            .await
            .map_err(lookup_failed)?
            .ok_or_else(|| CoreError::CustomerNotFound(request.customer_id.clone()))?;

        let products = self.resolve_products(request).await?;

        let seller = self
            .seller
            .seller_profile()
            .await
            .map_err(lookup_failed)?
            .ok_or(CoreError::SellerProfileUnavailable)?;

        // One line per request entry, even when a product id repeats.
        let mut lines: Vec<LineItem> = request
            .line_requests
            .iter()
            .filter_map(|line| {
                products
                    .get(&line.product_id)
                    .map(|product| LineItem::from_product(product, line.quantity))
            })
            .collect::<Result<_, _>>()?;

        let totals = self.policy.apply(&mut lines, request.apply_tax)?;
        let is_tax_invoice =
            self.policy
                .is_tax_invoice(totals.total, request.apply_tax, request.force_tax_invoice);

        let id = Uuid::new_v4().to_string();

        debug!(
            receipt_id = %id,
            lines = lines.len(),
            total = %totals.total,
            is_tax_invoice,
            "Receipt assembled"
        );

        Ok(Receipt {
            receipt_number: receipt_number(request.date, &id),
            id,
            customer_id: customer.id.clone(),
            purchase_date: request.date,
            created_at: Utc::now(),
            line_items: lines,
            subtotal: totals.subtotal,
            tax_amount: totals.tax,
            total: totals.total,
            apply_tax: request.apply_tax,
            is_tax_invoice,
            seller_snapshot: SellerSnapshot::from(&seller),
            customer_snapshot: CustomerSnapshot::from(&customer),
        })
    }

    /// Looks up each distinct product id once, in request order, and fails
    /// with every id that did not resolve.
    async fn resolve_products(
        &self,
        request: &ReceiptRequest,
    ) -> Result<HashMap<String, Product>, CoreError> {
        let mut found = HashMap::new();
        let mut missing: Vec<String> = Vec::new();

        for line in &request.line_requests {
            let id = &line.product_id;
            if found.contains_key(id) || missing.contains(id) {
                continue;
            }

            match self.products.product_by_id(id).await.map_err(lookup_failed)? {
                Some(product) => {
                    found.insert(id.clone(), product);
                }
                None => missing.push(id.clone()),
            }
        }

        if !missing.is_empty() {
            return Err(CoreError::ProductsNotFound(missing));
        }

        Ok(found)
    }
}
