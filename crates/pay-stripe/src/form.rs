//! # Form Encoding
//!
//! Stripe takes `application/x-www-form-urlencoded` bodies with bracket
//! notation for nested fields (`metadata[profile_id]=...`). These builders
//! flatten core parameter types into that shape; reqwest does the escaping.

use pay_core::{NewCustomer, PaymentIntentParams, SubscriptionParams};
use std::collections::BTreeMap;

pub type FormParams = Vec<(String, String)>;

fn push(form: &mut FormParams, key: impl Into<String>, value: impl Into<String>) {
    form.push((key.into(), value.into()));
}

fn push_list(form: &mut FormParams, key: &str, values: &[String]) {
    for (i, value) in values.iter().enumerate() {
        push(form, format!("{}[{}]", key, i), value.clone());
    }
}

fn push_metadata(form: &mut FormParams, metadata: &BTreeMap<String, String>) {
    for (key, value) in metadata {
        push(form, format!("metadata[{}]", key), value.clone());
    }
}

/// `POST /v1/customers`
pub fn customer_form(params: &NewCustomer) -> FormParams {
    let mut form = FormParams::new();
    push(&mut form, "email", params.email.clone());
    if let Some(ref name) = params.name {
        push(&mut form, "name", name.clone());
    }
    push(&mut form, "payment_method", params.payment_method_id.clone());
    push(
        &mut form,
        "invoice_settings[default_payment_method]",
        params.payment_method_id.clone(),
    );
    form
}

/// `POST /v1/payment_intents`
pub fn payment_intent_form(params: &PaymentIntentParams) -> FormParams {
    let mut form = FormParams::new();
    push(&mut form, "amount", params.amount.to_string());
    push(&mut form, "currency", params.currency.as_str());
    push_list(&mut form, "payment_method_types", &params.payment_method_types);
    push(&mut form, "payment_method", params.payment_method_id.clone());
    push(&mut form, "confirm", params.confirm.to_string());
    push(&mut form, "receipt_email", params.receipt_email.clone());
    // Stripe rejects this flag unless confirm=true
    if params.confirm {
        push(
            &mut form,
            "error_on_requires_action",
            params.error_on_requires_action.to_string(),
        );
    }
    push_metadata(&mut form, &params.metadata);
    form
}

/// `POST /v1/subscriptions`
pub fn subscription_form(params: &SubscriptionParams) -> FormParams {
    let mut form = FormParams::new();
    push(&mut form, "customer", params.customer_id.clone());
    push(&mut form, "items[0][price]", params.price_id.clone());
    push(&mut form, "payment_behavior", params.payment_behavior.as_str());
    push(
        &mut form,
        "collection_method",
        if params.charge_automatically {
            "charge_automatically"
        } else {
            "send_invoice"
        },
    );
    push_list(
        &mut form,
        "payment_settings[payment_method_types]",
        &params.payment_method_types,
    );
    push(
        &mut form,
        "payment_settings[save_default_payment_method]",
        if params.save_default_payment_method {
            "on_subscription"
        } else {
            "off"
        },
    );
    push_list(&mut form, "expand", &params.expand);
    push_metadata(&mut form, &params.metadata);
    form
}
